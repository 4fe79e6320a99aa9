//! One grant/revoke invocation, end to end
//!
//! `ClearanceSession` authorizes the invocation, asks the platform to apply
//! the role change when approved, renders the outcome and delivers it. The
//! session holds no per-invocation state; the registry is shared read-only.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info_span, Instrument};

use crate::audit::AuditEvent;
use crate::clearance::ClearanceRegistry;
use crate::errors::ClearanceResult;
use crate::gate::{authorize, Action, Decision, Invocation};
use crate::render::{render, render_platform_failure, DEFAULT_REVEAL};
use crate::reply::{deliver, Pacer, ReplyChannel};
use crate::role::{RoleRef, UserId};

/// The platform call that actually adds or removes a role.
pub trait RoleGateway {
    fn add_role(
        &self,
        user: UserId,
        role: &RoleRef,
    ) -> impl Future<Output = ClearanceResult<()>> + Send;

    fn remove_role(
        &self,
        user: UserId,
        role: &RoleRef,
    ) -> impl Future<Output = ClearanceResult<()>> + Send;
}

/// What a finished invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub decision: Decision,
    /// True only when the platform accepted the role change.
    pub applied: bool,
    pub frames_delivered: usize,
}

#[derive(Debug, Clone)]
pub struct ClearanceSession {
    registry: Arc<ClearanceRegistry>,
    reveal: Duration,
}

impl ClearanceSession {
    pub fn new(registry: Arc<ClearanceRegistry>) -> Self {
        Self {
            registry,
            reveal: DEFAULT_REVEAL,
        }
    }

    /// Total time the approval text takes to type out.
    pub fn with_reveal(mut self, reveal: Duration) -> Self {
        self.reveal = reveal;
        self
    }

    /// Run one invocation to completion.
    ///
    /// Platform failures become a user-visible message and are not retried.
    /// A reply channel failure is returned as an error after the audit
    /// record has been written.
    pub async fn handle<G, C, P>(
        &self,
        invocation: Invocation,
        gateway: &G,
        channel: &mut C,
        pacer: &P,
    ) -> ClearanceResult<SessionOutcome>
    where
        G: RoleGateway,
        C: ReplyChannel,
        P: Pacer,
    {
        let span = info_span!(
            "clearance",
            action = %invocation.action,
            user = %invocation.target_user,
            role = %invocation.target_role.id
        );

        async move {
            let decision = authorize(&self.registry, &invocation);
            let audit = AuditEvent::for_decision(&invocation, &decision);

            let (rendered, applied) = if decision.is_approved() {
                let result = match invocation.action {
                    Action::Grant => {
                        gateway
                            .add_role(invocation.target_user, &invocation.target_role)
                            .await
                    }
                    Action::Revoke => {
                        gateway
                            .remove_role(invocation.target_user, &invocation.target_role)
                            .await
                    }
                };

                match result {
                    Ok(()) => {
                        audit.write_to_log();
                        let rendered = render(
                            &decision,
                            invocation.action,
                            invocation.target_user,
                            &invocation.target_role,
                            self.reveal,
                        );
                        (rendered, true)
                    }
                    Err(e) => {
                        error!(error = %e, "platform rejected role change");
                        audit.with_platform_failure(e.to_string()).write_to_log();
                        (render_platform_failure(), false)
                    }
                }
            } else {
                audit.write_to_log();
                let rendered = render(
                    &decision,
                    invocation.action,
                    invocation.target_user,
                    &invocation.target_role,
                    self.reveal,
                );
                (rendered, false)
            };

            let frames_delivered = deliver(rendered, channel, pacer).await?;

            Ok(SessionOutcome {
                decision,
                applied,
                frames_delivered,
            })
        }
        .instrument(span)
        .await
    }
}
