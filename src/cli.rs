use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::clearance::ClearanceRegistry;
use crate::config::{load_config, load_unchecked};
use crate::errors::{ClearanceError, ClearanceResult};
use crate::gate::Invocation;
use crate::render::Frame;
use crate::reply::{ReplyChannel, TokioPacer};
use crate::role::{RoleRef, UserId};
use crate::session::{ClearanceSession, RoleGateway};

/// Top-level CLI interface for the clearance bot
#[derive(Parser)]
#[command(
    name = "clearance-sigil",
    version = "0.1.0",
    about = "Grant and revoke clearance roles gated by role hierarchy"
)]
pub struct Cli {
    /// Config file (defaults to clearance.toml, or CLEARANCE_CONFIG_PATH)
    #[arg(long, global = true, env = "CLEARANCE_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and validate configuration, then print a redacted summary
    CheckConfig,

    /// Print the grant/revoke command registration payload
    Commands,

    /// Run one invocation read from a JSON file and print every frame
    Simulate {
        #[arg(short, long)]
        input: PathBuf,
        /// Override the configured reveal duration
        #[arg(long)]
        reveal_ms: Option<u64>,
        /// Make the platform reject the role change
        #[arg(long)]
        fail_platform: bool,
    },
}

/// Prints frames to stdout in place of the platform's reply channel.
#[derive(Debug, Default)]
pub struct StdoutChannel {
    frames: usize,
}

impl ReplyChannel for StdoutChannel {
    async fn edit_reply(&mut self, frame: &Frame) -> ClearanceResult<()> {
        self.frames += 1;
        println!("[frame {:>3}] {:?}", self.frames, frame.content());
        Ok(())
    }
}

/// Accepts or rejects every role change without any network.
#[derive(Debug, Clone, Copy)]
pub struct OfflineGateway {
    pub fail: bool,
}

impl OfflineGateway {
    fn apply(&self, operation: &str, user: UserId, role: &RoleRef) -> ClearanceResult<()> {
        if self.fail {
            return Err(ClearanceError::platform(operation, "Missing Permissions"));
        }
        info!(%user, role = %role.name, operation, "offline role change");
        Ok(())
    }
}

impl RoleGateway for OfflineGateway {
    async fn add_role(&self, user: UserId, role: &RoleRef) -> ClearanceResult<()> {
        self.apply("add_role", user, role)
    }

    async fn remove_role(&self, user: UserId, role: &RoleRef) -> ClearanceResult<()> {
        self.apply("remove_role", user, role)
    }
}

/// Parse a simulated invocation.
pub fn parse_invocation(raw: &str) -> ClearanceResult<Invocation> {
    let invocation: Invocation = serde_json::from_str(raw)
        .map_err(|e| ClearanceError::serialization("parsing invocation", e))?;
    if invocation.target_role.name.is_empty() {
        return Err(ClearanceError::validation(
            "targetRole.name",
            "must not be empty",
        ));
    }
    Ok(invocation)
}

pub async fn dispatch(cli: Cli) -> ClearanceResult<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::CheckConfig => {
            let config = load_config(config_path)?;
            println!("token:     {}", config.redacted_token());
            println!("client_id: {}", config.client_id);
            println!("guild_id:  {}", config.guild_id);
            println!("reveal_ms: {}", config.reveal_ms);
        }
        Commands::Commands => {
            println!("{}", crate::commands::registration_payload()?);
        }
        Commands::Simulate {
            input,
            reveal_ms,
            fail_platform,
        } => {
            let config = load_unchecked(config_path)?;
            let raw = std::fs::read_to_string(&input)
                .map_err(|e| ClearanceError::io(format!("reading {}", input.display()), e))?;
            let invocation = parse_invocation(&raw)?;

            let reveal = reveal_ms.map(Duration::from_millis).unwrap_or(config.reveal());
            let session =
                ClearanceSession::new(Arc::new(ClearanceRegistry::standard())).with_reveal(reveal);
            let gateway = OfflineGateway {
                fail: fail_platform,
            };
            let mut channel = StdoutChannel::default();

            let outcome = session
                .handle(invocation, &gateway, &mut channel, &TokioPacer)
                .await?;
            println!(
                "decision: {:?}, applied: {}, frames: {}",
                outcome.decision, outcome.applied, outcome.frames_delivered
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Action;

    const SAMPLE: &str = r#"{
        "action": "grant",
        "targetUser": 1001,
        "targetRole": { "id": 77, "name": "RA Access", "position": 3 },
        "executor": {
            "heldRoles": [{ "id": 55, "name": "CA Something", "position": 5 }],
            "hasManageRolePermission": true
        },
        "botTopRolePosition": 10
    }"#;

    #[test]
    fn parses_sample_invocation() {
        let invocation = parse_invocation(SAMPLE).unwrap();
        assert_eq!(invocation.action, Action::Grant);
        assert_eq!(invocation.target_user, UserId(1001));
        assert_eq!(invocation.executor.held_roles.len(), 1);
    }

    #[test]
    fn rejects_unnamed_target_role() {
        let raw = SAMPLE.replace("\"RA Access\"", "\"\"");
        let err = parse_invocation(&raw).unwrap_err();
        assert!(matches!(err, ClearanceError::Validation { .. }));
    }

    #[test]
    fn rejects_unknown_action() {
        let raw = SAMPLE.replace("\"grant\"", "\"ban\"");
        assert!(matches!(
            parse_invocation(&raw),
            Err(ClearanceError::Serialization { .. })
        ));
    }

    #[test]
    fn cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "clearance-sigil",
            "simulate",
            "--input",
            "inv.json",
            "--reveal-ms",
            "0",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate { reveal_ms, fail_platform, .. } => {
                assert_eq!(reveal_ms, Some(0));
                assert!(!fail_platform);
            }
            _ => panic!("expected simulate"),
        }
    }
}
