//! Library root for the `clearance_sigil` crate
//! Clearance role grant/revoke engine for a chat-platform bot

// Core error handling
pub mod errors;

// Clearance hierarchy and role resolution
pub mod clearance;
pub mod role;

// Authorization and outcome rendering
pub mod gate;
pub mod render;
pub mod reply;
pub mod session;

// Audit
pub mod audit;

// Command schema
pub mod commands;

// Configuration & CLI
pub mod cli;
pub mod config;

// Logging
pub mod log_sink;

pub use clearance::{ClearanceCode, ClearanceDescriptor, ClearanceRegistry};
pub use errors::{ClearanceError, ClearanceResult};
pub use gate::{authorize, Action, Decision, DenyReason, ExecutorContext, Invocation};
pub use render::{render, Frame, Rendered, TypedReveal};
pub use role::{highest_rank, resolve_role, ExecutorRank, RoleId, RoleRef, UserId};
pub use session::{ClearanceSession, RoleGateway, SessionOutcome};
