//! Application layer: session orchestration
//!
//! This layer drives the domain engine per request and keeps the state a
//! renderer needs between requests.

pub mod animation;
pub mod boundary;
pub mod error;
pub mod services;

pub use animation::{AnimationState, AnimationTicket, SearchAnimation, TickOutcome};
pub use boundary::{Frame, OperationKind, OperationRequest, StatusLine, Tone};
pub use error::{ApplicationError, ApplicationResult};
pub use services::Session;
