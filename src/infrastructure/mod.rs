//! Infrastructure layer: clocks, script input and the service container
//!
//! Everything touching the outside world sits behind a trait here so the
//! host loop can be driven by tests without sleeping or reading stdin.

pub mod di;
pub mod error;
pub mod traits;

pub use di::ServiceContainer;
pub use error::{InfraError, InfraResult};
pub use traits::{InstantPacer, Pacer, RealScriptSource, ScriptSource, SleepPacer};
