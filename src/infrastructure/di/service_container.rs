//! Service container for dependency injection
//!
//! Wires settings and I/O implementations for the host loop.

use std::sync::Arc;

use crate::application::Session;
use crate::config::Settings;
use crate::infrastructure::traits::{
    InstantPacer, Pacer, RealScriptSource, ScriptSource, SleepPacer,
};

pub struct ServiceContainer {
    /// Effective settings after all layers were merged
    pub settings: Arc<Settings>,

    /// Clock used between animation ticks
    pub pacer: Arc<dyn Pacer>,

    /// Source of `run` scripts
    pub scripts: Arc<dyn ScriptSource>,
}

impl ServiceContainer {
    /// Create a container with real implementations.
    ///
    /// A disabled animation gets a pacer that never sleeps.
    pub fn new(settings: Settings) -> Self {
        let pacer: Arc<dyn Pacer> = if settings.animation.enabled {
            Arc::new(SleepPacer)
        } else {
            Arc::new(InstantPacer)
        };
        Self::with_deps(settings, pacer, Arc::new(RealScriptSource))
    }

    /// Create a container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        pacer: Arc<dyn Pacer>,
        scripts: Arc<dyn ScriptSource>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            pacer,
            scripts,
        }
    }

    /// Fresh session configured from the container's settings.
    pub fn session(&self) -> Session {
        Session::new(&self.settings)
    }
}
