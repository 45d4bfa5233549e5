//! Shutdown requests from SIGINT/SIGTERM
//!
//! The first signal only raises a flag that is checked before the printer
//! is acquired; a second signal terminates the process with status 0.

use signal_hook::consts::{SIGINT, SIGTERM};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    requested: Arc<AtomicBool>,
}

impl Shutdown {
    /// Flag without signal handlers, for tests and embedding
    pub fn new() -> Self {
        Self::default()
    }

    /// Register SIGINT/SIGTERM handlers
    pub fn install() -> std::io::Result<Self> {
        let shutdown = Self::new();
        for sig in [SIGINT, SIGTERM] {
            // Order matters: the conditional exit only fires once the flag is set
            signal_hook::flag::register_conditional_shutdown(sig, 0, Arc::clone(&shutdown.requested))?;
            signal_hook::flag::register(sig, Arc::clone(&shutdown.requested))?;
        }
        Ok(shutdown)
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_shared_between_clones() {
        let a = Shutdown::new();
        let b = a.clone();
        assert!(!b.is_requested());
        a.request();
        assert!(b.is_requested());
    }
}
