//! Lifecycle shared by the front ends that drive a bot.
//!
//! `init` loads persisted state before the first tick and `shutdown`
//! flushes it after the last one.

use xo_core::error::XoResult;

/// Lifecycle state of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Created but not initialized.
    Created,
    /// Running and ready.
    Running,
    /// Stopped after a shutdown.
    Stopped,
    /// Shutdown could not flush state.
    Failed,
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Something with persisted state that must be loaded and flushed.
pub trait Service: Send {
    /// Name used in log lines.
    fn name(&self) -> &str;

    /// Current state of this service.
    fn state(&self) -> ServiceState;

    /// Load state. Called once before the first tick.
    fn init(&mut self) -> XoResult<()>;

    /// Flush state. A failed flush leaves the service `Failed`.
    fn shutdown(&mut self) -> XoResult<()>;

    /// Whether the service is between `init` and `shutdown`.
    fn is_healthy(&self) -> bool {
        self.state() == ServiceState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestService {
        state: ServiceState,
    }

    impl Service for TestService {
        fn name(&self) -> &str {
            "test"
        }
        fn state(&self) -> ServiceState {
            self.state
        }
        fn init(&mut self) -> XoResult<()> {
            self.state = ServiceState::Running;
            Ok(())
        }
        fn shutdown(&mut self) -> XoResult<()> {
            self.state = ServiceState::Stopped;
            Ok(())
        }
    }

    #[test]
    fn test_service_lifecycle() {
        let mut svc = TestService {
            state: ServiceState::Created,
        };
        assert!(!svc.is_healthy());
        svc.init().unwrap();
        assert!(svc.is_healthy());
        svc.shutdown().unwrap();
        assert!(!svc.is_healthy());
        assert_eq!(svc.state().to_string(), "stopped");
    }
}
