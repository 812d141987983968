use crate::domain::errors::ForecastError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Cooperative cancellation for a forecast run.
///
/// Checked before every model invocation. Clones share the same flag, so a
/// host can keep one clone and cancel the run from another task.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that also trips once `timeout` has elapsed from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fails if the run must stop before `step` (1-based).
    pub fn check(&self, step: usize) -> Result<(), ForecastError> {
        if self.is_cancelled() {
            return Err(ForecastError::Cancelled { step });
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            return Err(ForecastError::DeadlineExceeded { step });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_passes() {
        let token = CancelToken::new();
        assert!(token.check(1).is_ok());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let handle = token.clone();
        handle.cancel();

        assert!(token.is_cancelled());
        assert!(matches!(
            token.check(3),
            Err(ForecastError::Cancelled { step: 3 })
        ));
    }

    #[test]
    fn test_elapsed_deadline_trips() {
        let token = CancelToken::with_timeout(Duration::ZERO);
        assert!(matches!(
            token.check(1),
            Err(ForecastError::DeadlineExceeded { step: 1 })
        ));
    }

    #[test]
    fn test_distant_deadline_passes() {
        let token = CancelToken::with_timeout(Duration::from_secs(3600));
        assert!(token.check(1).is_ok());
    }
}
