//! Cooperative cancellation.
//!
//! Long-running operations poll a [`Cancellation`] at their yield points:
//! the top of every loop iteration, before each driver call, between move
//! chunks and inside sleeps. A cancelled operation disables the motors it
//! was driving and returns [`Outcome::Cancelled`]; the caller decides what
//! happens next.

use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "std")]
use crate::error::{truncated, Error, Result};

/// How an operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum Outcome {
    /// The operation ran to its natural end.
    Completed,
    /// The operation stopped at a yield point because cancellation was requested.
    Cancelled,
}

impl Outcome {
    /// `true` for [`Outcome::Cancelled`].
    #[inline]
    pub fn is_cancelled(self) -> bool {
        self == Outcome::Cancelled
    }
}

/// Source of cancellation requests.
pub trait Cancellation {
    /// Whether the current operation should stop.
    fn is_cancelled(&self) -> bool;
}

impl Cancellation for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<T: Cancellation + ?Sized> Cancellation for &T {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Never requests cancellation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Shared cancellation flag, typically raised from a signal handler.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct CancelToken(std::sync::Arc<AtomicBool>);

#[cfg(feature = "std")]
impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the current operation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Clear a previous request so the next operation can run.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Raise this token on SIGINT (Ctrl-C) instead of terminating.
    ///
    /// Only one handler can be installed per process.
    ///
    /// # Errors
    ///
    /// [`Error::Signal`] if a handler is already installed or the platform
    /// refuses it.
    pub fn raise_on_interrupt(&self) -> Result<()> {
        let token = self.clone();
        ctrlc::set_handler(move || {
            log::warn!("interrupt received, cancelling the current operation");
            token.cancel();
        })
        .map_err(|e| Error::Signal(truncated(&e.to_string())))
    }
}

#[cfg(feature = "std")]
impl Cancellation for CancelToken {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let handle = token.clone();
        assert!(!token.is_cancelled());

        handle.cancel();
        assert!(token.is_cancelled());

        token.reset();
        assert!(!handle.is_cancelled());
    }

    // The only test in this binary that installs a handler.
    #[cfg(unix)]
    #[test]
    fn test_interrupt_raises_token() {
        let token = CancelToken::new();
        token.raise_on_interrupt().unwrap();
        assert!(matches!(token.raise_on_interrupt(), Err(Error::Signal(_))));

        let status = std::process::Command::new("kill")
            .args(["-INT", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while !token.is_cancelled() && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_atomic_flag() {
        let flag = AtomicBool::new(false);
        assert!(!(&flag).is_cancelled());
        flag.store(true, Ordering::Release);
        assert!(flag.is_cancelled());
        assert!(!NeverCancel.is_cancelled());
    }
}
