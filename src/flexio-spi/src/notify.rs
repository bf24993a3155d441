//! Completion notification.
//!
//! The caller starting a transfer may hand a [`Notify`] implementation to the engine,
//! which invokes it exactly once, from interrupt context, when the transfer reaches a
//! terminal state.

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use portable_atomic::{AtomicBool, Ordering};

use crate::{HardwareError, Instance};

/// Terminal result of a transfer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Every configured direction has moved all of its bytes.
    Completed {
        /// Bytes written to the transmit register from the send buffer.
        transmitted: usize,
        /// Bytes read from the receive register into the receive buffer.
        received: usize,
    },
    /// The transfer was aborted by a hardware error.
    Failed(HardwareError),
}

impl Outcome {
    /// Returns whether the transfer completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Receives the terminal [`Outcome`] of a transfer.
///
/// Called from interrupt context: implementations must not block.
pub trait Notify {
    /// Called once when the transfer on `instance` completes or fails.
    fn notify(&self, instance: Instance, outcome: Outcome);
}

impl<F> Notify for F
where
    F: Fn(Instance, Outcome),
{
    fn notify(&self, instance: Instance, outcome: Outcome) {
        self(instance, outcome);
    }
}

/// A flag set when a transfer reaches a terminal state, meant for polling.
///
/// The outcome itself is available from
/// [`TransferEngine::query_result()`](crate::TransferEngine::query_result).
#[derive(Debug, Default)]
pub struct CompletionFlag {
    done: AtomicBool,
}

impl CompletionFlag {
    /// Creates a new, unset flag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            done: AtomicBool::new(false),
        }
    }

    /// Returns whether the transfer has finished.
    #[must_use]
    pub fn is_set(&self) -> bool {
        // NOTE(ordering): pairs with the Release store in `notify()`, so that the engine's
        // writes into the receive buffer are visible once the flag is observed.
        self.done.load(Ordering::Acquire)
    }

    /// Clears the flag, so it can be reused for the next transfer.
    pub fn clear(&self) {
        self.done.store(false, Ordering::Release);
    }
}

impl Notify for CompletionFlag {
    fn notify(&self, _instance: Instance, _outcome: Outcome) {
        self.done.store(true, Ordering::Release);
    }
}

/// Carries the [`Outcome`] of a transfer to an async task.
pub struct CompletionSignal {
    signal: Signal<CriticalSectionRawMutex, Outcome>,
}

impl CompletionSignal {
    /// Creates a new, unsignaled [`CompletionSignal`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    /// Waits for the transfer to finish and returns its outcome.
    ///
    /// Resolves immediately if the transfer has already finished. Consumes the outcome.
    pub async fn wait(&self) -> Outcome {
        self.signal.wait().await
    }

    /// Returns the outcome if the transfer has finished, consuming it.
    #[must_use]
    pub fn try_take(&self) -> Option<Outcome> {
        self.signal.try_take()
    }

    /// Returns whether an outcome is waiting to be consumed.
    #[must_use]
    pub fn signaled(&self) -> bool {
        self.signal.signaled()
    }

    /// Drops any pending outcome.
    pub fn reset(&self) {
        self.signal.reset();
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl Notify for CompletionSignal {
    fn notify(&self, _instance: Instance, outcome: Outcome) {
        self.signal.signal(outcome);
    }
}
