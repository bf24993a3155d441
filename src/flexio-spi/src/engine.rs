//! The interrupt-driven transfer engine.

use core::cell::RefCell;

use critical_section::Mutex;
use flexio_log::{debug, trace, warn};
use portable_atomic::{AtomicU32, Ordering};

use crate::{
    context::{Step, TransferContext},
    instance::MAX_INSTANCES,
    Config, Error, Instance, Notify, Outcome, Registers, Released, TransferStatus,
};

/// Drives master transfers on `N` FlexIO instances, one byte per direction per interrupt.
///
/// Each instance owns a transfer context that goes through
/// `Idle → Busy → Complete | Error → Idle`:
///
/// - [`start_transfer()`](Self::start_transfer) (thread context) moves it from `Idle` to
///   `Busy` and arms the interrupt sources,
/// - [`on_interrupt()`](Self::on_interrupt) (interrupt context) advances it and moves it to
///   `Complete` or `Error`, signaling the caller's notifier,
/// - [`reset()`](Self::reset) (thread context) brings it back to `Idle` and hands the
///   buffers back.
///
/// Any other transition is rejected with [`Error::InvalidState`].
///
/// The buffers are borrowed for `'buf`; an engine living in a `static` therefore works
/// with `'static` buffers (e.g., from a `StaticCell`).
///
/// # Concurrency
///
/// Thread-context calls for one instance must not race each other; the interrupt path of
/// one instance must not nest (the interrupt controller guarantees this). Every access to
/// a transfer context happens inside a short critical section, which also makes the
/// interrupt handler's writes visible to thread context. The notifier is called outside of
/// the critical section.
pub struct TransferEngine<'buf, R, const N: usize> {
    registers: R,
    config: Config,
    contexts: Mutex<RefCell<[TransferContext<'buf>; N]>>,
    spurious: [AtomicU32; N],
}

impl<'buf, R, const N: usize> TransferEngine<'buf, R, N> {
    /// Creates an engine with every instance idle.
    ///
    /// # Panics
    ///
    /// Panics if `N` is larger than the number of addressable instances (256).
    #[must_use]
    pub const fn new(registers: R, config: Config) -> Self {
        assert!(
            N <= MAX_INSTANCES,
            "a FlexIO transfer engine serves at most 256 instances"
        );
        Self {
            registers,
            config,
            contexts: Mutex::new(RefCell::new([const { TransferContext::new() }; N])),
            spurious: [const { AtomicU32::new(0) }; N],
        }
    }

    /// Returns the register access used by this engine.
    #[must_use]
    pub fn registers(&self) -> &R {
        &self.registers
    }

    /// Returns the configuration of this engine.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the number of interrupts `instance` received while it was not busy.
    ///
    /// Returns `0` for an instance out of range.
    #[must_use]
    pub fn spurious_interrupts(&self, instance: Instance) -> u32 {
        self.spurious
            .get(instance.index())
            .map_or(0, |counter| counter.load(Ordering::Relaxed))
    }
}

impl<'buf, R: Registers, const N: usize> TransferEngine<'buf, R, N> {
    /// Starts a transfer of `length` bytes on `instance`.
    ///
    /// Sends the first `length` bytes of `tx` and receives `length` bytes into `rx`, if
    /// given. Returns as soon as the interrupt sources are armed; `notifier` is signaled
    /// from interrupt context when the transfer completes or fails.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `instance` is out of range, if neither buffer is
    ///   given, if `length` is zero, or if a buffer is shorter than `length`.
    /// - [`Error::InvalidState`] if `instance` is not idle.
    ///
    /// The engine is left untouched on error.
    pub fn start_transfer(
        &self,
        instance: Instance,
        tx: Option<&'buf [u8]>,
        rx: Option<&'buf mut [u8]>,
        length: usize,
        notifier: Option<&'buf (dyn Notify + Sync)>,
    ) -> Result<(), Error> {
        if instance.index() >= N || length == 0 || (tx.is_none() && rx.is_none()) {
            debug!("flexio-spi: rejecting transfer request on instance {}", instance.index());
            return Err(Error::InvalidArgument);
        }

        let tx = tx
            .map(|tx| tx.get(..length).ok_or(Error::InvalidArgument))
            .transpose()?;
        let rx = rx
            .map(|rx| rx.get_mut(..length).ok_or(Error::InvalidArgument))
            .transpose()?;

        critical_section::with(|cs| -> Result<(), Error> {
            let mut contexts = self.contexts.borrow_ref_mut(cs);
            let context = contexts
                .get_mut(instance.index())
                .ok_or(Error::InvalidArgument)?;

            let sources = context.start(tx, rx, notifier, self.config.dummy_byte.is_some())?;
            self.registers.enable_interrupt_sources(instance, sources);
            Ok(())
        })?;

        debug!(
            "flexio-spi: started {}-byte transfer on instance {}",
            length,
            instance.index()
        );
        Ok(())
    }

    /// Services the interrupt of `instance`.
    ///
    /// Moves at most one byte in each direction, then detects completion. A hardware error
    /// aborts the transfer before any byte is moved. Interrupts arriving while the instance
    /// is not busy are counted and otherwise ignored.
    ///
    /// Meant to be called by the [`VectorTable`](crate::VectorTable) entry point of the
    /// instance.
    pub fn on_interrupt(&self, instance: Instance) {
        let step = critical_section::with(|cs| {
            let mut contexts = self.contexts.borrow_ref_mut(cs);
            contexts
                .get_mut(instance.index())
                .map(|context| context.service(instance, &self.registers, self.config.dummy_byte))
        });

        match step {
            None => {
                warn!("flexio-spi: interrupt for unknown instance {}", instance.index());
            }
            Some(Step::Spurious) => {
                if let Some(counter) = self.spurious.get(instance.index()) {
                    counter.fetch_add(1, Ordering::Relaxed);
                }
                trace!("flexio-spi: spurious interrupt on instance {}", instance.index());
            }
            Some(Step::Progress) => {}
            Some(Step::Finished { outcome, notifier }) => {
                log_outcome(instance, outcome);
                if let Some(notifier) = notifier {
                    notifier.notify(instance, outcome);
                }
            }
        }
    }

    /// Returns the state of `instance` and, once finished, the outcome of its transfer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `instance` is out of range.
    pub fn query_result(&self, instance: Instance) -> Result<TransferStatus, Error> {
        critical_section::with(|cs| {
            self.contexts
                .borrow_ref(cs)
                .get(instance.index())
                .map(TransferContext::status)
                .ok_or(Error::InvalidArgument)
        })
    }

    /// Returns a finished instance to idle, handing back the buffers of its transfer.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `instance` is out of range.
    /// - [`Error::InvalidState`] if the instance is idle or busy.
    pub fn reset(&self, instance: Instance) -> Result<Released<'buf>, Error> {
        critical_section::with(|cs| {
            self.contexts
                .borrow_ref_mut(cs)
                .get_mut(instance.index())
                .ok_or(Error::InvalidArgument)?
                .release()
        })
    }
}

fn log_outcome(instance: Instance, outcome: Outcome) {
    match outcome {
        Outcome::Completed {
            transmitted,
            received,
        } => {
            debug!(
                "flexio-spi: transfer on instance {} complete ({} sent, {} received)",
                instance.index(),
                transmitted,
                received
            );
        }
        Outcome::Failed(error) => {
            warn!(
                "flexio-spi: transfer on instance {} failed: {}",
                instance.index(),
                error
            );
        }
    }
}
