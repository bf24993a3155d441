//! Per-instance transfer state.

use crate::{
    Error, HardwareError, Instance, InterruptSources, Notify, Outcome, Registers, StatusFlags,
};

/// State of the transfer engine for one instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No transfer is in progress, a new one can be started.
    Idle,
    /// A transfer is in progress.
    Busy,
    /// The last transfer completed and awaits a [`reset()`](crate::TransferEngine::reset).
    Complete,
    /// The last transfer failed and awaits a [`reset()`](crate::TransferEngine::reset).
    Error,
}

/// Snapshot of an instance, returned by
/// [`TransferEngine::query_result()`](crate::TransferEngine::query_result).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferStatus {
    /// No transfer is in progress.
    Idle,
    /// A transfer is in progress; the counts are the bytes moved so far.
    Busy {
        /// Bytes transmitted so far.
        transmitted: usize,
        /// Bytes received so far.
        received: usize,
    },
    /// The transfer completed.
    Complete {
        /// Bytes transmitted from the send buffer.
        transmitted: usize,
        /// Bytes received into the receive buffer.
        received: usize,
    },
    /// The transfer was aborted by a hardware error.
    Error(HardwareError),
}

impl TransferStatus {
    /// Returns the [`State`] this snapshot was taken in.
    #[must_use]
    pub const fn state(&self) -> State {
        match self {
            Self::Idle => State::Idle,
            Self::Busy { .. } => State::Busy,
            Self::Complete { .. } => State::Complete,
            Self::Error(_) => State::Error,
        }
    }

    /// Returns the terminal outcome, if the transfer has finished.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        match *self {
            Self::Complete {
                transmitted,
                received,
            } => Some(Outcome::Completed {
                transmitted,
                received,
            }),
            Self::Error(error) => Some(Outcome::Failed(error)),
            Self::Idle | Self::Busy { .. } => None,
        }
    }
}

/// Buffers handed back to the caller by [`TransferEngine::reset()`](crate::TransferEngine::reset).
#[derive(Debug)]
pub struct Released<'buf> {
    /// The send buffer of the finished transfer, trimmed to the transfer length.
    pub tx: Option<&'buf [u8]>,
    /// The receive buffer of the finished transfer, trimmed to the transfer length.
    pub rx: Option<&'buf mut [u8]>,
    /// How the transfer ended.
    pub outcome: Outcome,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    Busy,
    Complete,
    Failed(HardwareError),
}

/// What servicing an interrupt led to.
pub(crate) enum Step<'buf> {
    /// The instance was not busy.
    Spurious,
    /// Bytes may have moved, the transfer goes on.
    Progress,
    /// The transfer reached a terminal state; the notifier must be signaled.
    Finished {
        outcome: Outcome,
        notifier: Option<&'buf (dyn Notify + Sync)>,
    },
}

/// The in-flight transfer of one instance.
///
/// The buffers are only accessed while the phase is `Busy`.
pub(crate) struct TransferContext<'buf> {
    phase: Phase,
    tx: Option<&'buf [u8]>,
    tx_index: usize,
    rx: Option<&'buf mut [u8]>,
    rx_index: usize,
    // Filler bytes clocked out on behalf of a receive-only transfer.
    dummy_index: usize,
    notifier: Option<&'buf (dyn Notify + Sync)>,
}

impl<'buf> TransferContext<'buf> {
    pub(crate) const fn new() -> Self {
        Self {
            phase: Phase::Idle,
            tx: None,
            tx_index: 0,
            rx: None,
            rx_index: 0,
            dummy_index: 0,
            notifier: None,
        }
    }

    fn tx_len(&self) -> usize {
        self.tx.map_or(0, <[u8]>::len)
    }

    fn rx_len(&self) -> usize {
        self.rx.as_deref().map_or(0, <[u8]>::len)
    }

    fn tx_done(&self, dummy_clocking: bool) -> bool {
        if self.tx.is_none() && dummy_clocking {
            self.dummy_index >= self.rx_len()
        } else {
            self.tx_index >= self.tx_len()
        }
    }

    /// Records a new transfer and returns the interrupt sources it needs.
    ///
    /// The buffers must already be trimmed to the transfer length.
    pub(crate) fn start(
        &mut self,
        tx: Option<&'buf [u8]>,
        rx: Option<&'buf mut [u8]>,
        notifier: Option<&'buf (dyn Notify + Sync)>,
        dummy_clocking: bool,
    ) -> Result<InterruptSources, Error> {
        if self.phase != Phase::Idle {
            return Err(Error::InvalidState);
        }

        let mut sources = InterruptSources::ERRORS;
        if tx.is_some() || (dummy_clocking && rx.is_some()) {
            sources |= InterruptSources::TX_EMPTY;
        }
        if rx.is_some() {
            sources |= InterruptSources::RX_FULL;
        }

        *self = Self {
            phase: Phase::Busy,
            tx,
            rx,
            notifier,
            ..Self::new()
        };

        Ok(sources)
    }

    /// Advances the transfer by at most one byte per direction.
    pub(crate) fn service<R: Registers>(
        &mut self,
        instance: Instance,
        registers: &R,
        dummy_byte: Option<u8>,
    ) -> Step<'buf> {
        if self.phase != Phase::Busy {
            return Step::Spurious;
        }

        let status = registers.read_status(instance);

        // An error aborts the transfer before any byte is moved.
        if let Some(error) = HardwareError::from_status(status) {
            registers.clear_error(instance);
            registers.disable_interrupt_sources(instance, InterruptSources::ALL);
            self.phase = Phase::Failed(error);
            return Step::Finished {
                outcome: Outcome::Failed(error),
                notifier: self.notifier,
            };
        }

        let mut transmitted = false;
        if status.contains(StatusFlags::TX_EMPTY) && !self.tx_done(dummy_byte.is_some()) {
            if let Some(tx) = self.tx {
                if let Some(&byte) = tx.get(self.tx_index) {
                    registers.write_tx_data(instance, byte);
                    self.tx_index += 1;
                    transmitted = true;
                }
            } else if let Some(dummy) = dummy_byte {
                registers.write_tx_data(instance, dummy);
                self.dummy_index += 1;
                transmitted = true;
            }
        }

        if status.contains(StatusFlags::RX_FULL) {
            let rx_index = self.rx_index;
            if let Some(slot) = self.rx.as_deref_mut().and_then(|rx| rx.get_mut(rx_index)) {
                *slot = registers.read_rx_data(instance);
                self.rx_index += 1;
            }
        }

        let tx_done = self.tx_done(dummy_byte.is_some());
        let rx_done = self.rx_index >= self.rx_len();

        if tx_done && rx_done {
            registers.disable_interrupt_sources(instance, InterruptSources::ALL);
            self.phase = Phase::Complete;
            return Step::Finished {
                outcome: Outcome::Completed {
                    transmitted: self.tx_index,
                    received: self.rx_index,
                },
                notifier: self.notifier,
            };
        }

        if tx_done && transmitted {
            // Nothing left to send: keep the empty transmit buffer from firing until the
            // receive side catches up.
            registers.disable_interrupt_sources(instance, InterruptSources::TX_EMPTY);
        }

        Step::Progress
    }

    pub(crate) fn status(&self) -> TransferStatus {
        match self.phase {
            Phase::Idle => TransferStatus::Idle,
            Phase::Busy => TransferStatus::Busy {
                transmitted: self.tx_index,
                received: self.rx_index,
            },
            Phase::Complete => TransferStatus::Complete {
                transmitted: self.tx_index,
                received: self.rx_index,
            },
            Phase::Failed(error) => TransferStatus::Error(error),
        }
    }

    /// Returns to idle, handing the buffers of the finished transfer back.
    pub(crate) fn release(&mut self) -> Result<Released<'buf>, Error> {
        let outcome = self.status().outcome().ok_or(Error::InvalidState)?;
        let finished = core::mem::replace(self, Self::new());
        Ok(Released {
            tx: finished.tx,
            rx: finished.rx,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockRegisters;

    const I0: Instance = Instance::new(0);

    #[test]
    fn start_requires_idle() {
        let tx = [1, 2];
        let mut context = TransferContext::new();
        assert_eq!(
            context.start(Some(&tx), None, None, false),
            Ok(InterruptSources::TX_EMPTY | InterruptSources::ERRORS)
        );
        assert_eq!(
            context.start(Some(&tx), None, None, false),
            Err(Error::InvalidState)
        );
        assert_eq!(
            context.status(),
            TransferStatus::Busy {
                transmitted: 0,
                received: 0
            }
        );
    }

    #[test]
    fn receive_sources_depend_on_dummy_clocking() {
        let mut rx = [0; 1];
        let mut context = TransferContext::new();
        assert_eq!(
            context.start(None, Some(&mut rx), None, false),
            Ok(InterruptSources::RX_FULL | InterruptSources::ERRORS)
        );

        let mut rx = [0; 1];
        let mut context = TransferContext::new();
        assert_eq!(
            context.start(None, Some(&mut rx), None, true),
            Ok(InterruptSources::ALL)
        );
    }

    #[test]
    fn release_requires_finished_transfer() {
        let mut context = TransferContext::new();
        assert!(matches!(context.release(), Err(Error::InvalidState)));

        let tx = [7];
        context.start(Some(&tx), None, None, false).unwrap();
        assert!(matches!(context.release(), Err(Error::InvalidState)));

        let registers = MockRegisters::new();
        registers.set_status(StatusFlags::TX_EMPTY);
        assert!(matches!(
            context.service(I0, &registers, None),
            Step::Finished { .. }
        ));

        let released = context.release().unwrap();
        assert_eq!(released.tx, Some(&tx[..]));
        assert!(released.rx.is_none());
        assert_eq!(context.status(), TransferStatus::Idle);
    }

    #[test]
    fn full_duplex_stops_transmit_interrupt_while_receive_lags() {
        let tx = [0x10, 0x20];
        let mut rx = [0; 2];
        let registers = MockRegisters::new();
        let mut context = TransferContext::new();
        context.start(Some(&tx), Some(&mut rx), None, false).unwrap();

        registers.set_status(StatusFlags::TX_EMPTY);
        assert!(matches!(context.service(I0, &registers, None), Step::Progress));
        assert!(matches!(context.service(I0, &registers, None), Step::Progress));
        assert_eq!(registers.disabled(), InterruptSources::TX_EMPTY);

        registers.set_status(StatusFlags::RX_FULL);
        registers.push_rx(&[0x01, 0x02]);
        assert!(matches!(context.service(I0, &registers, None), Step::Progress));
        assert!(matches!(
            context.service(I0, &registers, None),
            Step::Finished {
                outcome: Outcome::Completed {
                    transmitted: 2,
                    received: 2
                },
                ..
            }
        ));
        assert_eq!(registers.writes(), [0x10, 0x20]);

        let released = context.release().unwrap();
        assert_eq!(released.rx.as_deref(), Some(&[0x01, 0x02][..]));
    }
}
