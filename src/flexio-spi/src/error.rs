use core::fmt;

use crate::StatusFlags;

/// Errors returned synchronously by the [`TransferEngine`](crate::TransferEngine).
///
/// A call failing with one of these errors has not modified the engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The request is malformed: no buffer, zero length, a buffer shorter than the
    /// requested length, or an instance out of range.
    InvalidArgument,
    /// The operation is not allowed in the current state of the instance.
    InvalidState,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid transfer argument"),
            Self::InvalidState => write!(f, "operation not allowed in the current transfer state"),
        }
    }
}

impl core::error::Error for Error {}

/// Fault reported by the peripheral during a transfer.
///
/// Hardware errors abort the transfer; they are reported through
/// [`State::Error`](crate::State::Error) and the completion notifier, never retried.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareError {
    /// The transmit shifter ran out of data.
    TransmitUnderrun,
    /// A received byte was lost because the previous one had not been read yet.
    ReceiveOverrun,
    /// Both shifters reported an error at the same time.
    UnderrunAndOverrun,
}

impl HardwareError {
    /// Returns the error signaled by `status`, if any.
    #[must_use]
    pub const fn from_status(status: StatusFlags) -> Option<Self> {
        match (
            status.contains(StatusFlags::TX_ERROR),
            status.contains(StatusFlags::RX_ERROR),
        ) {
            (false, false) => None,
            (true, false) => Some(Self::TransmitUnderrun),
            (false, true) => Some(Self::ReceiveOverrun),
            (true, true) => Some(Self::UnderrunAndOverrun),
        }
    }
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransmitUnderrun => write!(f, "transmit underrun"),
            Self::ReceiveOverrun => write!(f, "receive overrun"),
            Self::UnderrunAndOverrun => write!(f, "transmit underrun and receive overrun"),
        }
    }
}

impl core::error::Error for HardwareError {}
