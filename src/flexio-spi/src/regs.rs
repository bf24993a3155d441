//! Register access seam between the transfer engine and the hardware abstraction layer.

use crate::Instance;

bitflags::bitflags! {
    /// Status flags of a FlexIO SPI instance, as returned by [`Registers::read_status()`].
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u8 {
        /// The transmit shifter buffer is empty and can take the next byte.
        const TX_EMPTY = 1 << 0;
        /// The receive shifter buffer holds a byte.
        const RX_FULL = 1 << 1;
        /// The transmit shifter ran out of data (underrun).
        const TX_ERROR = 1 << 2;
        /// A received byte was overwritten before being read (overrun).
        const RX_ERROR = 1 << 3;
        /// All error flags.
        const ERRORS = Self::TX_ERROR.bits() | Self::RX_ERROR.bits();
    }
}

bitflags::bitflags! {
    /// Interrupt sources of a FlexIO SPI instance.
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
    pub struct InterruptSources: u8 {
        /// Transmit buffer empty.
        const TX_EMPTY = 1 << 0;
        /// Receive buffer full.
        const RX_FULL = 1 << 1;
        /// Shifter errors, in either direction.
        const ERRORS = 1 << 2;
        /// Every interrupt source used by a transfer.
        const ALL = Self::TX_EMPTY.bits() | Self::RX_FULL.bits() | Self::ERRORS.bits();
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusFlags {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "StatusFlags({=u8:#06b})", self.bits());
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for InterruptSources {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "InterruptSources({=u8:#05b})", self.bits());
    }
}

/// Access to the registers of the FlexIO instances used as SPI masters.
///
/// Implemented by the hardware abstraction layer. The methods take `&self` as they are
/// called both from thread and interrupt context; implementations are expected to perform
/// volatile accesses to memory-mapped registers. The bit layout behind the flags is up to
/// the implementation.
pub trait Registers {
    /// Reads the current status flags of `instance`.
    fn read_status(&self, instance: Instance) -> StatusFlags;

    /// Writes `byte` to the transmit buffer of `instance`.
    fn write_tx_data(&self, instance: Instance, byte: u8);

    /// Reads the receive buffer of `instance`.
    fn read_rx_data(&self, instance: Instance) -> u8;

    /// Clears the latched error flags of `instance`.
    fn clear_error(&self, instance: Instance);

    /// Enables the given interrupt sources of `instance`.
    fn enable_interrupt_sources(&self, instance: Instance, sources: InterruptSources);

    /// Disables the given interrupt sources of `instance`.
    fn disable_interrupt_sources(&self, instance: Instance, sources: InterruptSources);
}

impl<R: Registers + ?Sized> Registers for &R {
    fn read_status(&self, instance: Instance) -> StatusFlags {
        (**self).read_status(instance)
    }

    fn write_tx_data(&self, instance: Instance, byte: u8) {
        (**self).write_tx_data(instance, byte);
    }

    fn read_rx_data(&self, instance: Instance) -> u8 {
        (**self).read_rx_data(instance)
    }

    fn clear_error(&self, instance: Instance) {
        (**self).clear_error(instance);
    }

    fn enable_interrupt_sources(&self, instance: Instance, sources: InterruptSources) {
        (**self).enable_interrupt_sources(instance, sources);
    }

    fn disable_interrupt_sources(&self, instance: Instance, sources: InterruptSources) {
        (**self).disable_interrupt_sources(instance, sources);
    }
}
