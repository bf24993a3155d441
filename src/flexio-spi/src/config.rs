//! Runtime configuration of the transfer engine.

/// Filler byte clocked out by receive-only transfers when dummy clocking is enabled with
/// [`Config::with_dummy_clocking()`].
///
/// Read from `CONFIG_FLEXIO_SPI_DUMMY_BYTE` at build time, defaults to `0xff`.
pub const DEFAULT_DUMMY_BYTE: u8 = flexio_utils::u8_from_env_or!(
    "CONFIG_FLEXIO_SPI_DUMMY_BYTE",
    0xff,
    "filler byte sent during receive-only transfers"
);

/// Transfer engine configuration.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub struct Config {
    /// Byte written to the transmit register for every byte of a receive-only transfer.
    ///
    /// A bus master only receives while it clocks the bus, so receive-only transfers need
    /// something to be transmitted. When `None`, the transmit side of a receive-only
    /// transfer stays idle and some other agent is expected to clock the bus.
    pub dummy_byte: Option<u8>,
}

impl Config {
    /// Creates a configuration without dummy clocking.
    #[must_use]
    pub const fn new() -> Self {
        Self { dummy_byte: None }
    }

    /// Enables dummy clocking of receive-only transfers with [`DEFAULT_DUMMY_BYTE`].
    #[must_use]
    pub const fn with_dummy_clocking(self) -> Self {
        self.with_dummy_byte(DEFAULT_DUMMY_BYTE)
    }

    /// Enables dummy clocking of receive-only transfers with the given filler byte.
    #[must_use]
    pub const fn with_dummy_byte(mut self, byte: u8) -> Self {
        self.dummy_byte = Some(byte);
        self
    }
}
