use core::fmt;

/// Number of FlexIO instances available on the target.
///
/// Read from the `CONFIG_FLEXIO_INSTANCE_COUNT` environment variable at build time, and
/// defaults to a single instance.
pub const INSTANCE_COUNT: usize = flexio_utils::usize_from_env_or!(
    "CONFIG_FLEXIO_INSTANCE_COUNT",
    1,
    "number of FlexIO instances"
);

/// Largest instance count an [`Instance`] can address.
pub(crate) const MAX_INSTANCES: usize = u8::MAX as usize + 1;

const _: () = assert!(
    INSTANCE_COUNT > 0 && INSTANCE_COUNT <= MAX_INSTANCES,
    "CONFIG_FLEXIO_INSTANCE_COUNT must be between 1 and 256"
);

/// Identifies one physical FlexIO peripheral.
///
/// An [`Instance`] is only an index: whether it is valid depends on the instance count of
/// the [`VectorTable`](crate::VectorTable) or [`TransferEngine`](crate::TransferEngine) it
/// is used with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Instance(u8);

impl Instance {
    /// Creates the identifier of the instance with the given index.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Returns the index of this instance.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u8> for Instance {
    fn from(index: u8) -> Self {
        Self::new(index)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FLEXIO{}", self.0)
    }
}
