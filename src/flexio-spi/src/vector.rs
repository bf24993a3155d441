//! Interrupt vector table of the FlexIO SPI instances.

use flexio_log::warn;

use crate::{instance::MAX_INSTANCES, Instance};

/// Interrupt entry point of one instance.
pub type Handler = extern "C" fn();

/// Maps each of the `N` FlexIO instances to its interrupt entry point.
///
/// The table is immutable and every instance is bound, which is checked while building
/// it. Build it in a `static` (or `const`) so that configuration mistakes are reported
/// at compile time.
#[derive(Copy, Clone)]
pub struct VectorTable<const N: usize> {
    entries: [Handler; N],
}

impl<const N: usize> VectorTable<N> {
    /// Creates a table binding instance `i` to `entries[i]`.
    ///
    /// # Panics
    ///
    /// Panics if `N` is zero, or larger than the number of addressable instances (256).
    #[must_use]
    pub const fn new(entries: [Handler; N]) -> Self {
        assert!(N > 0, "a FlexIO vector table needs at least one instance");
        assert!(
            N <= MAX_INSTANCES,
            "a FlexIO vector table holds at most 256 instances"
        );
        Self { entries }
    }

    /// Returns the number of instances in this table.
    #[must_use]
    pub const fn len(&self) -> usize {
        N
    }

    /// Always returns `false`: a table has at least one instance.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns the entry point bound to `instance`, if it is in range.
    #[must_use]
    pub fn handler(&self, instance: Instance) -> Option<Handler> {
        self.entries.get(instance.index()).copied()
    }

    /// Invokes the entry point bound to `instance`.
    ///
    /// Returns `false`, without invoking anything, if `instance` is out of range.
    pub fn dispatch(&self, instance: Instance) -> bool {
        if let Some(handler) = self.handler(instance) {
            handler();
            true
        } else {
            warn!(
                "flexio-spi: no interrupt handler for instance {}",
                instance.index()
            );
            false
        }
    }

    /// Iterates over the instances and their entry points, e.g., to install them in the
    /// interrupt controller.
    pub fn iter(&self) -> impl Iterator<Item = (Instance, Handler)> + '_ {
        (0..=u8::MAX)
            .zip(self.entries.iter())
            .map(|(index, &handler)| (Instance::new(index), handler))
    }
}

impl<const N: usize> core::fmt::Debug for VectorTable<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(instance, handler)| (instance.index(), handler as *const ())))
            .finish()
    }
}

/// Builds a [`VectorTable`] one instance at a time.
///
/// Meant to be used in `const` context, where misconfigurations become build errors:
///
/// ```compile_fail
/// # use flexio_spi::{Instance, VectorTable, VectorTableBuilder};
/// extern "C" fn isr() {}
/// // Instance 1 is left unbound.
/// static TABLE: VectorTable<2> = VectorTableBuilder::new()
///     .bind(Instance::new(0), isr)
///     .build();
/// ```
pub struct VectorTableBuilder<const N: usize> {
    entries: [Option<Handler>; N],
}

impl<const N: usize> VectorTableBuilder<N> {
    /// Creates a builder with every instance unbound.
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: [None; N] }
    }

    /// Binds `handler` to `instance`.
    ///
    /// # Panics
    ///
    /// Panics if `instance` is out of range or already bound.
    #[must_use]
    #[expect(clippy::indexing_slicing, reason = "the index is checked first")]
    pub const fn bind(mut self, instance: Instance, handler: Handler) -> Self {
        let index = instance.index();
        if index >= N {
            const_panic::concat_panic!(
                "FlexIO instance ",
                index,
                " is out of range, the table has ",
                N,
                " instance(s)"
            );
        }
        if self.entries[index].is_some() {
            const_panic::concat_panic!("FlexIO instance ", index, " is bound twice");
        }
        self.entries[index] = Some(handler);
        self
    }

    /// Returns the table.
    ///
    /// # Panics
    ///
    /// Panics if an instance has been left unbound, or if `N` is zero or larger than 256.
    #[must_use]
    #[expect(clippy::indexing_slicing, reason = "index < N")]
    pub const fn build(self) -> VectorTable<N> {
        let mut entries: [Handler; N] = [unbound as Handler; N];
        let mut index = 0;
        while index < N {
            match self.entries[index] {
                Some(handler) => entries[index] = handler,
                None => const_panic::concat_panic!("FlexIO instance ", index, " is not bound"),
            }
            index += 1;
        }
        VectorTable::new(entries)
    }
}

impl<const N: usize> Default for VectorTableBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}

// Placeholder while building; never ends up in a table.
extern "C" fn unbound() {}

/// Defines the interrupt entry points of a static
/// [`TransferEngine`](crate::TransferEngine) and the [`VectorTable`] binding them.
///
/// Each entry point calls [`on_interrupt()`](crate::TransferEngine::on_interrupt) on the
/// engine for its instance. Attributes written before a handler name (e.g., `#[no_mangle]`
/// to override a weak vector symbol) are applied to the generated function.
///
/// ```ignore
/// flexio_spi::flexio_spi_irq_handlers! {
///     pub static VECTORS = ENGINE;
///     #[no_mangle] FLEXIO0_IRQHandler => 0,
///     #[no_mangle] FLEXIO1_IRQHandler => 1,
/// }
/// ```
#[macro_export]
macro_rules! flexio_spi_irq_handlers {
    (
        $vis:vis static $table:ident = $engine:path;
        $( $(#[$meta:meta])* $handler:ident => $instance:literal ),+ $(,)?
    ) => {
        $(
            $(#[$meta])*
            #[doc = concat!("FlexIO SPI interrupt entry point of instance ", stringify!($instance), ".")]
            #[allow(non_snake_case)]
            $vis extern "C" fn $handler() {
                $engine.on_interrupt($crate::Instance::new($instance));
            }
        )+

        $vis static $table: $crate::VectorTable<{ [$( $instance ),+].len() }> =
            $crate::VectorTableBuilder::new()
                $( .bind($crate::Instance::new($instance), $handler) )+
                .build();
    };
}
