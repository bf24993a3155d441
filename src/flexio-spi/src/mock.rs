//! Register model recording every access, for unit tests.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    vec::Vec,
};

use crate::{Instance, InterruptSources, Registers, StatusFlags};

/// Single-instance register model: the status is whatever the test sets, received bytes
/// come from a queue, transmitted bytes are logged.
#[derive(Default)]
pub(crate) struct MockRegisters {
    status: Cell<StatusFlags>,
    rx_queue: RefCell<VecDeque<u8>>,
    writes: RefCell<Vec<u8>>,
    enabled: Cell<InterruptSources>,
    disabled: Cell<InterruptSources>,
    cleared_errors: Cell<usize>,
    accesses: Cell<usize>,
}

impl MockRegisters {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_status(&self, status: StatusFlags) {
        self.status.set(status);
    }

    pub(crate) fn push_rx(&self, bytes: &[u8]) {
        self.rx_queue.borrow_mut().extend(bytes);
    }

    pub(crate) fn writes(&self) -> Vec<u8> {
        self.writes.borrow().clone()
    }

    /// Currently enabled interrupt sources.
    pub(crate) fn enabled(&self) -> InterruptSources {
        self.enabled.get()
    }

    /// Every source that was disabled at least once.
    pub(crate) fn disabled(&self) -> InterruptSources {
        self.disabled.get()
    }

    pub(crate) fn cleared_errors(&self) -> usize {
        self.cleared_errors.get()
    }

    /// Number of register accesses of any kind.
    pub(crate) fn accesses(&self) -> usize {
        self.accesses.get()
    }

    fn count(&self) {
        self.accesses.set(self.accesses.get() + 1);
    }
}

impl Registers for MockRegisters {
    fn read_status(&self, _instance: Instance) -> StatusFlags {
        self.count();
        self.status.get()
    }

    fn write_tx_data(&self, _instance: Instance, byte: u8) {
        self.count();
        self.writes.borrow_mut().push(byte);
    }

    fn read_rx_data(&self, _instance: Instance) -> u8 {
        self.count();
        self.rx_queue
            .borrow_mut()
            .pop_front()
            .expect("read from an empty receive buffer")
    }

    fn clear_error(&self, _instance: Instance) {
        self.count();
        self.cleared_errors.set(self.cleared_errors.get() + 1);
        self.status
            .set(self.status.get().difference(StatusFlags::ERRORS));
    }

    fn enable_interrupt_sources(&self, _instance: Instance, sources: InterruptSources) {
        self.count();
        self.enabled.set(self.enabled.get() | sources);
    }

    fn disable_interrupt_sources(&self, _instance: Instance, sources: InterruptSources) {
        self.count();
        self.enabled.set(self.enabled.get().difference(sources));
        self.disabled.set(self.disabled.get() | sources);
    }
}
