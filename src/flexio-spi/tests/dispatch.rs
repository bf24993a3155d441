//! Drives transfers on a static engine through the generated interrupt entry points, the
//! way the interrupt controller does on target.

#![allow(clippy::indexing_slicing)]
use std::{
    sync::{
        atomic::{AtomicU8, Ordering},
        Mutex,
    },
    vec::Vec,
};

use flexio_spi::{
    CompletionFlag, CompletionSignal, Config, Instance, InterruptSources, Outcome, Registers,
    State, StatusFlags, TransferEngine, TransferStatus,
};
use static_cell::StaticCell;

const INSTANCES: usize = 2;

/// Register model shareable between "thread" and "interrupt" context.
struct SharedRegisters {
    status: [AtomicU8; INSTANCES],
    rx_data: [AtomicU8; INSTANCES],
    enabled: [AtomicU8; INSTANCES],
    writes: Mutex<Vec<(usize, u8)>>,
}

impl SharedRegisters {
    const fn new() -> Self {
        Self {
            status: [const { AtomicU8::new(0) }; INSTANCES],
            rx_data: [const { AtomicU8::new(0) }; INSTANCES],
            enabled: [const { AtomicU8::new(0) }; INSTANCES],
            writes: Mutex::new(Vec::new()),
        }
    }

    fn raise(&self, instance: Instance, status: StatusFlags) {
        self.status[instance.index()].store(status.bits(), Ordering::SeqCst);
    }

    fn feed(&self, instance: Instance, byte: u8) {
        self.rx_data[instance.index()].store(byte, Ordering::SeqCst);
    }

    fn enabled(&self, instance: Instance) -> InterruptSources {
        InterruptSources::from_bits_truncate(self.enabled[instance.index()].load(Ordering::SeqCst))
    }

    fn writes(&self, instance: Instance) -> Vec<u8> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(index, _)| *index == instance.index())
            .map(|(_, byte)| *byte)
            .collect()
    }
}

impl Registers for SharedRegisters {
    fn read_status(&self, instance: Instance) -> StatusFlags {
        StatusFlags::from_bits_truncate(self.status[instance.index()].load(Ordering::SeqCst))
    }

    fn write_tx_data(&self, instance: Instance, byte: u8) {
        self.writes.lock().unwrap().push((instance.index(), byte));
    }

    fn read_rx_data(&self, instance: Instance) -> u8 {
        self.rx_data[instance.index()].load(Ordering::SeqCst)
    }

    fn clear_error(&self, instance: Instance) {
        self.status[instance.index()].fetch_and(!StatusFlags::ERRORS.bits(), Ordering::SeqCst);
    }

    fn enable_interrupt_sources(&self, instance: Instance, sources: InterruptSources) {
        self.enabled[instance.index()].fetch_or(sources.bits(), Ordering::SeqCst);
    }

    fn disable_interrupt_sources(&self, instance: Instance, sources: InterruptSources) {
        self.enabled[instance.index()].fetch_and(!sources.bits(), Ordering::SeqCst);
    }
}

static REGISTERS: SharedRegisters = SharedRegisters::new();

static ENGINE: TransferEngine<'static, &SharedRegisters, INSTANCES> =
    TransferEngine::new(&REGISTERS, Config::new().with_dummy_byte(0xff));

flexio_spi::flexio_spi_irq_handlers! {
    static VECTORS = ENGINE;
    FLEXIO0_IRQHandler => 0,
    FLEXIO1_IRQHandler => 1,
}

const I0: Instance = Instance::new(0);
const I1: Instance = Instance::new(1);

#[test]
fn table_covers_every_instance() {
    assert_eq!(VECTORS.len(), INSTANCES);
    assert!(VECTORS.handler(I0).is_some());
    assert!(VECTORS.handler(I1).is_some());
    assert!(VECTORS.handler(Instance::new(2)).is_none());
}

#[test]
fn transmit_through_vector_table() {
    static TX: [u8; 2] = [0xAA, 0xBB];
    static DONE: CompletionSignal = CompletionSignal::new();

    ENGINE
        .start_transfer(I0, Some(&TX), None, TX.len(), Some(&DONE))
        .unwrap();
    assert!(REGISTERS.enabled(I0).contains(InterruptSources::TX_EMPTY));

    REGISTERS.raise(I0, StatusFlags::TX_EMPTY);
    assert!(VECTORS.dispatch(I0));
    assert_eq!(
        ENGINE.query_result(I0),
        Ok(TransferStatus::Busy {
            transmitted: 1,
            received: 0
        })
    );
    assert!(!DONE.signaled());

    assert!(VECTORS.dispatch(I0));
    assert_eq!(
        embassy_futures::block_on(DONE.wait()),
        Outcome::Completed {
            transmitted: 2,
            received: 0
        }
    );
    assert_eq!(REGISTERS.writes(I0), TX);
    assert_eq!(REGISTERS.enabled(I0), InterruptSources::empty());

    // Shared status flags may still fire after completion.
    assert!(VECTORS.dispatch(I0));
    assert_eq!(ENGINE.query_result(I0).unwrap().state(), State::Complete);
    assert_eq!(ENGINE.spurious_interrupts(I0), 1);

    let released = ENGINE.reset(I0).unwrap();
    assert_eq!(released.tx, Some(&TX[..]));
    assert_eq!(ENGINE.query_result(I0), Ok(TransferStatus::Idle));
}

#[test]
fn receive_with_dummy_clocking_then_fail() {
    static RX: StaticCell<[u8; 4]> = StaticCell::new();
    static DONE: CompletionFlag = CompletionFlag::new();
    let rx = RX.init([0; 4]);

    ENGINE
        .start_transfer(I1, None, Some(rx), 4, Some(&DONE))
        .unwrap();
    assert_eq!(REGISTERS.enabled(I1), InterruptSources::ALL);

    REGISTERS.feed(I1, 0x31);
    REGISTERS.raise(I1, StatusFlags::TX_EMPTY | StatusFlags::RX_FULL);
    FLEXIO1_IRQHandler();
    REGISTERS.feed(I1, 0x32);
    FLEXIO1_IRQHandler();
    assert_eq!(
        ENGINE.query_result(I1),
        Ok(TransferStatus::Busy {
            transmitted: 0,
            received: 2
        })
    );
    assert_eq!(REGISTERS.writes(I1), [0xff, 0xff]);

    REGISTERS.raise(
        I1,
        StatusFlags::TX_EMPTY | StatusFlags::RX_FULL | StatusFlags::RX_ERROR,
    );
    FLEXIO1_IRQHandler();
    assert!(DONE.is_set());
    assert_eq!(
        ENGINE.query_result(I1),
        Ok(TransferStatus::Error(
            flexio_spi::HardwareError::ReceiveOverrun
        ))
    );
    // No byte moved on the failing interrupt, and the error flag was cleared.
    assert_eq!(REGISTERS.writes(I1), [0xff, 0xff]);
    assert!(!REGISTERS
        .read_status(I1)
        .intersects(StatusFlags::ERRORS));

    let released = ENGINE.reset(I1).unwrap();
    assert_eq!(released.rx.as_deref(), Some(&[0x31, 0x32, 0, 0][..]));
}
