//! Interrupt-driven master transfers for SPI emulated on FlexIO.
//!
//! This crate provides the part of a FlexIO SPI master driver that runs from the
//! interrupt handler:
//!
//! - [`VectorTable`], an immutable mapping from peripheral [`Instance`] to the interrupt
//!   entry point serving it, validated when it is built in a `const` context.
//! - [`TransferEngine`], the per-instance transfer state machine. A transfer is started
//!   from thread context with [`TransferEngine::start_transfer()`], then advanced by one
//!   byte per direction on every interrupt through [`TransferEngine::on_interrupt()`], until
//!   it completes or the hardware reports an error.
//!
//! Register access is delegated to an implementation of [`Registers`]. Clock, pin and
//! interrupt priority setup happen elsewhere.
//!
//! # Example
//!
//! ```ignore
//! static ENGINE: TransferEngine<'static, Flexio, 1> =
//!     TransferEngine::new(Flexio::new(), Config::new());
//!
//! flexio_spi::flexio_spi_irq_handlers! {
//!     pub static VECTORS = ENGINE;
//!     #[no_mangle] FLEXIO_SPI_IRQHandler => 0,
//! }
//!
//! static DONE: CompletionSignal = CompletionSignal::new();
//!
//! ENGINE.start_transfer(Instance::new(0), Some(&COMMAND), None, COMMAND.len(), Some(&DONE))?;
//! let outcome = DONE.wait().await;
//! let released = ENGINE.reset(Instance::new(0))?;
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![deny(clippy::pedantic)]

mod config;
mod context;
mod engine;
mod error;
mod instance;
mod notify;
mod regs;
mod vector;

#[cfg(test)]
mod mock;

pub use config::{Config, DEFAULT_DUMMY_BYTE};
pub use context::{Released, State, TransferStatus};
pub use engine::TransferEngine;
pub use error::{Error, HardwareError};
pub use instance::{Instance, INSTANCE_COUNT};
pub use notify::{CompletionFlag, CompletionSignal, Notify, Outcome};
pub use regs::{InterruptSources, Registers, StatusFlags};
pub use vector::{Handler, VectorTable, VectorTableBuilder};
