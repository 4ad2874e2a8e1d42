//! # uart-dma
//!
//! A `no_std`, zero-allocation buffering layer between application code
//! and a DMA-capable serial port. Applications get non-blocking
//! `send`/`receive` calls over byte FIFOs; the hardware gets exactly one
//! outstanding transfer per direction, kept fed from the completion
//! interrupt. Transmit drains chunk by chunk until its FIFO runs dry;
//! receive keeps a one-byte transfer armed at all times by ping-ponging
//! between two landing slots, so no inbound byte is missed while the
//! foreground drains at its own pace.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Status | [`error`] | [`Error`] and the crate [`Result`] alias |
//! | Buffering | [`fifo`] | [`Fifo`], the quantized circular byte buffer |
//! | Formatting | [`fmt`] | [`FmtBuf`], bounded truncating `core::fmt` sink |
//! | Hardware seam | [`engine`] | [`TransferEngine`] trait and completion tags |
//! | Orchestration | [`driver`] | [`UartDma`]: buffered send, perpetual receive |
//! | Sharing | [`shared`] | [`SharedUartDma`]: one `static` per port |
//!
//! ## Quick start
//!
//! ```ignore
//! use uart_dma::{SharedUartDma, TransferEvent};
//!
//! // One shared instance per hardware port:
//! // 512 B transmit FIFO, 64 B receive FIFO, 32 B transfer chunks.
//! static CONSOLE: SharedUartDma<UartEngine, 512, 64, 32> = SharedUartDma::new();
//!
//! // After clocks, pins and DMA channels are configured:
//! CONSOLE.init(engine)?;
//! CONSOLE.send(b"boot\r\n")?;
//! CONSOLE.send_fmt(format_args!("fw {}\r\n", VERSION))?;
//!
//! // In the UART/DMA interrupt handler:
//! let _ = CONSOLE.on_event(TransferEvent::TxIdle);
//!
//! // Poll for input wherever convenient:
//! let mut buf = [0u8; 16];
//! let n = CONSOLE.receive(&mut buf)?;
//! ```
//!
//! ## Execution model
//!
//! Exactly two contexts touch a port: one foreground caller and one
//! interrupt dispatcher. [`SharedUartDma`] runs every call inside a
//! `critical-section` critical section, so neither side ever observes
//! the other's half-finished update. No call blocks, allocates, or
//! loops unboundedly; everything is safe to use from the tightest
//! interrupt handler. On bare metal, link a `critical-section`
//! implementation (for single-core Cortex-M, the `cortex-m` crate's
//! `critical-section-single-core` feature); the test suite runs on the
//! host with the `std` implementation.
//!
//! A full receive FIFO drops the newest byte, like a UART overrun, and
//! counts it in [`UartDma::rx_overruns`]. A full transmit FIFO accepts
//! fewer bytes than offered and reports the count; the caller decides
//! whether to retry or drop.
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `defmt` | no | `defmt::Format` on [`Error`], [`TransferEvent`] and [`Busy`] |

#![no_std]

pub mod error;
pub mod fifo;
pub mod fmt;
pub mod engine;
pub mod driver;
pub mod shared;

#[cfg(test)]
mod mock;

#[cfg(test)]
mod integration_tests;

pub use driver::{UartDma, FMT_SCRATCH};
pub use engine::{Busy, TransferEngine, TransferEvent};
pub use error::{Error, Result};
pub use fifo::Fifo;
pub use fmt::FmtBuf;
pub use shared::SharedUartDma;
