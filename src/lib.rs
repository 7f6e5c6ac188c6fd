//! Driver for the Silicon Labs Si4735 single-chip AM/FM/SW/LW receiver.
//!
//! The chip is controlled through a small command/response protocol: the host
//! sends an 8-byte command frame (opcode plus up to 7 argument bytes), polls a
//! status byte until the chip reports clear-to-send, and reads back a fixed
//! 16-byte response. This crate splits that into three layers:
//!
//! - [`bus`]: the wire transport. [`bus::Si4735Bus`] is the seam; a ready-made
//!   SPI-mode implementation ([`bus::SpiInterface`]) is provided on top of
//!   `embedded-hal` traits.
//! - [`driver`]: the chip driver proper ([`driver::Si4735`]): power-up,
//!   tuning, seek, volume/mute, signal quality, and the RDS polling pump.
//! - [`rds`]: the RDS group decoder and station context. Raw 4-block groups
//!   pulled from the chip are accumulated into durable station metadata
//!   (program service name, radio text, clock time, call sign, ...), readable
//!   at any time through a filtered snapshot.
//!
//! The decoder performs no I/O of its own and can be driven directly with
//! [`rds::RdsGroup`] values, which is also how the unit tests exercise it.

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod calendar;
pub mod commands;
pub mod driver;
pub mod pty;
pub mod rds;

pub use bus::{Si4735Bus, SpiInterface};
pub use driver::{Mode, Revision, Si4735, SignalQuality, TuneStatus};
pub use pty::Locale;
pub use rds::{Placeholder, RdsConfig, RdsDecoder, RdsGroup, RdsTime, StationInfo};
