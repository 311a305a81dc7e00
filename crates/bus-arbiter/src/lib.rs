#![no_std]
//! Ownership arbitration for an SPI bus shared with a second, non-cooperative
//! master.
//!
//! The local master may only drive the bus between [`BusArbiter::acquire`]
//! and the matching release; outside that span every local line is a
//! neutral input. A blockout deadline, armed by chip-select edges of the
//! other master or by a fixed pre-roll at boot, predicts when the other
//! master is probably busy. [`RequestGate`] applies both to every unit of
//! work before it may touch the storage medium.

mod arbiter;
mod config;
mod error;
mod factory;
mod gate;
mod handle;
mod sense;

pub use arbiter::{BusArbiter, BusOwnership};
pub use config::{ArbiterConfig, BlockoutSource, BLOCKOUT_WINDOW};
pub use error::{BusError, StorageStatus};
pub use factory::BusFactory;
pub use gate::{Admission, MediumReadiness, RequestGate, UnitOfWork};
pub use handle::OwnedBus;
pub use sense::{ActivitySense, HoldEpoch};
