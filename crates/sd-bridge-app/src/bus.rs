//! SD bus arbitration for the bridge
//!
//! Thin type aliases over the generic `bus_arbiter` crate, specialized for
//! the SPI2 bus shared with the printer controller.

use bus_arbiter::{
    ActivitySense, ArbiterConfig, BlockoutSource, BusArbiter, RequestGate,
};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use sd_bridge_bsp::{SdBusFactory, SdBusResources};

/// Mailbox fed by the chip-select sense task.
pub static SENSE: ActivitySense<CriticalSectionRawMutex> = ActivitySense::new();

/// Arbiter for the shared SD bus.
pub type SdArbiter = BusArbiter<'static, CriticalSectionRawMutex, SdBusFactory>;

/// Gate consulted for every file-service request.
pub type SdGate = RequestGate<'static, CriticalSectionRawMutex, SdBusFactory>;

/// Where blockout deadlines come from in this build.
pub const fn arbiter_config() -> ArbiterConfig {
    if cfg!(feature = "cs-sense") {
        ArbiterConfig::new(BlockoutSource::SenseLine)
    } else {
        ArbiterConfig::new(BlockoutSource::PrerollOnly)
    }
}

pub fn sd_gate(resources: SdBusResources) -> SdGate {
    RequestGate::new(SdArbiter::new(resources, &SENSE, arbiter_config()))
}
