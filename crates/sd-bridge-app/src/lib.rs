#![no_std]

mod fmt;

pub mod bus;
pub mod service;
pub mod tasks;

pub const FW_VERSION: &str = env!("FW_VERSION");

pub mod prelude {
    pub use super::{
        bus::*, debug, error, info, service::*, tasks::*, warn, FW_VERSION,
    };
    pub use embassy_executor::Spawner;
    pub use embassy_nrf::gpio::Pin;
    pub use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    pub use embassy_time::{Duration, Timer};

    pub use sd_bridge_bsp::{SdBridge, SdBusResources};
}
