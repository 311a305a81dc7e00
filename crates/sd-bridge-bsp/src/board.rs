use embassy_nrf::interrupt::Priority;
use embassy_nrf::peripherals::{self, P0_30, P1_11, WDT};
use embassy_nrf::Peri;

/// Lines of the SD card bus shared with the printer controller.
///
/// While held here the pins are untouched, i.e. disconnected inputs.
pub struct SdBusResources {
    pub sclk: Peri<'static, peripherals::P1_15>,
    pub mosi: Peri<'static, peripherals::P1_13>,
    pub miso: Peri<'static, peripherals::P1_14>,
    pub cs: Peri<'static, peripherals::P1_12>,
    pub spim: Peri<'static, peripherals::SPI2>,
}

/// Represents all the peripherals and pins used by the SD bridge.
pub struct SdBridge {
    /// Peripherals for the shared SD card bus.
    pub sd_bus: SdBusResources,
    /// Sense input wired to the printer controller's SD chip-select.
    pub cs_sense: Peri<'static, P0_30>,
    /// Status LED, active low.
    pub led: Peri<'static, P1_11>,
    /// Watchdog Timer.
    pub wdt: Peri<'static, WDT>,
}

impl Default for SdBridge {
    fn default() -> Self {
        let mut config = embassy_nrf::config::Config::default();
        config.gpiote_interrupt_priority = Priority::P2;
        config.time_interrupt_priority = Priority::P2;
        Self::new(config)
    }
}

impl SdBridge {
    /// Create a new instance based on HAL configuration
    pub fn new(config: embassy_nrf::config::Config) -> Self {
        let p = embassy_nrf::init(config);

        Self {
            sd_bus: SdBusResources {
                sclk: p.P1_15,
                mosi: p.P1_13,
                miso: p.P1_14,
                cs: p.P1_12,
                spim: p.SPI2,
            },
            cs_sense: p.P0_30,
            led: p.P1_11,
            wdt: p.WDT,
        }
    }
}
