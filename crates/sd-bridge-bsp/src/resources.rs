use crate::board::SdBusResources;
use bus_arbiter::BusFactory;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Level, Output, OutputDrive},
    interrupt::{self, InterruptExt},
    peripherals, spim,
};
use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_sdmmc::{SdCard, TimeSource, Timestamp, VolumeManager};

bind_interrupts!(struct SpiIrq {
    SPI2 => spim::InterruptHandler<peripherals::SPI2>;
});

/// SPI device for the card, owning the local chip-select.
pub type SdSpi =
    ExclusiveDevice<spim::Spim<'static>, Output<'static>, embassy_time::Delay>;

pub type SdBlockDevice = SdCard<SdSpi, embassy_time::Delay>;

/// Filesystem access to the card while the local master drives the bus.
pub type SdVolumes = VolumeManager<SdBlockDevice, FixedTimeSource>;

/// Error returned by filesystem operations on the card.
pub type SdError = embedded_sdmmc::Error<embedded_sdmmc::SdCardError>;

/// The bridge never writes, so file timestamps are never consulted.
pub struct FixedTimeSource;

impl TimeSource for FixedTimeSource {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 54,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

/// Destructor token for recovering the SD bus pins.
pub struct SdBusDestructor;

/// Drives the SD bus from its neutral pins and floats it again.
pub struct SdBusFactory;

impl BusFactory for SdBusFactory {
    type Bus = SdVolumes;
    type Resources = SdBusResources;
    type Destructor = SdBusDestructor;
    type Error = core::convert::Infallible;

    fn create(
        resources: Self::Resources,
    ) -> Result<(Self::Bus, Self::Destructor), (Self::Error, Self::Resources)>
    {
        let mut config = spim::Config::default();
        config.mode = spim::MODE_0;
        config.frequency = spim::Frequency::M8;
        interrupt::SPI2.set_priority(interrupt::Priority::P3);

        // Our chip-select becomes an output, idle high.
        let cs = Output::new(resources.cs, Level::High, OutputDrive::Standard);
        let spi = spim::Spim::new(
            resources.spim,
            SpiIrq,
            resources.sclk,
            resources.miso,
            resources.mosi,
            config,
        );
        let spi = match ExclusiveDevice::new(spi, cs, embassy_time::Delay) {
            Ok(spi) => spi,
            Err(e) => match e {},
        };

        // The card is re-initialised lazily on first access after every
        // acquisition, since the printer may have reset it in between.
        let card = SdCard::new(spi, embassy_time::Delay);
        Ok((VolumeManager::new(card, FixedTimeSource), SdBusDestructor))
    }

    fn recover(_destructor: Self::Destructor) -> Self::Resources {
        // SAFETY: The bus has been dropped before `recover` is called. Dropping
        // the SPIM and the chip-select output returned their pins to
        // disconnected inputs, and no other code holds these peripherals.
        unsafe {
            SdBusResources {
                sclk: peripherals::P1_15::steal(),
                mosi: peripherals::P1_13::steal(),
                miso: peripherals::P1_14::steal(),
                cs: peripherals::P1_12::steal(),
                spim: peripherals::SPI2::steal(),
            }
        }
    }
}
