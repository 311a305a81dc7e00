use crate::prelude::*;
use embassy_nrf::peripherals::WDT;
use embassy_nrf::wdt;
use embassy_nrf::wdt::Watchdog;
use embassy_nrf::Peri;

pub mod led;
pub mod serve;

// Re-exports
pub use led::*;
pub use serve::*;

// Keeps our system alive
#[embassy_executor::task]
pub async fn watchdog_task(wdt: Peri<'static, WDT>) {
    let Ok(wdt_config) = wdt::Config::try_new(&wdt) else {
        error!("Watchdog config unavailable");
        return;
    };
    let (_wdt, [mut handle]) = match Watchdog::try_new(wdt, wdt_config) {
        Ok(x) => x,
        Err(_) => {
            // Already running with another handle count, let it time out.
            loop {
                cortex_m::asm::wfe();
            }
        }
    };
    loop {
        handle.pet();
        Timer::after(Duration::from_secs(2)).await;
    }
}

/// Forwards falling edges on the printer's chip-select to the arbiter.
#[cfg(feature = "cs-sense")]
#[embassy_executor::task]
pub async fn sense_task(pin: Peri<'static, embassy_nrf::gpio::AnyPin>) {
    use crate::bus::SENSE;
    use embassy_nrf::gpio::{Input, Pull};
    use embassy_time::Instant;

    let mut cs = Input::new(pin, Pull::Up);
    loop {
        let since = SENSE.epoch();
        cs.wait_for_falling_edge().await;
        if SENSE.on_edge(since, Instant::now()) {
            debug!("Printer selected the card");
        }
    }
}
