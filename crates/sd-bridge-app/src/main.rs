#![no_std]
#![no_main]

#[cfg(feature = "defmt")]
use defmt_rtt as _;
#[cfg(feature = "defmt")]
use panic_probe as _;
#[cfg(not(feature = "defmt"))]
use panic_reset as _;

use sd_bridge_app::prelude::*;

// Application main entry point. The spawner can be used to start async tasks.
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("SD bridge {}", FW_VERSION);
    let board = SdBridge::default();

    spawner.must_spawn(watchdog_task(board.wdt));
    spawner.must_spawn(led_task(board.led.into()));

    #[cfg(feature = "cs-sense")]
    spawner.must_spawn(sense_task(board.cs_sense.into()));
    #[cfg(not(feature = "cs-sense"))]
    let _ = board.cs_sense;

    spawner.must_spawn(serve_task(board.sd_bus));
}
