use crate::bus::sd_gate;
use crate::prelude::*;
use crate::service::{
    Indicated, MountCheck, PendingRequest, REPLY_CHAN, REQUEST_CHAN,
};
use crate::tasks::led::{led, LedEvent, BLINK_PERIOD};
use bus_arbiter::{Admission, MediumReadiness, StorageStatus};
use embassy_time::{with_timeout, Instant};

/// Mounts the card once the printer has had its turn, then admits file
/// requests one at a time.
#[embassy_executor::task]
pub async fn serve_task(resources: SdBusResources) {
    let mut gate = sd_gate(resources);
    gate.arbiter_mut().arm_preroll(Instant::now());
    info!("Waiting for the printer before mounting");

    loop {
        match gate.mount(Instant::now(), &mut Indicated(MountCheck)).await {
            MediumReadiness::NotInitialized => {
                led(LedEvent::Blink);
                Timer::after(BLINK_PERIOD).await;
            }
            MediumReadiness::Ready => {
                info!("SD card mounted");
                led(LedEvent::Off);
                break;
            }
            MediumReadiness::FailedPermanently => {
                error!("SD card mount failed");
                led(LedEvent::ErrorBlink);
                break;
            }
        }
    }

    loop {
        // Blink for as long as the printer is believed to hold the bus.
        let request =
            match with_timeout(BLINK_PERIOD, REQUEST_CHAN.receive()).await {
                Ok(request) => request,
                Err(_) => {
                    if gate.is_blocked(Instant::now()) {
                        led(LedEvent::Blink);
                    }
                    continue;
                }
            };
        let mut pending = Indicated(PendingRequest::new(request));
        debug!("Request {}", pending.0.id());

        let reply = match gate.admit(Instant::now(), &mut pending).await {
            Admission::Completed => {
                led(LedEvent::Off);
                pending.0.into_reply::<embedded_sdmmc::SdCardError>(None)
            }
            Admission::Failed(e) => {
                led(LedEvent::Off);
                warn!("Request {} failed", pending.0.id());
                pending.0.into_reply(Some(e))
            }
            Admission::Rejected(status) => {
                if status == StorageStatus::StorageBusy {
                    led(LedEvent::Blink);
                }
                pending.0.into_reply::<embedded_sdmmc::SdCardError>(None)
            }
        };
        REPLY_CHAN.send(reply).await;
    }
}
