//! File-service boundary.
//!
//! The network transport (not part of this firmware) turns client requests
//! into [`FileRequest`]s on [`REQUEST_CHAN`] and picks up [`FileReply`]s from
//! [`REPLY_CHAN`]. Requests are served by `sd_bridge_service` through the
//! [`RequestGate`](bus_arbiter::RequestGate).

use crate::tasks::led::{led, LedEvent};
use bus_arbiter::{StorageStatus, UnitOfWork};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use sd_bridge_bsp::SdVolumes;

pub use sd_bridge_service::{
    FileBody, FileOp, FileReply, FileRequest, MountCheck, PendingRequest,
    ServiceStatus,
};

const QUEUE_DEPTH: usize = 4;

pub static REQUEST_CHAN: Channel<
    CriticalSectionRawMutex,
    FileRequest,
    QUEUE_DEPTH,
> = Channel::new();
pub static REPLY_CHAN: Channel<CriticalSectionRawMutex, FileReply, QUEUE_DEPTH> =
    Channel::new();

/// Error of a unit of work run against the card.
pub type ServiceError =
    sd_bridge_service::ServiceError<embedded_sdmmc::SdCardError>;

/// Lights the LED for as long as the wrapped work runs under ownership.
pub struct Indicated<W>(pub W);

impl<W: UnitOfWork<SdVolumes>> UnitOfWork<SdVolumes> for Indicated<W> {
    type Error = W::Error;

    async fn execute(&mut self, volumes: &mut SdVolumes) -> Result<(), W::Error> {
        led(LedEvent::On);
        self.0.execute(volumes).await
    }

    fn reject(&mut self, status: StorageStatus) {
        self.0.reject(status);
    }
}
