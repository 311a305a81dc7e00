#![no_std]
//! File requests served from the SD card while the bridge owns the bus.
//!
//! Every request is a single-shot [`UnitOfWork`](bus_arbiter::UnitOfWork):
//! the gate either runs it against the mounted volume or rejects it, and
//! [`PendingRequest::into_reply`] turns the outcome into a [`FileReply`] for
//! the transport.

mod path;
mod request;
mod status;

pub use path::{FilePath, InvalidPath};
pub use request::{
    EntryInfo, FileBody, FileOp, FileReply, FileRequest, MountCheck,
    PendingRequest, CHUNK_LEN, MAX_NAME_LEN, MAX_PATH_LEN,
};
pub use status::{ServiceError, ServiceStatus};
