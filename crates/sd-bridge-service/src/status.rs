use core::fmt::Debug;

use bus_arbiter::StorageStatus;

use crate::path::InvalidPath;

/// Transport-level status for a request that did not produce a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServiceStatus {
    pub code: &'static str,
    pub message: &'static str,
}

impl ServiceStatus {
    pub const NOT_FOUND: Self =
        Self { code: "404 Not Found", message: "No such file" };
    pub const IS_DIRECTORY: Self =
        Self { code: "400 Bad Request", message: "Is a directory" };
    pub const CARD_ERROR: Self =
        Self { code: "500 Internal Server Error", message: "SD card error" };
}

impl From<StorageStatus> for ServiceStatus {
    fn from(status: StorageStatus) -> Self {
        match status {
            StorageStatus::StorageFailed => ServiceStatus {
                code: "500 Internal Server Error",
                message: "Failed to initialize SD Card",
            },
            StorageStatus::StorageBusy => ServiceStatus {
                code: "503 Service Unavailable",
                message: "Printer is reading from SD card",
            },
        }
    }
}

/// Failure of a unit of work after the bus was acquired.
#[derive(Debug)]
pub enum ServiceError<E: Debug> {
    Storage(embedded_sdmmc::Error<E>),
    InvalidPath,
}

impl<E: Debug> From<embedded_sdmmc::Error<E>> for ServiceError<E> {
    fn from(e: embedded_sdmmc::Error<E>) -> Self {
        ServiceError::Storage(e)
    }
}

impl<E: Debug> From<InvalidPath> for ServiceError<E> {
    fn from(_: InvalidPath) -> Self {
        ServiceError::InvalidPath
    }
}

impl<E: Debug> ServiceError<E> {
    pub fn status(&self) -> ServiceStatus {
        use embedded_sdmmc::Error;

        match self {
            ServiceError::InvalidPath
            | ServiceError::Storage(Error::NotFound)
            | ServiceError::Storage(Error::FilenameError(_))
            | ServiceError::Storage(Error::OpenedFileAsDir) => {
                ServiceStatus::NOT_FOUND
            }
            ServiceError::Storage(Error::OpenedDirAsFile) => {
                ServiceStatus::IS_DIRECTORY
            }
            ServiceError::Storage(_) => ServiceStatus::CARD_ERROR,
        }
    }
}
