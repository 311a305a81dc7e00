/// Errors that can occur while taking the shared bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError<E: core::fmt::Debug> {
    /// The bus factory failed to drive the lines.
    FactoryError(E),
    /// The local master already holds the bus.
    AlreadyHeld,
    /// Arbiter is in an unrecoverable state.
    Poisoned,
}

/// Why the gate refused a unit of work.
///
/// The two kinds belong to distinct status classes so a requester can tell
/// "do not retry" apart from "retry later".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageStatus {
    /// The medium never became ready. Fatal until restart.
    StorageFailed,
    /// The other master is believed to be using the bus.
    StorageBusy,
}

impl StorageStatus {
    /// Returns `true` if the requester may retry the same operation later.
    pub const fn is_retryable(self) -> bool {
        matches!(self, StorageStatus::StorageBusy)
    }
}
