use embassy_time::Duration;

/// How long the bus is assumed busy after the other master was seen.
///
/// Long enough to outlast a typical read burst by the printer controller.
pub const BLOCKOUT_WINDOW: Duration = Duration::from_secs(20);

/// Where blockout deadlines come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlockoutSource {
    /// Edges on a sense line wired to the other master's chip-select arm the
    /// deadline while the firmware runs.
    SenseLine,
    /// No sense line. Only the startup pre-roll arms a deadline; edge events
    /// are drained and discarded.
    PrerollOnly,
}

/// Arbiter tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ArbiterConfig {
    pub blockout_window: Duration,
    pub source: BlockoutSource,
}

impl ArbiterConfig {
    pub const fn new(source: BlockoutSource) -> Self {
        Self { blockout_window: BLOCKOUT_WINDOW, source }
    }

    pub const fn with_window(mut self, window: Duration) -> Self {
        self.blockout_window = window;
        self
    }
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self::new(BlockoutSource::PrerollOnly)
    }
}
