use crate::prelude::*;
use embassy_nrf::gpio::{AnyPin, Level, Output, OutputDrive};
use embassy_nrf::Peri;
use embassy_sync::channel::Channel;

pub static LED_CHAN: Channel<CriticalSectionRawMutex, LedEvent, 4> =
    Channel::new();

/// One on/off cycle of the waiting blink.
pub const BLINK_PERIOD: Duration = Duration::from_millis(500);

const BLINK_ON: Duration = Duration::from_millis(100);
const ERROR_ON: Duration = Duration::from_millis(50);
const ERROR_CYCLES: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedEvent {
    /// Solid while the bridge drives the SD bus.
    On,
    Off,
    /// Waiting for the printer, or a request was turned away.
    Blink,
    /// The card could not be mounted.
    ErrorBlink,
}

/// Queue an indicator change. Dropped if the queue is full.
pub fn led(evt: LedEvent) {
    if LED_CHAN.try_send(evt).is_err() {
        debug!("LED queue full, dropping {:?}", evt);
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum LedMode {
    Off,
    Solid,
    Flashing {
        on_time: Duration,
        off_time: Duration,
        remaining: Option<u32>,
    },
}

struct LedState {
    mode: LedMode,
}

impl LedState {
    fn new() -> Self {
        Self { mode: LedMode::Off }
    }

    fn handle_event(&mut self, evt: LedEvent) {
        self.mode = match evt {
            LedEvent::On => LedMode::Solid,
            LedEvent::Off => LedMode::Off,
            LedEvent::Blink => LedMode::Flashing {
                on_time: BLINK_ON,
                off_time: BLINK_PERIOD - BLINK_ON,
                remaining: Some(1),
            },
            LedEvent::ErrorBlink => LedMode::Flashing {
                on_time: ERROR_ON,
                off_time: ERROR_ON,
                remaining: Some(ERROR_CYCLES),
            },
        };
    }

    async fn update(&mut self, out: &mut Output<'_>) {
        // Active low.
        match &mut self.mode {
            LedMode::Off => out.set_high(),
            LedMode::Solid => out.set_low(),
            LedMode::Flashing { on_time, off_time, remaining } => {
                out.set_low();
                Timer::after(*on_time).await;
                out.set_high();
                Timer::after(*off_time).await;

                if let Some(cycles) = remaining.as_mut() {
                    *cycles = cycles.saturating_sub(1);
                    if *cycles == 0 {
                        self.mode = LedMode::Off;
                    }
                }
            }
        }
    }

    fn is_flashing(&self) -> bool {
        matches!(self.mode, LedMode::Flashing { .. })
    }
}

#[embassy_executor::task]
pub async fn led_task(pin: Peri<'static, AnyPin>) {
    let receiver = LED_CHAN.receiver();
    let mut out = Output::new(pin, Level::High, OutputDrive::Standard);
    let mut state = LedState::new();

    loop {
        let evt = if state.is_flashing() {
            receiver.try_receive().ok()
        } else {
            Some(receiver.receive().await)
        };

        if let Some(evt) = evt {
            state.handle_event(evt);
        }

        state.update(&mut out).await;
    }
}
