#![allow(dead_code)]

use std::cell::RefCell;

use bus_arbiter::{
    ActivitySense, ArbiterConfig, BlockoutSource, BusArbiter, BusFactory,
    StorageStatus, UnitOfWork,
};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Mock factory
// ---------------------------------------------------------------------------

/// What happened on the mock bus lines, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    Driven,
    Floated,
}

/// A driven mock bus.
#[derive(Debug, PartialEq, Eq)]
pub struct MockBus {
    pub value: u32,
}

/// Neutral pins needed to drive a MockBus.
pub struct MockPins {
    pub value: u32,
    /// If set, the next `create` call fails.
    pub fail_next: bool,
}

/// Destructor token; holds the value so the pins can be recovered.
pub struct MockDestructor {
    value: u32,
}

#[derive(Debug, PartialEq)]
pub struct MockError;

// BusFactory has no instance, so line activity is tracked per test thread.
std::thread_local! {
    static LINES: RefCell<Vec<LineEvent>> = const { RefCell::new(Vec::new()) };
}

pub fn reset_lines() {
    LINES.with(|l| l.borrow_mut().clear());
}

pub fn line_events() -> Vec<LineEvent> {
    LINES.with(|l| l.borrow().clone())
}

/// Whether the mock lines are currently driven.
pub fn lines_driven() -> bool {
    LINES.with(|l| l.borrow().last() == Some(&LineEvent::Driven))
}

pub fn count(event: LineEvent) -> usize {
    LINES.with(|l| l.borrow().iter().filter(|e| **e == event).count())
}

pub struct MockFactory;

impl BusFactory for MockFactory {
    type Bus = MockBus;
    type Resources = MockPins;
    type Destructor = MockDestructor;
    type Error = MockError;

    fn create(
        resources: Self::Resources,
    ) -> Result<(Self::Bus, Self::Destructor), (Self::Error, Self::Resources)>
    {
        if resources.fail_next {
            return Err((
                MockError,
                MockPins { value: resources.value, fail_next: false },
            ));
        }
        assert!(!lines_driven(), "bus driven twice");
        LINES.with(|l| l.borrow_mut().push(LineEvent::Driven));
        Ok((
            MockBus { value: resources.value },
            MockDestructor { value: resources.value },
        ))
    }

    fn recover(destructor: Self::Destructor) -> Self::Resources {
        LINES.with(|l| l.borrow_mut().push(LineEvent::Floated));
        MockPins { value: destructor.value, fail_next: false }
    }
}

// ---------------------------------------------------------------------------
// Mock unit of work
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub struct WorkFailed;

/// Records how the gate treated it.
#[derive(Default)]
pub struct MockWork {
    pub fail: bool,
    pub executed: usize,
    pub saw_driven_lines: bool,
    pub rejected: Option<StorageStatus>,
}

impl MockWork {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }
}

impl UnitOfWork<MockBus> for MockWork {
    type Error = WorkFailed;

    async fn execute(&mut self, _bus: &mut MockBus) -> Result<(), WorkFailed> {
        self.executed += 1;
        self.saw_driven_lines = lines_driven();
        if self.fail {
            Err(WorkFailed)
        } else {
            Ok(())
        }
    }

    fn reject(&mut self, status: StorageStatus) {
        self.rejected = Some(status);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub type Sense = ActivitySense<NoopRawMutex>;
pub type Arbiter<'a> = BusArbiter<'a, NoopRawMutex, MockFactory>;

pub const WINDOW: Duration = Duration::from_secs(20);

pub fn at_ms(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

/// An edge whose handler started waiting just before it.
pub fn edge(sense: &Sense, at: Instant) -> bool {
    sense.on_edge(sense.epoch(), at)
}

pub fn make_arbiter<'a>(
    sense: &'a Sense,
    source: BlockoutSource,
    fail_next: bool,
) -> Arbiter<'a> {
    reset_lines();
    BusArbiter::new(
        MockPins { value: 42, fail_next },
        sense,
        ArbiterConfig::new(source).with_window(WINDOW),
    )
}
