//! Event pump and exam clock.
//!
//! The runner turns terminal input into [`AppEvent`]s and wakes up every
//! [`TICK_RATE`] so the UI can redraw the clock. The clock itself is a
//! [`SessionTimer`] measured against wall time, so a burst of key presses
//! neither stalls it nor lets idle time leak into an exam that has not
//! started yet.

use std::io;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// How long the runner waits for input before yielding a tick.
pub const TICK_RATE: Duration = Duration::from_millis(100);

/// Period of the exam clock.
pub const SESSION_TICK: Duration = Duration::from_secs(1);

#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Anything that can hand the runner input events.
pub trait EventSource {
    /// Waits up to `timeout`. `Ok(None)` means nothing relevant arrived.
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<AppEvent>>;
}

/// Reads the real terminal through crossterm.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<AppEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(match event::read()? {
            // key releases are reported on some platforms; only presses count
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
            Event::Resize(_, _) => Some(AppEvent::Resize),
            _ => None,
        })
    }
}

/// Scripted input for headless runs: whatever was sent on the channel, in
/// order, then ticks.
impl EventSource for Receiver<AppEvent> {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<AppEvent>> {
        match self.recv_timeout(timeout) {
            Ok(ev) => Ok(Some(ev)),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => Ok(None),
        }
    }
}

pub struct Runner<E> {
    events: E,
    tick_rate: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(events: E) -> Self {
        Self::with_tick_rate(events, TICK_RATE)
    }

    pub fn with_tick_rate(events: E, tick_rate: Duration) -> Self {
        Self { events, tick_rate }
    }

    /// Next input event, or `Tick` once the tick rate passes without one.
    pub fn step(&mut self) -> io::Result<AppEvent> {
        Ok(self
            .events
            .next_event(self.tick_rate)?
            .unwrap_or(AppEvent::Tick))
    }
}

/// Cancellable periodic task feeding whole periods into an exam clock.
///
/// Armed when a session enters ACTIVE and disarmed when it leaves it or is
/// torn down. Arming sets the baseline instant, so nothing that happened
/// before counts; a disarmed timer never yields ticks and forgets any
/// partial period.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    period: Duration,
    pending: Duration,
    last_poll: Option<Instant>,
}

impl SessionTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            pending: Duration::ZERO,
            last_poll: None,
        }
    }

    pub fn arm(&mut self) {
        self.arm_at(Instant::now());
    }

    pub fn arm_at(&mut self, now: Instant) {
        self.pending = Duration::ZERO;
        self.last_poll = Some(now);
    }

    pub fn disarm(&mut self) {
        self.pending = Duration::ZERO;
        self.last_poll = None;
    }

    pub fn is_armed(&self) -> bool {
        self.last_poll.is_some()
    }

    /// Whole periods due between the previous poll (or arming) and `now`.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(last) = self.last_poll else {
            return 0;
        };
        self.last_poll = Some(now.max(last));
        self.advance(now.saturating_duration_since(last))
    }

    /// Adds `elapsed` and returns how many full periods are due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.is_armed() || self.period.is_zero() {
            return 0;
        }

        self.pending += elapsed;
        let mut due = 0;
        while self.pending >= self.period {
            self.pending -= self.period;
            due += 1;
        }
        due
    }
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new(SESSION_TICK)
    }
}
