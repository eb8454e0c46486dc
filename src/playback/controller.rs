use super::speed::Speed;
use crate::model::{PlaybackMode, PlaybackSnapshot, State};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, trace};

/// Repeating auto-advance timer. Dropping it cancels it.
struct Ticker {
    interval: Interval,
}

impl Ticker {
    /// First tick fires one full period after creation, never immediately.
    fn start(period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

/// Owns the timeline, the cursor into it, play/pause mode, speed and the
/// auto-advance timer.
///
/// `mode == Playing` holds exactly when a ticker is held. Every method
/// that leaves `Playing` drops the ticker and every method that enters it
/// creates one.
pub(crate) struct PlaybackController {
    timeline: Vec<State>,
    cursor: Option<usize>,
    mode: PlaybackMode,
    speed: Speed,
    ticker: Option<Ticker>,
}

impl PlaybackController {
    pub fn new(speed: Speed) -> Self {
        Self {
            timeline: Vec::new(),
            cursor: None,
            mode: PlaybackMode::Paused,
            speed,
            ticker: None,
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    #[cfg(test)]
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn current(&self) -> Option<&State> {
        self.cursor.and_then(|i| self.timeline.get(i))
    }

    fn last_index(&self) -> Option<usize> {
        self.timeline.len().checked_sub(1)
    }

    fn pause(&mut self) {
        self.ticker = None;
        self.mode = PlaybackMode::Paused;
    }

    fn play(&mut self) {
        self.ticker = Some(Ticker::start(self.speed.delay()));
        self.mode = PlaybackMode::Playing;
    }

    /// Replace the timeline wholesale. Resets the cursor and pauses.
    pub fn load_timeline(&mut self, states: Vec<State>) {
        self.pause();
        self.cursor = if states.is_empty() { None } else { Some(0) };
        self.timeline = states;
        debug!(len = self.timeline.len(), "timeline loaded");
    }

    pub fn step_forward(&mut self) -> bool {
        match (self.cursor, self.last_index()) {
            (Some(c), Some(last)) if c < last => {
                self.cursor = Some(c + 1);
                true
            }
            _ => false,
        }
    }

    pub fn step_backward(&mut self) -> bool {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                true
            }
            _ => false,
        }
    }

    pub fn jump_to_start(&mut self) -> bool {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(0);
                true
            }
            _ => false,
        }
    }

    pub fn jump_to_end(&mut self) -> bool {
        match (self.cursor, self.last_index()) {
            (Some(c), Some(last)) if c < last => {
                self.cursor = Some(last);
                true
            }
            _ => false,
        }
    }

    /// Start or stop auto-advance. No-op while the timeline is empty.
    pub fn toggle_play(&mut self) -> bool {
        match self.mode {
            PlaybackMode::Playing => {
                self.pause();
                debug!(cursor = ?self.cursor, "playback paused");
                true
            }
            PlaybackMode::Paused if self.timeline.is_empty() => false,
            PlaybackMode::Paused => {
                self.play();
                debug!(cursor = ?self.cursor, delay_ms = self.speed.delay().as_millis() as u64, "playback started");
                true
            }
        }
    }

    /// Store a new speed; while playing, the ticker is swapped for one with
    /// the new period in the same call so no tick is lost or doubled.
    pub fn set_speed(&mut self, value: u32) -> bool {
        let speed = Speed::new(value);
        if speed == self.speed {
            return false;
        }
        self.speed = speed;
        if self.mode == PlaybackMode::Playing {
            self.ticker = Some(Ticker::start(speed.delay()));
        }
        debug!(speed = speed.get(), "speed changed");
        true
    }

    /// One auto-advance step. Pauses itself once the last state is shown.
    pub fn tick(&mut self) -> bool {
        if self.mode != PlaybackMode::Playing {
            return false;
        }
        if self.step_forward() {
            trace!(cursor = ?self.cursor, "auto-advance");
        } else {
            self.pause();
            debug!(cursor = ?self.cursor, "reached end of timeline, pausing");
        }
        true
    }

    /// Resolves when the ticker fires; pending forever while paused.
    /// Cancel-safe, so it can sit in a `select!` loop.
    pub async fn next_tick(&mut self) {
        match self.ticker.as_mut() {
            Some(t) => {
                t.interval.tick().await;
            }
            None => futures::future::pending::<()>().await,
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        let previous = self
            .cursor
            .and_then(|c| c.checked_sub(1))
            .and_then(|p| self.timeline.get(p))
            .cloned();
        PlaybackSnapshot {
            cursor: self.cursor,
            len: self.timeline.len(),
            current: self.current().cloned(),
            previous,
            mode: self.mode,
            speed: self.speed.get(),
        }
    }
}
