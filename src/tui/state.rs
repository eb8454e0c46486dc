use crate::model::{
    Algorithm, AppEvent, PlaybackMode, PlaybackSnapshot, SessionConfig, SortRun,
};
use std::path::PathBuf;

pub struct UiState {
    pub tab: usize,
    pub algorithm: Algorithm,
    pub input: Vec<i64>,
    pub max_value: i64,
    pub snapshot: PlaybackSnapshot,
    pub last_run: Option<SortRun>,
    // Backend execution time of the last successful request
    pub time_taken_ms: Option<f64>,
    pub fetching: bool,
    pub info: String,
    pub dark_mode: bool,
    pub log_path: Option<PathBuf>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: 0,
            algorithm: Algorithm::BubbleSort,
            input: Vec::new(),
            max_value: crate::input::DEFAULT_MAX_VALUE,
            snapshot: PlaybackSnapshot {
                cursor: None,
                len: 0,
                current: None,
                previous: None,
                mode: PlaybackMode::Paused,
                speed: crate::playback::Speed::DEFAULT,
            },
            last_run: None,
            time_taken_ms: None,
            fetching: false,
            info: String::new(),
            dark_mode: false,
            log_path: None,
        }
    }
}

impl UiState {
    pub fn from_config(cfg: &SessionConfig, log_path: Option<PathBuf>) -> Self {
        let mut state = Self {
            algorithm: cfg.algorithm,
            input: cfg.input.clone(),
            max_value: cfg.max_value,
            log_path,
            ..Default::default()
        };
        state.snapshot.speed = cfg.speed;
        state.info = if cfg.start_on_launch {
            "Starting…".into()
        } else {
            "Press Enter to start sorting".into()
        };
        state
    }

    /// `"3 / 6"` style position, or `"-"` with no data.
    pub fn step_label(&self) -> String {
        match self.snapshot.cursor {
            Some(c) => format!("{} / {}", c + 1, self.snapshot.len),
            None => "-".into(),
        }
    }

    pub fn select_algorithm(&mut self, forward: bool) {
        self.algorithm = self.algorithm.cycle(forward);
        self.info = format!("Selected {}", self.algorithm.label());
    }

    pub fn regenerate_input(&mut self) {
        let size = self.input.len().max(1);
        self.input = crate::input::random_input(size, self.max_value);
        self.info = format!("New random array ({} values). Press Enter to sort it.", size);
    }
}

/// Fold one orchestrator event into the UI state.
pub fn apply_event(state: &mut UiState, ev: AppEvent) {
    match ev {
        AppEvent::FetchStarted { algorithm, len } => {
            state.fetching = true;
            state.info = format!("Fetching {} steps for {} values…", algorithm.label(), len);
        }
        AppEvent::FetchCompleted { run } => {
            state.fetching = false;
            state.time_taken_ms = Some(run.time_taken_ms);
            state.last_run = Some(*run);
        }
        AppEvent::FetchFailed { message } => {
            state.fetching = false;
            state.last_run = None;
            state.info = message;
        }
        AppEvent::Snapshot(snapshot) => state.snapshot = snapshot,
        AppEvent::Info(info) => state.info = info.to_message(),
    }
}
