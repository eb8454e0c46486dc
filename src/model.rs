use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// One snapshot of the array being sorted.
pub type State = Vec<i64>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub base_url: String,
    pub algorithm: Algorithm,
    pub input: Vec<i64>,
    pub max_value: i64,
    pub speed: u32,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    pub user_agent: String,
    pub start_on_launch: bool,
    pub export_json: Option<PathBuf>,
}

/// Algorithms exposed by the sorting service, one endpoint each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    BubbleSort,
    SelectionSort,
    InsertionSort,
    MergeSort,
    QuickSort,
    HeapSort,
    RadixSort,
    CountingSort,
    ShellSort,
    BucketSort,
}

impl Algorithm {
    pub const ALL: [Algorithm; 10] = [
        Algorithm::BubbleSort,
        Algorithm::SelectionSort,
        Algorithm::InsertionSort,
        Algorithm::MergeSort,
        Algorithm::QuickSort,
        Algorithm::HeapSort,
        Algorithm::RadixSort,
        Algorithm::CountingSort,
        Algorithm::ShellSort,
        Algorithm::BucketSort,
    ];

    /// Path segment of the service endpoint
    pub fn slug(self) -> &'static str {
        match self {
            Algorithm::BubbleSort => "bubble-sort",
            Algorithm::SelectionSort => "selection-sort",
            Algorithm::InsertionSort => "insertion-sort",
            Algorithm::MergeSort => "merge-sort",
            Algorithm::QuickSort => "quick-sort",
            Algorithm::HeapSort => "heap-sort",
            Algorithm::RadixSort => "radix-sort",
            Algorithm::CountingSort => "counting-sort",
            Algorithm::ShellSort => "shell-sort",
            Algorithm::BucketSort => "bucket-sort",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.slug() == slug)
    }

    pub fn label(self) -> String {
        self.slug().replace('-', " ").to_uppercase()
    }

    pub fn description(self) -> &'static str {
        match self {
            Algorithm::BubbleSort => {
                "Bubble Sort repeatedly swaps adjacent elements if they are in the wrong order."
            }
            Algorithm::SelectionSort => {
                "Selection Sort selects the smallest element and places it in the correct position."
            }
            Algorithm::InsertionSort => {
                "Insertion Sort builds a sorted list by inserting elements at the correct position."
            }
            Algorithm::MergeSort => {
                "Merge Sort divides the array into halves and merges them in sorted order."
            }
            Algorithm::QuickSort => {
                "Quick Sort picks a pivot and partitions the array around the pivot."
            }
            Algorithm::HeapSort => {
                "Heap Sort converts the array into a heap structure and extracts elements in order."
            }
            Algorithm::RadixSort => "Radix Sort sorts numbers by processing individual digits.",
            Algorithm::CountingSort => {
                "Counting Sort counts occurrences of elements to sort them efficiently."
            }
            Algorithm::ShellSort => {
                "Shell Sort improves insertion sort by comparing distant elements first."
            }
            Algorithm::BucketSort => {
                "Bucket Sort distributes elements into buckets and sorts each bucket individually."
            }
        }
    }

    /// Cycle through `ALL`, wrapping at both ends.
    pub fn cycle(self, forward: bool) -> Self {
        let n = Self::ALL.len();
        let idx = Self::ALL.iter().position(|a| *a == self).unwrap_or(0);
        let next = if forward { (idx + 1) % n } else { (idx + n - 1) % n };
        Self::ALL[next]
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::from_slug(s.trim()).ok_or_else(|| {
            let known: Vec<&str> = Algorithm::ALL.iter().map(|a| a.slug()).collect();
            format!("unknown algorithm '{s}' (expected one of: {})", known.join(", "))
        })
    }
}

/// Body returned by the sorting service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<State>,
    #[serde(default, rename = "timeTaken", deserialize_with = "null_as_default")]
    pub time_taken_ms: f64,
}

// Absent and `null` both mean "no data" from the service.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A completed request: what was asked and what came back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortRun {
    pub timestamp_utc: String,
    pub base_url: String,
    pub algorithm: Algorithm,
    pub input: Vec<i64>,
    pub steps: Vec<State>,
    pub time_taken_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    Paused,
    Playing,
}

impl PlaybackMode {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackMode::Paused => "⏸ Paused",
            PlaybackMode::Playing => "▶ Playing",
        }
    }
}

/// Read-only view of the playback controller handed to renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub cursor: Option<usize>,
    pub len: usize,
    pub current: Option<State>,
    pub previous: Option<State>,
    pub mode: PlaybackMode,
    pub speed: u32,
}

impl PlaybackSnapshot {
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Indices whose value changed since the previous step.
    pub fn changed_indices(&self) -> Vec<usize> {
        match (&self.current, &self.previous) {
            (Some(cur), Some(prev)) => cur
                .iter()
                .zip(prev.iter())
                .enumerate()
                .filter(|(_, (a, b))| a != b)
                .map(|(i, _)| i)
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    FetchStarted {
        algorithm: Algorithm,
        len: usize,
    },
    FetchCompleted {
        // Box to keep AppEvent small; a run carries every snapshot.
        run: Box<SortRun>,
    },
    FetchFailed {
        message: String,
    },
    Snapshot(PlaybackSnapshot),
    Info(InfoEvent),
}

/// Structured info events emitted by the orchestrator and consumed by UI/CLI layers.
#[derive(Debug, Clone)]
pub enum InfoEvent {
    Message(String),
    StepsReceived { steps: usize, time_taken_ms: f64 },
    NoSteps,
    Exported { path: PathBuf },
    ExportFailed { reason: String },
}

impl InfoEvent {
    /// Render a human-readable message for UI/CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            InfoEvent::Message(msg) => msg.clone(),
            InfoEvent::StepsReceived {
                steps,
                time_taken_ms,
            } => format!("{} steps in {:.2} ms", steps, time_taken_ms),
            InfoEvent::NoSteps => "No steps received from the sorting service".to_string(),
            InfoEvent::Exported { path } => format!("Exported JSON: {}", path.display()),
            InfoEvent::ExportFailed { reason } => format!("Export JSON failed: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_slugs_round_trip_through_from_str() {
        for algo in Algorithm::ALL {
            assert_eq!(algo.slug().parse::<Algorithm>(), Ok(algo));
        }
        assert!("bogo-sort".parse::<Algorithm>().is_err());
    }

    #[test]
    fn label_is_upper_case_with_spaces() {
        assert_eq!(Algorithm::QuickSort.label(), "QUICK SORT");
        assert_eq!(Algorithm::CountingSort.label(), "COUNTING SORT");
    }

    #[test]
    fn cycle_wraps_both_directions() {
        assert_eq!(Algorithm::BucketSort.cycle(true), Algorithm::BubbleSort);
        assert_eq!(Algorithm::BubbleSort.cycle(false), Algorithm::BucketSort);
        assert_eq!(Algorithm::MergeSort.cycle(true), Algorithm::QuickSort);
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let r: SortResponse = serde_json::from_str("{}").unwrap();
        assert!(r.steps.is_empty());
        assert_eq!(r.time_taken_ms, 0.0);

        let r: SortResponse =
            serde_json::from_str(r#"{"steps":null,"timeTaken":null}"#).unwrap();
        assert!(r.steps.is_empty());

        let r: SortResponse =
            serde_json::from_str(r#"{"steps":[[2,1],[1,2]],"timeTaken":2.5}"#).unwrap();
        assert_eq!(r.steps, vec![vec![2, 1], vec![1, 2]]);
        assert_eq!(r.time_taken_ms, 2.5);
    }

    #[test]
    fn changed_indices_compares_with_previous_step() {
        let snap = PlaybackSnapshot {
            cursor: Some(1),
            len: 2,
            current: Some(vec![3, 5, 4, 1]),
            previous: Some(vec![5, 3, 4, 1]),
            mode: PlaybackMode::Paused,
            speed: 100,
        };
        assert_eq!(snap.changed_indices(), vec![0, 1]);

        let first = PlaybackSnapshot {
            previous: None,
            ..snap
        };
        assert!(first.changed_indices().is_empty());
    }
}
