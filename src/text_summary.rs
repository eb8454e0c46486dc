//! Text summary builder for CLI output.
//!
//! Walks a loaded playback controller from the first to the last step and
//! formats one line per step for text mode.

use crate::model::{SortRun, State};
use crate::playback::PlaybackController;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

fn format_state(state: &State, changed: &[usize]) -> String {
    let cells: Vec<String> = state
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if changed.contains(&i) {
                format!("*{v}")
            } else {
                v.to_string()
            }
        })
        .collect();
    format!("[{}]", cells.join(", "))
}

/// Build the text summary. Changed positions are marked with `*`.
pub(crate) fn build_text_summary(run: &SortRun, playback: &mut PlaybackController) -> TextSummary {
    let mut lines = vec![
        format!("Algorithm: {}", run.algorithm.label()),
        format!("Input: {}", format_state(&run.input, &[])),
        format!("Backend execution time: {:.2} ms", run.time_taken_ms),
    ];

    if playback.snapshot().is_empty() {
        lines.push("No sorting data available.".to_string());
        return TextSummary { lines };
    }

    lines.push(format!("Steps: {}", playback.len()));
    playback.jump_to_start();
    loop {
        let snap = playback.snapshot();
        if let (Some(cursor), Some(current)) = (snap.cursor, snap.current.as_ref()) {
            lines.push(format!(
                "step {}/{}: {}",
                cursor + 1,
                snap.len,
                format_state(current, &snap.changed_indices())
            ));
        }
        if !playback.step_forward() {
            break;
        }
    }

    TextSummary { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Algorithm;
    use crate::playback::Speed;

    fn run_with(steps: Vec<State>) -> SortRun {
        SortRun {
            timestamp_utc: "2024-05-01T12:00:00Z".into(),
            base_url: "http://localhost".into(),
            algorithm: Algorithm::BubbleSort,
            input: vec![5, 3, 4, 1],
            steps,
            time_taken_ms: 2.5,
        }
    }

    #[test]
    fn one_line_per_step_with_changes_marked() {
        let run = run_with(vec![vec![5, 3, 4, 1], vec![3, 5, 4, 1], vec![3, 4, 5, 1]]);
        let mut playback = PlaybackController::new(Speed::default());
        playback.load_timeline(run.steps.clone());

        let summary = build_text_summary(&run, &mut playback);
        assert_eq!(
            summary.lines,
            vec![
                "Algorithm: BUBBLE SORT",
                "Input: [5, 3, 4, 1]",
                "Backend execution time: 2.50 ms",
                "Steps: 3",
                "step 1/3: [5, 3, 4, 1]",
                "step 2/3: [*3, *5, 4, 1]",
                "step 3/3: [3, *4, *5, 1]",
            ]
        );
        assert_eq!(playback.cursor(), Some(2));
    }

    #[test]
    fn empty_timeline_reports_no_data() {
        let run = run_with(Vec::new());
        let mut playback = PlaybackController::new(Speed::default());
        playback.load_timeline(Vec::new());

        let summary = build_text_summary(&run, &mut playback);
        assert_eq!(
            summary.lines.last().map(String::as_str),
            Some("No sorting data available.")
        );
    }
}
