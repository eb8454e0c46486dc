//! Post-fetch processing utilities.
//!
//! Turns a service response into a `SortRun` record and handles the optional export.

use crate::model::{Algorithm, InfoEvent, SessionConfig, SortResponse, SortRun};
use crate::storage;
use tracing::{info, warn};

/// Result of post-fetch processing, ready for presentation layers.
pub(crate) struct ProcessedRun {
    pub run: SortRun,
    pub messages: Vec<InfoEvent>,
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "now".into())
}

/// Build the run record for a completed fetch and export it when configured.
pub(crate) fn process_fetch_completion(
    cfg: &SessionConfig,
    algorithm: Algorithm,
    input: Vec<i64>,
    resp: SortResponse,
) -> ProcessedRun {
    let run = SortRun {
        timestamp_utc: now_rfc3339(),
        base_url: cfg.base_url.clone(),
        algorithm,
        input,
        steps: resp.steps,
        time_taken_ms: resp.time_taken_ms,
    };

    let mut messages = Vec::new();
    if run.steps.is_empty() {
        messages.push(InfoEvent::NoSteps);
    } else {
        messages.push(InfoEvent::StepsReceived {
            steps: run.steps.len(),
            time_taken_ms: run.time_taken_ms,
        });
    }

    if let Some(path) = cfg.export_json.as_deref() {
        match storage::export_json(path, &run) {
            Ok(()) => {
                info!(path = %path.display(), "run exported");
                messages.push(InfoEvent::Exported {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "export failed");
                messages.push(InfoEvent::ExportFailed {
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    ProcessedRun { run, messages }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(export_json: Option<std::path::PathBuf>) -> SessionConfig {
        SessionConfig {
            base_url: "http://localhost:8080".into(),
            algorithm: Algorithm::BubbleSort,
            input: vec![2, 1],
            max_value: 100,
            speed: 100,
            request_timeout: Duration::from_secs(1),
            user_agent: "test".into(),
            start_on_launch: false,
            export_json,
        }
    }

    #[test]
    fn empty_response_reports_no_steps() {
        let processed = process_fetch_completion(
            &config(None),
            Algorithm::BubbleSort,
            vec![2, 1],
            SortResponse::default(),
        );
        assert!(processed.run.steps.is_empty());
        assert!(matches!(processed.messages.as_slice(), [InfoEvent::NoSteps]));
    }

    #[test]
    fn export_is_written_when_configured() {
        let path = std::env::temp_dir().join(format!(
            "sort-visualizer-post-process-{}.json",
            std::process::id()
        ));
        let resp = SortResponse {
            steps: vec![vec![2, 1], vec![1, 2]],
            time_taken_ms: 1.5,
        };
        let processed = process_fetch_completion(
            &config(Some(path.clone())),
            Algorithm::InsertionSort,
            vec![2, 1],
            resp,
        );

        assert_eq!(processed.run.algorithm, Algorithm::InsertionSort);
        assert_eq!(processed.run.input, vec![2, 1]);
        assert!(matches!(
            processed.messages.as_slice(),
            [InfoEvent::StepsReceived { steps: 2, .. }, InfoEvent::Exported { .. }]
        ));
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }
}
