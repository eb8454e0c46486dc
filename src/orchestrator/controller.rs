//! Session controller.
//!
//! Owns the playback controller and the in-flight sort request, applies UI
//! commands and timer ticks, and emits events for presentation layers.

use super::post_process::process_fetch_completion;
use crate::gateway::{FetchError, SortClient};
use crate::model::{Algorithm, AppEvent, InfoEvent, PlaybackMode, SessionConfig, SortResponse};
use crate::playback::{PlaybackController, Speed};
use anyhow::Result;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Start {
        algorithm: Algorithm,
        input: Vec<i64>,
    },
    StepForward,
    StepBackward,
    TogglePlay,
    SetSpeed(u32),
    JumpToStart,
    JumpToEnd,
    Quit,
}

/// What a fetch task hands back, tagged with the request that produced it.
struct FetchOutcome {
    algorithm: Algorithm,
    input: Vec<i64>,
    result: Result<SortResponse, FetchError>,
}

fn start_fetch(
    client: &SortClient,
    algorithm: Algorithm,
    input: Vec<i64>,
    event_tx: &UnboundedSender<AppEvent>,
) -> JoinHandle<FetchOutcome> {
    info!(%algorithm, len = input.len(), "starting sort request");
    let _ = event_tx.send(AppEvent::FetchStarted {
        algorithm,
        len: input.len(),
    });
    let client = client.clone();
    tokio::spawn(async move {
        let result = client.fetch(algorithm, &input).await;
        FetchOutcome {
            algorithm,
            input,
            result,
        }
    })
}

/// Apply one playback command. Returns whether the visible state changed.
fn apply_playback_command(playback: &mut PlaybackController, cmd: &UiCommand) -> bool {
    match cmd {
        UiCommand::StepForward => playback.step_forward(),
        UiCommand::StepBackward => playback.step_backward(),
        UiCommand::TogglePlay => playback.toggle_play(),
        UiCommand::SetSpeed(v) => playback.set_speed(*v),
        UiCommand::JumpToStart => playback.jump_to_start(),
        UiCommand::JumpToEnd => playback.jump_to_end(),
        UiCommand::Start { .. } | UiCommand::Quit => false,
    }
}

/// Drive a session: UI commands, request completion and auto-advance ticks,
/// one at a time. Returns when `Quit` arrives or the command channel closes.
pub(crate) async fn run_controller(
    cfg: &SessionConfig,
    client: SortClient,
    event_tx: UnboundedSender<AppEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let mut playback = PlaybackController::new(Speed::new(cfg.speed));
    let mut fetch: Option<JoinHandle<FetchOutcome>> = if cfg.start_on_launch {
        Some(start_fetch(&client, cfg.algorithm, cfg.input.clone(), &event_tx))
    } else {
        None
    };
    let _ = event_tx.send(AppEvent::Snapshot(playback.snapshot()));

    let res = loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let changed = match cmd {
                    Some(UiCommand::Start { algorithm, input }) => {
                        // Latest request wins: the previous one is aborted and can
                        // no longer reach load_timeline.
                        if let Some(prev) = fetch.take() {
                            prev.abort();
                            debug!("superseded in-flight sort request");
                        }
                        fetch = Some(start_fetch(&client, algorithm, input, &event_tx));
                        playback.mode() == PlaybackMode::Playing && playback.toggle_play()
                    }
                    Some(UiCommand::Quit) | None => break Ok(()),
                    Some(other) => {
                        let changed = apply_playback_command(&mut playback, &other);
                        debug!(
                            command = ?other,
                            cursor = ?playback.cursor(),
                            speed = playback.speed().get(),
                            changed,
                            "playback command"
                        );
                        changed
                    }
                };
                if changed {
                    let _ = event_tx.send(AppEvent::Snapshot(playback.snapshot()));
                }
            }
            // Do not take the JoinHandle before this branch wins; otherwise it can be dropped
            // if another select branch is chosen, and we'll never observe completion.
            maybe_done = async {
                if let Some(h) = fetch.as_mut() {
                    return Some(h.await);
                }
                futures::future::pending().await
            } => {
                fetch = None;
                match maybe_done {
                    Some(Ok(FetchOutcome { algorithm, input, result: Ok(resp) })) => {
                        let processed = process_fetch_completion(cfg, algorithm, input, resp);
                        playback.load_timeline(processed.run.steps.clone());
                        let _ = event_tx.send(AppEvent::FetchCompleted {
                            run: Box::new(processed.run),
                        });
                        for msg in processed.messages {
                            let _ = event_tx.send(AppEvent::Info(msg));
                        }
                    }
                    Some(Ok(FetchOutcome { algorithm, result: Err(e), .. })) => {
                        warn!(%algorithm, error = %e, "sort request failed");
                        playback.load_timeline(Vec::new());
                        let _ = event_tx.send(AppEvent::FetchFailed {
                            message: format!("Sorting request failed: {e}"),
                        });
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "sort request task failed");
                        playback.load_timeline(Vec::new());
                        let _ = event_tx.send(AppEvent::FetchFailed {
                            message: format!("Sorting request task failed: {e}"),
                        });
                    }
                    None => {}
                }
                let _ = event_tx.send(AppEvent::Snapshot(playback.snapshot()));
            }
            _ = playback.next_tick() => {
                if playback.tick() {
                    let _ = event_tx.send(AppEvent::Snapshot(playback.snapshot()));
                    if playback.mode() == PlaybackMode::Paused {
                        let _ = event_tx.send(AppEvent::Info(InfoEvent::Message(
                            "Reached the end of the sort".into(),
                        )));
                    }
                }
            }
        }
    };

    if let Some(h) = fetch.take() {
        h.abort();
    }
    // Dropping the controller drops its ticker; nothing keeps advancing after quit.
    drop(playback);
    res
}
