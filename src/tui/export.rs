use crate::model::PlaybackSnapshot;
use anyhow::Result;
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;
use std::time::Duration;

use super::state::UiState;

// Clipboard manager channel, initialized on first copy
static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

/// Save the last run into the current directory and report the path in `state.info`.
pub fn save_and_show_path(state: &mut UiState) {
    let Some(run) = state.last_run.as_ref() else {
        state.info = "Nothing to save yet. Press Enter to start sorting.".into();
        return;
    };
    state.info = match crate::storage::export_to_current_dir(run) {
        Ok(path) => format!("Saved: {}", path.display()),
        Err(e) => format!("Save failed: {e:#}"),
    };
}

/// Text copied by `y`: the step position followed by the values on screen.
pub fn clipboard_text(snapshot: &PlaybackSnapshot) -> Option<String> {
    let (cursor, current) = (snapshot.cursor?, snapshot.current.as_ref()?);
    let values: Vec<String> = current.iter().map(|n| n.to_string()).collect();
    Some(format!(
        "step {}/{}: [{}]",
        cursor + 1,
        snapshot.len,
        values.join(", ")
    ))
}

pub fn copy_current_step(state: &mut UiState) {
    let Some(text) = clipboard_text(&state.snapshot) else {
        state.info = "No sorting data available to copy".into();
        return;
    };
    state.info = match copy_to_clipboard(&text) {
        Ok(()) => "Copied current step to clipboard".into(),
        Err(e) => format!("Copy failed: {e:#}"),
    };
}

/// Background thread that owns clipboard instances. On Linux the contents
/// vanish with the instance, so each one is held for a while after writing.
fn init_clipboard_manager() -> Result<&'static std_mpsc::Sender<String>> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();

        std::thread::spawn(move || {
            use arboard::Clipboard;

            for text in rx {
                match Clipboard::new() {
                    Ok(mut clipboard) => {
                        if clipboard.set_text(&text).is_ok() {
                            std::thread::sleep(Duration::from_secs(2));
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "clipboard unavailable"),
                }
            }
        });

        tx
    });

    CLIPBOARD_SENDER
        .get()
        .ok_or_else(|| anyhow::anyhow!("Failed to initialize clipboard manager"))
}

/// Queue `text` for the clipboard thread; returns without waiting for it.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let sender = init_clipboard_manager()?;
    sender
        .send(text.to_string())
        .map_err(|_| anyhow::anyhow!("Clipboard manager channel closed"))?;
    Ok(())
}
