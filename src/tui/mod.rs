mod bars;
mod export;
mod help;
mod state;

use crate::gateway::SortClient;
use crate::model::{AppEvent, SessionConfig};
use crate::orchestrator::{self, UiCommand};
use crate::playback::Speed;
use anyhow::{Context, Result};
use bars::Palette;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Terminal,
};
use state::{apply_event, UiState};
use std::path::PathBuf;
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

const TAB_COUNT: usize = 2;

pub async fn run(cfg: SessionConfig, log_path: Option<PathBuf>) -> Result<()> {
    // Fail before touching the terminal if the base URL is unusable.
    let client = SortClient::new(&cfg).context("build sorting service client")?;

    let (event_tx, event_rx) = mpsc::unbounded_channel::<AppEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    // TUI runs in a dedicated thread to keep blocking terminal I/O out of the Tokio runtime.
    let ui_cfg = cfg.clone();
    let ui_handle =
        std::thread::spawn(move || run_threaded(ui_cfg, log_path, event_rx, cmd_tx));

    let res = orchestrator::run_controller(&cfg, client, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    cfg: SessionConfig,
    log_path: Option<PathBuf>,
    mut event_rx: UnboundedReceiver<AppEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    // Restores the terminal on every exit path, including `?` below.
    let _guard = TerminalGuard::new(restore_terminal);
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let mut state = UiState::from_config(&cfg, log_path);

    let frame_rate = Duration::from_millis(16);
    let mut last_draw: Option<Instant> = None;
    let mut dirty = true;

    let res = loop {
        let mut orchestrator_gone = false;
        loop {
            match event_rx.try_recv() {
                Ok(ev) => {
                    apply_event(&mut state, ev);
                    dirty = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    orchestrator_gone = true;
                    break;
                }
            }
        }
        if orchestrator_gone {
            tracing::warn!("orchestrator stopped; closing the TUI");
            break Ok(());
        }

        if dirty && last_draw.map_or(true, |t| t.elapsed() >= frame_rate) {
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_draw = Some(Instant::now());
            dirty = false;
        }

        // Short poll timeout keeps auto-advance frames flowing.
        if !event::poll(Duration::from_millis(10)).unwrap_or(false) {
            continue;
        }
        let Ok(ev) = event::read() else {
            continue;
        };
        dirty = true;
        let Event::Key(k) = ev else {
            continue;
        };
        if k.kind != KeyEventKind::Press {
            continue;
        }
        match handle_key(&mut state, k.modifiers, k.code) {
            KeyAction::Quit => {
                let _ = cmd_tx.send(UiCommand::Quit);
                break Ok(());
            }
            KeyAction::Send(cmd) => {
                let _ = cmd_tx.send(cmd);
            }
            KeyAction::None => {}
        }
    };

    res
}

fn restore_terminal() {
    disable_raw_mode().ok();
    execute!(io::stdout(), LeaveAlternateScreen).ok();
}

/// Runs `restore` when dropped.
struct TerminalGuard {
    restore: fn(),
}

impl TerminalGuard {
    fn new(restore: fn()) -> Self {
        Self { restore }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        (self.restore)();
    }
}

#[derive(Debug)]
enum KeyAction {
    None,
    Send(UiCommand),
    Quit,
}

/// Map a key press to a command, updating UI-local state along the way.
fn handle_key(state: &mut UiState, modifiers: KeyModifiers, code: KeyCode) -> KeyAction {
    match (modifiers, code) {
        (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => KeyAction::Quit,
        (_, KeyCode::Tab) => {
            state.tab = (state.tab + 1) % TAB_COUNT;
            KeyAction::None
        }
        (_, KeyCode::Char('?')) => {
            state.tab = if state.tab == 1 { 0 } else { 1 };
            KeyAction::None
        }
        (_, KeyCode::Char('d')) => {
            state.dark_mode = !state.dark_mode;
            KeyAction::None
        }
        (_, KeyCode::Enter) => KeyAction::Send(UiCommand::Start {
            algorithm: state.algorithm,
            input: state.input.clone(),
        }),
        (_, KeyCode::Char('n')) => {
            state.regenerate_input();
            KeyAction::None
        }
        (_, KeyCode::Up) | (_, KeyCode::Char('k')) => {
            state.select_algorithm(false);
            KeyAction::None
        }
        (_, KeyCode::Down) | (_, KeyCode::Char('j')) => {
            state.select_algorithm(true);
            KeyAction::None
        }
        (_, KeyCode::Char(' ')) => KeyAction::Send(UiCommand::TogglePlay),
        (_, KeyCode::Left) => KeyAction::Send(UiCommand::StepBackward),
        (_, KeyCode::Right) => KeyAction::Send(UiCommand::StepForward),
        (_, KeyCode::Home) => KeyAction::Send(UiCommand::JumpToStart),
        (_, KeyCode::End) => KeyAction::Send(UiCommand::JumpToEnd),
        (_, KeyCode::Char('+')) | (_, KeyCode::Char('=')) => {
            let speed = Speed::new(state.snapshot.speed).faster().get();
            state.snapshot.speed = speed;
            KeyAction::Send(UiCommand::SetSpeed(speed))
        }
        (_, KeyCode::Char('-')) => {
            let speed = Speed::new(state.snapshot.speed).slower().get();
            state.snapshot.speed = speed;
            KeyAction::Send(UiCommand::SetSpeed(speed))
        }
        (_, KeyCode::Char('s')) => {
            export::save_and_show_path(state);
            KeyAction::None
        }
        (_, KeyCode::Char('y')) => {
            export::copy_current_step(state);
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let palette = Palette::for_mode(state.dark_mode);
    f.render_widget(
        Block::default().style(Style::default().fg(palette.fg).bg(palette.bg)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let tabs = Tabs::new(vec![Line::from("Visualizer"), Line::from("Help")])
        .select(state.tab)
        .block(Block::default().borders(Borders::ALL).title("sort-visualizer"))
        .highlight_style(Style::default().fg(palette.accent));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        0 => draw_visualizer(chunks[1], f, state, palette),
        _ => help::draw_help(chunks[1], f, state.log_path.as_deref()),
    }
}

fn draw_visualizer(area: Rect, f: &mut ratatui::Frame, state: &UiState, palette: Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(5),
                Constraint::Min(6),
                Constraint::Length(4),
            ]
            .as_ref(),
        )
        .split(area);

    let about = Paragraph::new(vec![
        Line::from(Span::styled(
            state.algorithm.label(),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(state.algorithm.description()),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title("Algorithm (↑/↓)"));
    f.render_widget(about, chunks[0]);

    bars::draw_bars(chunks[1], f, state, palette);

    let speed = Speed::new(state.snapshot.speed);
    let time_taken = state
        .time_taken_ms
        .map(|ms| format!("{ms:.2} ms"))
        .unwrap_or_else(|| "-".into());
    let status = vec![
        Line::from(vec![
            Span::styled("Step: ", Style::default().fg(palette.muted)),
            Span::raw(state.step_label()),
            Span::raw("   "),
            Span::raw(state.snapshot.mode.label()),
            Span::raw("   "),
            Span::styled("Speed: ", Style::default().fg(palette.muted)),
            Span::raw(format!(
                "{} ({} ms/step)",
                speed.get(),
                speed.delay().as_millis()
            )),
            Span::raw("   "),
            Span::styled(
                "Backend Execution Time: ",
                Style::default().fg(palette.muted),
            ),
            Span::raw(time_taken),
        ]),
        Line::from(state.info.clone()),
    ];
    let p = Paragraph::new(status)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(p, chunks[2]);
}
