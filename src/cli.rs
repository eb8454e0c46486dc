use crate::gateway::SortClient;
use crate::logging::{self, LogTarget};
use crate::model::{Algorithm, SessionConfig, SortRun};
use crate::playback::{PlaybackController, Speed};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "sort-visualizer",
    version,
    about = "Step through sorting algorithms computed by a remote sorting service"
)]
pub struct Cli {
    /// Base URL of the sorting service
    #[arg(
        long,
        default_value = "http://sorting-visualizer-api-env.eba-qx4pdxgg.us-east-1.elasticbeanstalk.com"
    )]
    pub base_url: String,

    /// Algorithm to request (e.g. bubble-sort, quick-sort)
    #[arg(long, default_value = "bubble-sort")]
    pub algorithm: Algorithm,

    /// Comma-separated input array; a random one is generated when omitted
    #[arg(long)]
    pub numbers: Option<String>,

    /// Length of the generated input array
    #[arg(long, default_value_t = crate::input::DEFAULT_SIZE)]
    pub size: usize,

    /// Largest value in the generated input array
    #[arg(long, default_value_t = crate::input::DEFAULT_MAX_VALUE)]
    pub max_value: i64,

    /// Playback speed, 10 (slow) to 500 (fast)
    #[arg(long, default_value_t = Speed::DEFAULT, value_parser = clap::value_parser!(u32).range(10..=500))]
    pub speed: u32,

    /// Request timeout for the sorting service
    #[arg(long, default_value = "10s")]
    pub timeout: humantime::Duration,

    /// Print the run as JSON and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print every step as text and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Export each completed run as JSON to this path
    #[arg(long)]
    pub export_json: Option<std::path::PathBuf>,

    /// Use --start-on-launch true to request steps as soon as the TUI opens
    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    pub start_on_launch: bool,

    /// Log file for the TUI (defaults to the user cache directory)
    #[arg(long)]
    pub log_file: Option<std::path::PathBuf>,

    /// Log filter, e.g. info or sort_visualizer=debug
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

pub async fn run(args: Cli) -> Result<()> {
    if args.json && args.text {
        return Err(anyhow::anyhow!(
            "--json and --text are mutually exclusive. Pick one output mode."
        ));
    }

    let cfg = build_config(&args)?;

    if !args.json && !args.text {
        #[cfg(feature = "tui")]
        {
            let log_path = logging::init(&args.log_level, LogTarget::File(args.log_file.as_deref()))?;
            return crate::tui::run(cfg, log_path).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            logging::init(&args.log_level, LogTarget::Stderr)?;
            return run_text(cfg).await;
        }
    }

    logging::init(&args.log_level, LogTarget::Stderr)?;
    if args.json {
        return run_json(cfg).await;
    }
    run_text(cfg).await
}

/// Build a `SessionConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> Result<SessionConfig> {
    let input = match args.numbers.as_deref() {
        Some(raw) => crate::input::parse_numbers(raw).context("parse --numbers")?,
        None => {
            if args.size == 0 {
                return Err(anyhow::anyhow!("--size must be at least 1"));
            }
            crate::input::random_input(args.size, args.max_value)
        }
    };
    Ok(SessionConfig {
        base_url: args.base_url.clone(),
        algorithm: args.algorithm,
        input,
        max_value: args.max_value,
        speed: args.speed,
        request_timeout: Duration::from(args.timeout),
        user_agent: format!("sort-visualizer-cli/{}", env!("CARGO_PKG_VERSION")),
        start_on_launch: args.start_on_launch,
        export_json: args.export_json.clone(),
    })
}

/// Fetch once and run post-processing. Errors propagate; there is no UI to
/// show an empty state in.
async fn fetch_run(cfg: &SessionConfig) -> Result<(SortRun, Vec<String>)> {
    let client = SortClient::new(cfg).context("build sorting service client")?;
    let resp = client
        .fetch(cfg.algorithm, &cfg.input)
        .await
        .with_context(|| format!("{} request failed", cfg.algorithm))?;
    let processed =
        crate::orchestrator::process_fetch_completion(cfg, cfg.algorithm, cfg.input.clone(), resp);
    let messages = processed.messages.iter().map(|m| m.to_message()).collect();
    Ok((processed.run, messages))
}

async fn run_json(cfg: SessionConfig) -> Result<()> {
    let (out_tx, out_handle) = spawn_output_writer();
    let (run, messages) = fetch_run(&cfg).await?;

    let out = serde_json::to_string_pretty(&run)?;
    let _ = out_tx.send(OutputLine::Stdout(out));
    for msg in messages {
        let _ = out_tx.send(OutputLine::Stderr(msg));
    }

    drop(out_tx);
    let _ = out_handle.await;
    Ok(())
}

async fn run_text(cfg: SessionConfig) -> Result<()> {
    let (out_tx, out_handle) = spawn_output_writer();
    let _ = out_tx.send(OutputLine::Stderr(format!(
        "== {} ({} values) ==",
        cfg.algorithm.label(),
        cfg.input.len()
    )));
    let (run, messages) = fetch_run(&cfg).await?;

    let mut playback = PlaybackController::new(Speed::new(cfg.speed));
    playback.load_timeline(run.steps.clone());
    let summary = crate::text_summary::build_text_summary(&run, &mut playback);
    for line in summary.lines {
        let _ = out_tx.send(OutputLine::Stdout(line));
    }
    for msg in messages {
        let _ = out_tx.send(OutputLine::Stderr(msg));
    }

    drop(out_tx);
    let _ = out_handle.await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_web_front_end() {
        let args = Cli::parse_from(["sort-visualizer"]);
        assert_eq!(args.algorithm, Algorithm::BubbleSort);
        assert_eq!(args.speed, 100);
        assert_eq!(args.size, 50);

        let cfg = build_config(&args).unwrap();
        assert_eq!(cfg.input.len(), 50);
        assert!(cfg.input.iter().all(|n| (1..=100).contains(n)));
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
        assert!(!cfg.start_on_launch);
    }

    #[test]
    fn explicit_numbers_and_algorithm() {
        let args = Cli::parse_from([
            "sort-visualizer",
            "--algorithm",
            "merge-sort",
            "--numbers",
            "5,3,4,1",
            "--speed",
            "500",
        ]);
        let cfg = build_config(&args).unwrap();
        assert_eq!(cfg.algorithm, Algorithm::MergeSort);
        assert_eq!(cfg.input, vec![5, 3, 4, 1]);
        assert_eq!(cfg.speed, 500);
    }

    #[test]
    fn rejects_out_of_range_speed_and_unknown_algorithm() {
        assert!(Cli::try_parse_from(["sort-visualizer", "--speed", "5"]).is_err());
        assert!(Cli::try_parse_from(["sort-visualizer", "--speed", "501"]).is_err());
        assert!(Cli::try_parse_from(["sort-visualizer", "--algorithm", "bogo-sort"]).is_err());
    }

    #[test]
    fn rejects_empty_inputs() {
        let args = Cli::parse_from(["sort-visualizer", "--numbers", " , "]);
        assert!(build_config(&args).is_err());
        let args = Cli::parse_from(["sort-visualizer", "--size", "0"]);
        assert!(build_config(&args).is_err());
    }
}
