//! Console channel: reads messages from stdin, prints verdicts to stdout.
//!
//! Lines naming a known `/command` are commands; everything else, including
//! other `/…` text, is submitted to the session as-is. Runs until the `shutdown` token is cancelled (Ctrl-C),
//! stdin is closed, or `/quit` is entered.
//!
//! Classification is blocking work and runs on `spawn_blocking`.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::session::{ClassificationRecord, SessionManager, SessionStats, SubmissionError};

const HELP: &str = "\
Type a message and press Enter to check it.
Commands:
  /history [n] [--json]  show the n most recent checks
  /stats                 spam / not-spam totals
  /reset                 clear this session's history
  /help                  show this help
  /quit                  exit";

// ── Commands ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    History { limit: Option<usize>, json: bool },
    Stats,
    Reset,
    Help,
    Quit,
    Unknown(String),
}

/// Interpret one input line. Anything that is not a known command is
/// returned untouched as a submission.
pub fn parse_command(line: &str) -> Command {
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Command::Submit(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    match parts.next().unwrap_or_default() {
        "history" | "h" => {
            let mut limit = None;
            let mut json = false;
            for arg in parts {
                match arg {
                    "--json" => json = true,
                    n => match n.parse::<usize>() {
                        Ok(n) => limit = Some(n),
                        Err(_) => return Command::Unknown(line.trim().to_string()),
                    },
                }
            }
            Command::History { limit, json }
        }
        "stats" => Command::Stats,
        "reset" | "clear" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Submit(line.to_string()),
    }
}

// ── Rendering ────────────────────────────────────────────────────────────────

pub fn render_outcome(outcome: &Result<ClassificationRecord, SubmissionError>) -> String {
    match outcome {
        Ok(record) => {
            let verdict = if record.label().is_spam() {
                "⚠ spam: this message looks like spam"
            } else {
                "✓ not spam: this message looks fine"
            };
            match record.analysis_duration_ms() {
                Some(ms) => format!("{verdict}  [{}] \"{}\" ({ms} ms)", record.timestamp(), record.preview()),
                None => format!("{verdict}  [{}] \"{}\"", record.timestamp(), record.preview()),
            }
        }
        Err(SubmissionError::EmptyMessage) => "… please enter a message to check".to_string(),
        Err(SubmissionError::ClassifierUnavailable(why)) => {
            format!("✗ classifier unavailable ({why}); try again later")
        }
    }
}

pub fn render_history(records: &[ClassificationRecord]) -> String {
    if records.is_empty() {
        return "no checks yet".to_string();
    }
    records
        .iter()
        .map(|r| format!("{}  {:<8}  {}", r.timestamp(), r.label().to_string(), r.preview()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_stats(stats: &SessionStats) -> String {
    format!(
        "checked: {}  spam: {}  not spam: {}  spam ratio: {:.1}%",
        stats.total,
        stats.spam,
        stats.ham,
        stats.spam_ratio() * 100.0
    )
}

// ── Run loop ─────────────────────────────────────────────────────────────────

/// Drive the console over stdin / stdout.
pub async fn run(
    manager: Arc<SessionManager>,
    history_limit: usize,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    run_io(stdin, &mut stdout, manager, history_limit, shutdown).await
}

/// Console loop over arbitrary reader / writer.
pub async fn run_io<R, W>(
    reader: R,
    writer: &mut W,
    manager: Arc<SessionManager>,
    history_limit: usize,
    shutdown: CancellationToken,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!(session_id = %manager.session_id(), "console started");
    writeln_to(writer, "─────────────────────────────────").await?;
    writeln_to(writer, " spamcheck  (/help, Ctrl-C to quit)").await?;
    writeln_to(writer, "─────────────────────────────────").await?;

    let mut lines = reader.lines();

    loop {
        writer.write_all(b"> ").await?;
        writer.flush().await?;

        let line = tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                writeln_to(writer, "\nshutting down").await?;
                info!("console shutting down");
                break;
            }

            line = lines.next_line() => line,
        };

        let input = match line {
            Err(e) => {
                warn!("console read error: {e}");
                break;
            }
            Ok(None) => {
                info!("console stdin closed");
                break;
            }
            Ok(Some(input)) => input,
        };

        let reply = match parse_command(&input) {
            Command::Submit(text) => {
                debug!(len = text.len(), "console submit");
                let m = Arc::clone(&manager);
                let outcome = tokio::task::spawn_blocking(move || m.submit(&text))
                    .await
                    .map_err(|e| AppError::Task(format!("classification task failed: {e}")))?;
                render_outcome(&outcome)
            }
            Command::History { limit, json } => {
                let records = manager.recent_history(limit.unwrap_or(history_limit));
                if json {
                    serde_json::to_string_pretty(&records)
                        .map_err(|e| AppError::Task(format!("serialise history: {e}")))?
                } else {
                    render_history(&records)
                }
            }
            Command::Stats => render_stats(&manager.stats()),
            Command::Reset => {
                manager.reset();
                "history cleared".to_string()
            }
            Command::Help => HELP.to_string(),
            Command::Quit => break,
            Command::Unknown(cmd) => format!("unknown command: {cmd} (try /help)"),
        };
        writeln_to(writer, &reply).await?;
    }

    writer.flush().await?;
    info!(session_id = %manager.session_id(), "console stopped");
    Ok(())
}

async fn writeln_to<W: AsyncWrite + Unpin>(writer: &mut W, text: &str) -> Result<(), AppError> {
    writer.write_all(text.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    Ok(())
}
