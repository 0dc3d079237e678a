//! # Logging
//!
//! Events always go to stderr in the compact `fmt` format. When a log file is
//! given, every event is also appended to it, one line each:
//!
//! ```text
//! [2026-01-01 12:00:00.000] [INFO]: Upload started file_name="test.txt"
//! ```

use crate::error::{Result, UpstatError};
use chrono::Local;
use std::fmt as std_fmt;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "upstat=info";
const VERBOSE_FILTER: &str = "upstat=debug";

/// Install the global tracing subscriber, writing to stderr and, if
/// `log_file` is set, appending to that file as well.
///
/// `RUST_LOG` takes precedence over `verbose`.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber
/// is already installed.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let file = log_file.map(open_log_file).transpose()?;

    build_subscriber(verbose, file)
        .try_init()
        .map_err(|err| UpstatError::Logging(format!("failed to install tracing subscriber: {err}")))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(UpstatError::Io)?;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(UpstatError::Io)
}

fn build_subscriber(verbose: bool, file: Option<File>) -> impl Subscriber + Send + Sync + 'static {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let file_layer = file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .event_format(BracketedLine)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
}

/// `[YYYY-MM-DD HH:MM:SS.mmm] [LEVEL]: message fields`
struct BracketedLine;

impl<S, N> FormatEvent<S, N> for BracketedLine
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std_fmt::Result {
        write!(
            writer,
            "[{}] [{}]: ",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
