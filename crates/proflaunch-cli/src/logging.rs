//! Console and activity-log output for `tracing` events.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const CRATES: [&str; 5] = [
    "proflaunch",
    "proflaunch_cli",
    "proflaunch_core",
    "proflaunch_browser",
    "proflaunch_update",
];

/// `[YYYY-MM-DD HH:MM:SS] message` lines for the activity log
pub struct ActivityFormat;

impl<S, N> FormatEvent<S, N> for ActivityFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "[{}] ",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn crate_filter(level: &str) -> EnvFilter {
    let directives: Vec<String> = CRATES
        .iter()
        .map(|name| format!("{}={}", name, level))
        .collect();
    EnvFilter::new(directives.join(","))
}

fn open_log(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Install the console layer and, when `log_path` can be opened, the
/// activity-log layer.
pub fn init_logging(verbose: bool, log_path: Option<&Path>) {
    let console_filter = if verbose {
        crate_filter("debug")
    } else {
        EnvFilter::new("warn")
    };

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(console_filter);

    let activity = log_path.and_then(open_log).map(|file| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .event_format(ActivityFormat)
            .with_filter(crate_filter("info"))
    });

    let _ = tracing_subscriber::registry()
        .with(console)
        .with(activity)
        .try_init();
}
