// Logging sink - per-reporter tracing dispatch with a custom line format

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use chrono::Local;
use tracing::{Dispatch, Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer as FmtWriter;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;

use crate::options::LogOptions;

pub struct LineFormatter;

impl<S, N> FormatEvent<S, N> for LineFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: FmtWriter<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let level = metadata.level();
        let timestamp = Local::now().format("%H:%M:%S");

        let (emoji, level_str) = match *level {
            Level::TRACE => ("🔬", "TRACE"),
            Level::DEBUG => ("🐛", "DEBUG"),
            Level::INFO => ("ℹ️ ", "INFO"),
            Level::WARN => ("⚠️ ", "WARN"),
            Level::ERROR => ("❌", "ERROR"),
        };

        // Write the prefix
        write!(writer, "{} {} [{}]: ", emoji, level_str, timestamp)?;

        // Write the message (and other fields)
        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Output target for a sink; console for real runs, memory for tests
#[derive(Debug, Clone)]
pub enum LogTarget {
    Console,
    Memory(Arc<Mutex<Vec<u8>>>),
}

impl LogTarget {
    /// In-memory target plus the buffer to read it back from
    pub fn memory() -> (Self, Arc<Mutex<Vec<u8>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        (LogTarget::Memory(Arc::clone(&buffer)), buffer)
    }
}

/// Writes each formatted line to every configured target
struct FanOutWriter {
    targets: Arc<[LogTarget]>,
}

impl Write for FanOutWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for target in self.targets.iter() {
            match target {
                LogTarget::Console => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(buf)?;
                }
                LogTarget::Memory(buffer) => {
                    if let Ok(mut buffer) = buffer.lock() {
                        buffer.extend_from_slice(buf);
                    }
                }
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().lock().flush()
    }
}

#[derive(Clone)]
struct MakeFanOut {
    targets: Arc<[LogTarget]>,
}

impl<'a> MakeWriter<'a> for MakeFanOut {
    type Writer = FanOutWriter;

    fn make_writer(&'a self) -> Self::Writer {
        FanOutWriter {
            targets: Arc::clone(&self.targets),
        }
    }
}

/// Logging handle owned by one reporter for one run
///
/// Wraps a dedicated tracing dispatch so the severity threshold and targets
/// are scoped to this sink rather than the global subscriber. Constructed
/// once from the merged options and never rebuilt within a run.
pub struct LogSink {
    dispatch: Dispatch,
}

impl LogSink {
    pub fn new(options: &LogOptions) -> Self {
        let make_writer = MakeFanOut {
            targets: options.targets.clone().into(),
        };
        let subscriber = tracing_subscriber::fmt()
            .event_format(LineFormatter)
            .with_max_level(options.level)
            .with_writer(make_writer)
            .finish();

        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    pub fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }

    fn log(&self, level: Level, message: &str) {
        tracing::dispatcher::with_default(&self.dispatch, || match level {
            Level::TRACE => tracing::trace!("{}", message),
            Level::DEBUG => tracing::debug!("{}", message),
            Level::INFO => tracing::info!("{}", message),
            Level::WARN => tracing::warn!("{}", message),
            Level::ERROR => tracing::error!("{}", message),
        });
    }
}
