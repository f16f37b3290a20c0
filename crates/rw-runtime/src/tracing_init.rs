use std::fmt::{self as stdfmt, Write as _};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::format::{DefaultFields, Writer};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use rw_config::{LogFormat, LoggingConfig, resolve_path};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

// ---------------------------------------------------------------------------
// FileFields
// ---------------------------------------------------------------------------

/// Field formatter for the file layer. A distinct type keeps its cached span
/// fields apart from the stderr layer's, which may carry ANSI codes.
#[derive(Default)]
pub struct FileFields(DefaultFields);

impl<'writer> FormatFields<'writer> for FileFields {
    fn format_fields<R: tracing_subscriber::field::RecordFields>(
        &self,
        writer: Writer<'writer>,
        fields: R,
    ) -> stdfmt::Result {
        self.0.format_fields(writer, fields)
    }
}

// ---------------------------------------------------------------------------
// DomainFormat
// ---------------------------------------------------------------------------

/// Plain-text event format with the `domain` field promoted to a prefix:
///
/// ```text
/// 2026-03-10T11:00:05Z  INFO [feed] feed{}: snapshot published seq=2 active=51
/// ```
///
/// Events without a domain (e.g. from `rw-core` via `log`) print without it.
pub struct DomainFormat {
    timer: SystemTime,
}

impl DomainFormat {
    pub fn new() -> Self {
        Self { timer: SystemTime }
    }
}

impl Default for DomainFormat {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes `text` wrapped in an SGR sequence when the writer takes ANSI.
fn paint(writer: &mut Writer<'_>, sgr: &str, text: impl stdfmt::Display) -> stdfmt::Result {
    if writer.has_ansi_escapes() {
        write!(writer, "\x1b[{sgr}m{text}\x1b[0m")
    } else {
        write!(writer, "{text}")
    }
}

fn level_sgr(level: Level) -> &'static str {
    match level {
        Level::ERROR => "31",
        Level::WARN => "33",
        Level::INFO => "32",
        Level::DEBUG => "34",
        Level::TRACE => "35",
    }
}

impl<S, N> FormatEvent<S, N> for DomainFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        let mut stamp = String::new();
        if self.timer.format_time(&mut Writer::new(&mut stamp)).is_err() {
            stamp.push_str("<unknown time>");
        }
        paint(&mut writer, "2", stamp)?;

        let level = *event.metadata().level();
        writer.write_char(' ')?;
        paint(&mut writer, level_sgr(level), format_args!("{level:>5}"))?;
        writer.write_char(' ')?;

        let mut fields = DomainExtractor::default();
        event.record(&mut fields);

        if let Some(domain) = &fields.domain {
            paint(&mut writer, "1;36", format_args!("[{domain}]"))?;
            writer.write_char(' ')?;
        }

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                paint(&mut writer, "1", span.name())?;
                let ext = span.extensions();
                match ext.get::<FormattedFields<N>>() {
                    Some(f) if !f.is_empty() => write!(writer, "{{{f}}}: ")?,
                    _ => write!(writer, "{{}}: ")?,
                }
            }
        }

        write!(writer, "{}", fields.message)?;
        if !fields.rest.is_empty() {
            writer.write_char(' ')?;
            paint(&mut writer, "3", &fields.rest)?;
        }
        writeln!(writer)
    }
}

/// Splits an event's fields into domain, message and the rest.
#[derive(Default)]
struct DomainExtractor {
    domain: Option<String>,
    message: String,
    rest: String,
}

impl DomainExtractor {
    fn push(&mut self, name: &str, value: impl stdfmt::Display) {
        if !self.rest.is_empty() {
            self.rest.push(' ');
        }
        let _ = write!(self.rest, "{name}={value}");
    }
}

impl Visit for DomainExtractor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "domain" => self.domain = Some(value.to_string()),
            "message" => self.message = value.to_string(),
            name => self.push(name, format_args!("{value:?}")),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn stdfmt::Debug) {
        match field.name() {
            "domain" => {
                self.domain = Some(format!("{value:?}").trim_matches('"').to_string());
            }
            "message" => {
                let _ = write!(self.message, "{value:?}");
            }
            name => self.push(name, format_args!("{value:?}")),
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field.name(), value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field.name(), value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field.name(), value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field.name(), value);
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Level filter from `RUST_LOG` when set, else from `level` plus the
/// per-module overrides.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if std::env::var("RUST_LOG").is_ok() {
        return Ok(EnvFilter::from_default_env());
    }
    let mut directives = config.level.clone();
    for (module, level) in &config.modules {
        let _ = write!(directives, ",{module}={level}");
    }
    EnvFilter::try_new(&directives).with_context(|| format!("invalid log filter '{directives}'"))
}

fn stderr_layer(format: LogFormat, filter: EnvFilter) -> BoxedLayer {
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed(),
        LogFormat::Plain => fmt::layer()
            .event_format(DomainFormat::new())
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed(),
    }
}

fn file_layer(format: LogFormat, writer: NonBlocking, filter: EnvFilter) -> BoxedLayer {
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .fmt_fields(FileFields::default())
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter)
            .boxed(),
        LogFormat::Plain => fmt::layer()
            .event_format(DomainFormat::new())
            .fmt_fields(FileFields::default())
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter)
            .boxed(),
    }
}

/// Install the global `tracing` subscriber described by `config`.
///
/// Logs go to stderr, and also to `config.file` when set (relative to
/// `base_dir`). The returned guard flushes the file writer on drop and must
/// be held until exit. `log` records from `rw-core` are bridged in by
/// `tracing-subscriber`'s `tracing-log` feature.
pub fn init_tracing(config: &LoggingConfig, base_dir: &Path) -> Result<Option<WorkerGuard>> {
    let mut layers = vec![stderr_layer(config.format, build_filter(config)?)];
    let mut guard = None;

    if let Some(file) = &config.file {
        let path = resolve_path(base_dir, file);
        let dir = path
            .parent()
            .context("log file path has no parent directory")?;
        let name = path.file_name().context("log file path has no file name")?;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create log directory {}", dir.display()))?;

        let (writer, file_guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
        layers.push(file_layer(config.format, writer, build_filter(config)?));
        guard = Some(file_guard);
    }

    tracing_subscriber::registry().with(layers).try_init()?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(level: &str, modules: &[(&str, &str)]) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
            modules: modules
                .iter()
                .map(|(m, l)| (m.to_string(), l.to_string()))
                .collect(),
            ..LoggingConfig::default()
        }
    }

    #[test]
    fn filter_from_level_and_modules() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let filter = build_filter(&config("warn", &[("rw_runtime::scheduler", "debug")])).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("warn"));
        assert!(rendered.contains("rw_runtime::scheduler=debug"));
    }

    #[test]
    fn bad_filter_is_rejected() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        assert!(build_filter(&config("info", &[("rw_core", "notalevel")])).is_err());
    }
}
