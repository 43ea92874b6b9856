//! The host log layer.
//!
//! [`HostLayer`] is a `tracing-subscriber` layer that renders every event as
//! a `MM-DD HH:MM:SS [scope] LEVEL: message` line and fans it out to sinks,
//! each with its own level threshold. The scope tag is taken from the
//! innermost active span carrying an `extension` field (see
//! [`crate::ExtensionScope`]); events outside any extension scope are tagged
//! with [`crate::CORE_SCOPE`].

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::{TelemetryError, TelemetryResult};
use crate::level::LogLevel;
use crate::scope::CORE_SCOPE;
use crate::sink::{ConsoleSink, FileSink, LogSink};

/// Logging configuration for the host.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum level written to the console.
    pub console_level: LogLevel,
    /// Minimum level written to the log file.
    pub file_level: LogLevel,
    /// Directory for dated log files; `None` disables the file sink.
    pub directory: Option<PathBuf>,
    /// Number of dated log files to keep.
    pub retention: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_level: LogLevel::Info,
            file_level: LogLevel::Info,
            directory: None,
            retention: 30,
        }
    }
}

/// Scope tag recorded into span extensions when a span declares an
/// `extension` field.
struct ScopeTag(String);

/// Formatting layer fanning log lines out to threshold-guarded sinks.
pub struct HostLayer {
    sinks: Vec<(LogLevel, Arc<dyn LogSink>)>,
}

impl HostLayer {
    /// Create a layer with no sinks attached.
    #[must_use]
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Attach a sink that receives events at `threshold` and above.
    #[must_use]
    pub fn with_sink(mut self, threshold: LogLevel, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push((threshold, sink));
        self
    }

    /// Build the layer described by a [`LogConfig`]: a console sink, plus a
    /// file sink when a log directory is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the log directory or file cannot be created.
    pub fn from_config(config: &LogConfig) -> TelemetryResult<Self> {
        let mut layer = Self::new().with_sink(config.console_level, Arc::new(ConsoleSink));
        if let Some(directory) = &config.directory {
            let file = FileSink::open(directory, config.retention)?;
            layer = layer.with_sink(config.file_level, Arc::new(file));
        }
        Ok(layer)
    }

    /// The lowest threshold of any attached sink, used to skip formatting
    /// for events no sink wants.
    fn min_threshold(&self) -> Option<LogLevel> {
        self.sinks.iter().map(|(threshold, _)| *threshold).min()
    }
}

impl Default for HostLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HostLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostLayer")
            .field("sink_count", &self.sinks.len())
            .finish()
    }
}

impl<S> Layer<S> for HostLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = ScopeVisitor(None);
        attrs.record(&mut visitor);
        if let Some(tag) = visitor.0 {
            if let Some(span) = ctx.span(id) {
                span.extensions_mut().insert(ScopeTag(tag));
            }
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let level = LogLevel::from(*event.metadata().level());
        match self.min_threshold() {
            Some(min) if level >= min => {},
            _ => return,
        }

        let scope = ctx
            .event_scope(event)
            .and_then(|scope| {
                scope
                    .from_root()
                    .filter_map(|span| span.extensions().get::<ScopeTag>().map(|t| t.0.clone()))
                    .last()
            })
            .unwrap_or_else(|| CORE_SCOPE.to_string());

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let line = format!(
            "{} [{}] {}: {}",
            chrono::Local::now().format("%m-%d %H:%M:%S"),
            scope,
            level.label(),
            visitor.render(),
        );

        for (threshold, sink) in &self.sinks {
            if level >= *threshold {
                sink.write_line(&line);
            }
        }
    }
}

/// Install a global subscriber consisting of a single [`HostLayer`].
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global
/// subscriber is already installed.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let layer = HostLayer::from_config(config)?;
    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| TelemetryError::SetGlobalDefault(e.to_string()))
}

/// Extracts the `extension` field from span attributes.
struct ScopeVisitor(Option<String>);

impl Visit for ScopeVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "extension" {
            self.0 = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "extension" && self.0.is_none() {
            let rendered = format!("{value:?}");
            self.0 = Some(rendered.trim_matches('"').to_string());
        }
    }
}

/// Collects the event message plus any structured fields.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn render(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else {
            format!("{}{}", self.message, self.fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        use fmt::Write as _;
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        use fmt::Write as _;
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}
