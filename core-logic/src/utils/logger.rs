use crate::config::LogSettings;
use chrono::{Local, Utc};
use chrono_tz::Tz;
use nu_ansi_term::{Color, Style};
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    EnvFilter,
};

const TIMESTAMP_COLOR: Color = Color::Rgb(123, 164, 253);
const WARN_COLOR: Color = Color::Rgb(253, 155, 70);

/// Install the console + rolling-file subscriber.
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// by the caller. Returns `None` when a global subscriber is already set.
pub fn setup_logger(settings: &LogSettings) -> Option<WorkerGuard> {
    std::fs::create_dir_all(&settings.directory).ok();

    let file_appender = tracing_appender::rolling::hourly(&settings.directory, "app");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_str()));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(FileFormatter);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .event_format(TerminalFormatter::new(&settings.timezone));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    match installed {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

// --- Formatters ---

struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

fn event_message(event: &Event<'_>) -> String {
    let mut visitor = MessageVisitor {
        message: String::new(),
    };
    event.record(&mut visitor);
    visitor.message
}

/// Pick the console style for a message.
///
/// Errors are red, warnings orange, and informational lines yellow unless
/// they report a success, which is green.
pub(crate) fn message_style(level: &Level, msg: &str) -> Style {
    match *level {
        Level::ERROR => Style::new().fg(Color::LightRed),
        Level::WARN => Style::new().fg(WARN_COLOR),
        _ if msg.contains("Success") || msg.contains("SUCCESS") => {
            Style::new().fg(Color::LightGreen)
        }
        Level::INFO => Style::new().fg(Color::LightYellow),
        _ => Style::new().dimmed(),
    }
}

pub struct TerminalFormatter {
    timezone: Tz,
}

impl TerminalFormatter {
    pub fn new(timezone: &str) -> Self {
        Self {
            timezone: timezone.parse().unwrap_or(chrono_tz::Asia::Jakarta),
        }
    }
}

impl<S, N> FormatEvent<S, N> for TerminalFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let msg = event_message(event);
        let timestamp = Utc::now().with_timezone(&self.timezone).format("%H:%M:%S");
        let style = message_style(event.metadata().level(), &msg);

        write!(
            writer,
            "{} {}",
            TIMESTAMP_COLOR.paint(format!("[{}]", timestamp)),
            style.paint(msg)
        )?;
        writeln!(writer)
    }
}

pub struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let level = event.metadata().level();

        write!(writer, "{} [{}] ", timestamp, level)?;
        writeln!(writer, "{}", event_message(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_lines_are_green() {
        let style = message_style(&Level::INFO, "mtst1....abcde Successfully synced!");
        assert_eq!(style, Style::new().fg(Color::LightGreen));
    }

    #[test]
    fn errors_stay_red_even_when_mentioning_success() {
        let style = message_style(&Level::ERROR, "Success rate dropped");
        assert_eq!(style, Style::new().fg(Color::LightRed));
    }

    #[test]
    fn unknown_timezone_falls_back_to_jakarta() {
        let formatter = TerminalFormatter::new("Mars/Olympus");
        assert_eq!(formatter.timezone, chrono_tz::Asia::Jakarta);
    }
}
