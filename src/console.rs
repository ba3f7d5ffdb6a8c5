//! In-app log console: a tracing layer that keeps the most recent log events
//! in a bounded buffer the "Logs" tab renders from.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// Shared handle to the captured lines.
#[derive(Debug, Clone)]
pub struct LogConsole {
    lines: Arc<Mutex<VecDeque<LogLine>>>,
    capacity: usize,
}

impl LogConsole {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    pub fn layer(&self) -> LogConsoleLayer {
        LogConsoleLayer {
            console: self.clone(),
        }
    }

    pub fn push(&self, line: LogLine) {
        if let Ok(mut lines) = self.lines.lock() {
            while lines.len() >= self.capacity {
                lines.pop_front();
            }
            lines.push_back(line);
        }
    }

    /// The newest `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> Vec<LogLine> {
        match self.lines.lock() {
            Ok(lines) => lines.iter().skip(lines.len().saturating_sub(n)).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct LogConsoleLayer {
    console: LogConsole,
}

struct MsgVisitor {
    message: Option<String>,
    fields: Vec<String>,
}

impl Visit for MsgVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

impl<S> Layer<S> for LogConsoleLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut visitor = MsgVisitor {
            message: None,
            fields: Vec::new(),
        };
        event.record(&mut visitor);

        let mut message = visitor.message.unwrap_or_default();
        if !visitor.fields.is_empty() {
            message = format!("{message} {}", visitor.fields.join(" "));
        }
        self.console.push(LogLine {
            level: *meta.level(),
            target: meta.target().to_string(),
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{info, warn};
    use tracing_subscriber::prelude::*;

    #[test]
    fn captures_events_from_subscriber() {
        let console = LogConsole::new(10);
        let subscriber = tracing_subscriber::registry().with(console.layer());
        tracing::subscriber::with_default(subscriber, || {
            info!("Loaded {} records", 3);
            warn!(row = 7, "bad row key");
        });

        let lines = console.tail(10);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].level, Level::INFO);
        assert_eq!(lines[0].message, "Loaded 3 records");
        assert_eq!(lines[1].level, Level::WARN);
        assert_eq!(lines[1].message, "bad row key row=7");
    }

    #[test]
    fn oldest_lines_are_evicted() {
        let console = LogConsole::new(3);
        for i in 0..5 {
            console.push(LogLine {
                level: Level::DEBUG,
                target: "test".to_string(),
                message: format!("line {i}"),
            });
        }
        assert_eq!(console.len(), 3);
        let messages: Vec<String> = console.tail(2).into_iter().map(|l| l.message).collect();
        assert_eq!(messages, vec!["line 3", "line 4"]);
    }
}
