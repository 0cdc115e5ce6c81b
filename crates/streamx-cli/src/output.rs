use clap::ValueEnum;
use color_eyre::Result;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

#[derive(Debug, Clone, Copy)]
enum MessageKind {
    Success,
    Error,
    Info,
    Warning,
}

impl MessageKind {
    fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
            MessageKind::Info => "info",
            MessageKind::Warning => "warning",
        }
    }
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.message(MessageKind::Success, msg.as_ref());
    }

    /// Always shown, even in quiet mode
    pub fn error(&self, msg: impl AsRef<str>) {
        self.message(MessageKind::Error, msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.message(MessageKind::Info, msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.message(MessageKind::Warning, msg.as_ref());
    }

    fn message(&self, kind: MessageKind, msg: &str) {
        let Some(line) = self.message_line(kind, msg) else {
            return;
        };
        if self.is_human() && matches!(kind, MessageKind::Error) {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    /// The rendered line for a message, `None` when quiet mode drops it
    fn message_line(&self, kind: MessageKind, msg: &str) -> Option<String> {
        if self.quiet && !matches!(kind, MessageKind::Error) {
            return None;
        }

        let line = match self.format {
            OutputFormat::Human => match kind {
                MessageKind::Success => format!("{} {}", "✓".green(), msg),
                MessageKind::Error => format!("{} {}", "✗".red(), msg),
                MessageKind::Info => msg.to_string(),
                MessageKind::Warning => format!("{} {}", "⚠".yellow(), msg),
            },
            OutputFormat::Json | OutputFormat::JsonPretty => self.json_text(&json!({
                "type": kind.as_str(),
                "message": msg
            })),
        };
        Some(line)
    }

    /// Human mode prints the table, JSON modes print `data`
    pub fn render<T: Serialize>(&self, table: impl FnOnce() -> Table, data: &T) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        match self.format {
            OutputFormat::Human => println!("{}", table()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&serde_json::to_value(data)?);
            }
        }
        Ok(())
    }

    pub fn json<T: Serialize>(&self, data: &T) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.print_json(&serde_json::to_value(data)?);
        Ok(())
    }

    fn print_json(&self, data: &serde_json::Value) {
        println!("{}", self.json_text(data));
    }

    fn json_text(&self, data: &serde_json::Value) -> String {
        match self.format {
            OutputFormat::JsonPretty => serde_json::to_string_pretty(data).unwrap_or_default(),
            OutputFormat::Json | OutputFormat::Human => serde_json::to_string(data).unwrap_or_default(),
        }
    }
}
