use chrono::Utc;
use colored::Colorize;
use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use diffline_core::StatusDisplay;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Where status updates are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Repaint a single terminal line
    #[default]
    Terminal,
    /// One plain line per update; an empty line means hidden
    Plain,
    /// One JSON object per update
    Json,
}

/// Build a display writing to stdout
pub fn build_display(kind: OutputKind) -> Box<dyn StatusDisplay> {
    match kind {
        OutputKind::Terminal => Box::new(TerminalDisplay::new(io::stdout())),
        OutputKind::Plain => Box::new(PlainDisplay::new(io::stdout())),
        OutputKind::Json => Box::new(JsonDisplay::new(io::stdout())),
    }
}

/// Repaints one terminal line in place
pub struct TerminalDisplay<W: Write + Send> {
    out: W,
    pending: Vec<u8>,
    last: Option<String>,
}

impl<W: Write + Send> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending: Vec::new(),
            last: None,
        }
    }

    fn clear_line(&mut self) {
        let _ = queue!(self.pending, MoveToColumn(0), Clear(ClearType::CurrentLine));
    }
}

impl<W: Write + Send> StatusDisplay for TerminalDisplay<W> {
    fn show(&mut self, label: &str, _tooltip: &str) {
        if self.last.as_deref() == Some(label) {
            return;
        }
        self.clear_line();
        let _ = write!(self.pending, "{}", label.bold());
        self.last = Some(label.to_string());
    }

    fn hide(&mut self) {
        if self.last.is_none() {
            return;
        }
        self.clear_line();
        self.last = None;
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            self.out.write_all(&self.pending)?;
            self.pending.clear();
        }
        self.out.flush()
    }
}

/// Prints the label on its own line; hidden prints an empty line
pub struct PlainDisplay<W: Write + Send> {
    out: W,
    pending: Vec<String>,
    last: Option<String>,
}

impl<W: Write + Send> PlainDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending: Vec::new(),
            last: None,
        }
    }

    fn emit(&mut self, line: &str) {
        if self.last.as_deref() == Some(line) {
            return;
        }
        self.pending.push(line.to_string());
        self.last = Some(line.to_string());
    }
}

impl<W: Write + Send> StatusDisplay for PlainDisplay<W> {
    fn show(&mut self, label: &str, _tooltip: &str) {
        self.emit(label);
    }

    fn hide(&mut self) {
        self.emit("");
    }

    fn flush(&mut self) -> io::Result<()> {
        for line in self.pending.drain(..) {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()
    }
}

/// JSON line consumed by status bars and editor bridges
#[derive(Debug, Serialize)]
struct JsonStatus<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tooltip: Option<&'a str>,
    visible: bool,
    updated_at: String,
}

/// Prints one JSON object per update
pub struct JsonDisplay<W: Write + Send> {
    out: W,
    pending: Vec<String>,
    last: Option<(String, Option<String>)>,
}

impl<W: Write + Send> JsonDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending: Vec::new(),
            last: None,
        }
    }

    fn emit(&mut self, text: &str, tooltip: Option<&str>) {
        let key = (text.to_string(), tooltip.map(str::to_string));
        if self.last.as_ref() == Some(&key) {
            return;
        }
        let status = JsonStatus {
            text,
            tooltip,
            visible: tooltip.is_some(),
            updated_at: Utc::now().to_rfc3339(),
        };
        if let Ok(line) = serde_json::to_string(&status) {
            self.pending.push(line);
        }
        self.last = Some(key);
    }
}

impl<W: Write + Send> StatusDisplay for JsonDisplay<W> {
    fn show(&mut self, label: &str, tooltip: &str) {
        self.emit(label, Some(tooltip));
    }

    fn hide(&mut self) {
        self.emit("", None);
    }

    fn flush(&mut self) -> io::Result<()> {
        for line in self.pending.drain(..) {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()
    }
}
