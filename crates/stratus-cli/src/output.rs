//! Terminal rendering, confirmation prompts, and formatting helpers.

use std::io::{self, Write};

use anyhow::anyhow;
use chrono::{Local, TimeZone};
use comfy_table::{ContentArrangement, Table, presets};
use dialoguer::Confirm;
use dialoguer::console::{self, style};
use serde::Serialize;
use stratus_actor::{LogMessage, Warnings};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

/// Source of yes/no answers for confirmation prompts.
pub(crate) trait Prompter: Send {
    fn confirm(&mut self, prompt: &str) -> CliResult<bool>;
}

/// Interactive prompt on the controlling terminal.
pub(crate) struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, prompt: &str) -> CliResult<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|err| CliError::failure(anyhow!("failed to read confirmation: {err}")))
    }
}

/// Output sink for command handlers.
///
/// Primary output goes to `out`; warnings and diagnostics go to `err`.
pub(crate) struct Ui {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
    prompter: Box<dyn Prompter>,
    format: OutputFormat,
    color: bool,
}

impl Ui {
    pub(crate) fn stdio(format: OutputFormat) -> Self {
        Self {
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
            prompter: Box::new(TerminalPrompter),
            format,
            color: console::colors_enabled(),
        }
    }

    pub(crate) const fn format(&self) -> OutputFormat {
        self.format
    }

    pub(crate) fn display_text(&mut self, text: &str) {
        write_line(&mut self.out, text);
    }

    pub(crate) fn display_newline(&mut self) {
        write_line(&mut self.out, "");
    }

    pub(crate) fn display_ok(&mut self) {
        let ok = if self.color {
            style("OK").green().bold().to_string()
        } else {
            "OK".to_string()
        };
        write_line(&mut self.out, &ok);
    }

    /// Print and clear every collected warning.
    pub(crate) fn display_warnings(&mut self, warnings: &mut Warnings) {
        for warning in std::mem::take(warnings) {
            let line = if self.color {
                style(warning).yellow().bold().to_string()
            } else {
                warning
            };
            write_line(&mut self.err, &line);
        }
    }

    pub(crate) fn display_error(&mut self, message: &str) {
        write_line(&mut self.err, &format!("error: {message}"));
    }

    pub(crate) fn display_table(&mut self, header: &[&str], rows: Vec<Vec<String>>) {
        let mut table = Table::new();
        table.load_preset(presets::NOTHING);
        table.set_content_arrangement(ContentArrangement::Disabled);
        table.set_header(header.iter().copied());
        for row in rows {
            table.add_row(row);
        }
        for line in table.lines() {
            write_line(&mut self.out, line.trim_end());
        }
    }

    pub(crate) fn display_key_values(&mut self, pairs: &[(&str, String)]) {
        let width = pairs.iter().map(|(key, _)| key.len() + 1).max().unwrap_or(0);
        for (key, value) in pairs {
            let label = format!("{key}:");
            write_line(&mut self.out, &format!("{label:<width$}   {value}"));
        }
    }

    pub(crate) fn display_json<T: Serialize + ?Sized>(&mut self, value: &T) -> CliResult<()> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
        write_line(&mut self.out, &text);
        Ok(())
    }

    pub(crate) fn display_log(&mut self, message: &LogMessage) {
        write_line(&mut self.out, &format_log_line(message, &Local));
    }

    pub(crate) fn confirm(&mut self, prompt: &str) -> CliResult<bool> {
        self.prompter.confirm(prompt)
    }
}

fn write_line(writer: &mut Box<dyn Write + Send>, text: &str) {
    if let Err(err) = writeln!(writer, "{text}") {
        tracing::debug!(error = %err, "failed to write output");
    }
}

/// Render a log line as `   <timestamp> [SOURCE/INSTANCE] OUT|ERR message`.
pub(crate) fn format_log_line<Tz>(message: &LogMessage, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let timestamp = message
        .timestamp
        .with_timezone(zone)
        .format("%Y-%m-%dT%H:%M:%S%.3f%z");
    let source = if message.source_instance.is_empty() {
        message.source_type.clone()
    } else {
        format!("{}/{}", message.source_type, message.source_instance)
    };
    format!(
        "   {timestamp} [{source}] {} {}",
        message.stream.as_str(),
        message.message.trim_end()
    )
}

/// Memory limit in megabytes rendered with a unit; `None` is unlimited.
pub(crate) fn format_memory(megabytes: Option<u64>) -> String {
    match megabytes {
        None => "unlimited".to_string(),
        Some(mb) if mb >= 1024 && mb % 1024 == 0 => format!("{}G", mb / 1024),
        Some(mb) => format!("{mb}M"),
    }
}

/// Count limit; `None` is unlimited.
pub(crate) fn format_limit(limit: Option<u64>) -> String {
    limit.map_or_else(|| "unlimited".to_string(), |value| value.to_string())
}

pub(crate) const fn format_allowed(allowed: bool) -> &'static str {
    if allowed { "allowed" } else { "disallowed" }
}
