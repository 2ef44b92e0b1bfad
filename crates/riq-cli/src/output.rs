//! Output renderers and formatting helpers for CLI commands.

use std::io::{self, Write};

use anyhow::anyhow;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::{Map, Value};

use crate::client::{CliError, CliResult};

const INDENT: &str = "  ";

/// Presentation flags shared by every subcommand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Presentation {
    pub(crate) oneline: bool,
    pub(crate) short: bool,
    pub(crate) as_json: bool,
}

impl Presentation {
    pub(crate) const fn render_options(self) -> RenderOptions {
        RenderOptions {
            oneline: self.oneline,
            short: self.short,
        }
    }
}

/// Text rendering switches; `short` wins over `oneline`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RenderOptions {
    pub(crate) oneline: bool,
    pub(crate) short: bool,
}

/// Named text views for blacklist payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    Lookup,
    Incident,
}

impl View {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Lookup => "blacklist/lookup",
            Self::Incident => "blacklist/incident",
        }
    }

    const fn empty_message(self) -> &'static str {
        match self {
            Self::Lookup => "No results found.",
            Self::Incident => "No incidents found.",
        }
    }
}

/// Write `payload` as four-space indented, ASCII-only JSON followed by a newline.
pub(crate) fn write_json<W: Write>(out: &mut W, payload: &Value) -> CliResult<()> {
    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(
        &mut buffer,
        AsciiFormatter {
            pretty: PrettyFormatter::with_indent(b"    "),
        },
    );
    payload
        .serialize(&mut serializer)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    buffer.push(b'\n');
    out.write_all(&buffer).map_err(write_failure)
}

/// Write the rendered text view of `payload` followed by a newline.
///
/// Nothing is written when the rendering is empty, as `--short` is for
/// entries without a `url`.
pub(crate) fn write_view<W: Write>(
    out: &mut W,
    payload: &Value,
    view: View,
    options: RenderOptions,
) -> CliResult<()> {
    let text = render(payload, view, options);
    tracing::debug!(view = view.as_str(), bytes = text.len(), "rendered view");
    if text.is_empty() {
        return Ok(());
    }
    writeln!(out, "{text}").map_err(write_failure)
}

/// Pretty formatter that writes every non-ASCII char as `\uXXXX`, using a
/// UTF-16 surrogate pair outside the basic multilingual plane.
struct AsciiFormatter<'a> {
    pretty: PrettyFormatter<'a>,
}

impl Formatter for AsciiFormatter<'_> {
    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..index])?;
            let mut units = [0_u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }

    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }
}

fn write_failure(err: io::Error) -> CliError {
    CliError::failure(anyhow!("failed to write output: {err}"))
}

/// Render `payload` as human-readable text for `view`.
pub(crate) fn render(payload: &Value, view: View, options: RenderOptions) -> String {
    let entries = entries(payload, view);

    if options.short {
        return entries
            .iter()
            .filter_map(|entry| entry.get("url").map(scalar_text))
            .collect::<Vec<_>>()
            .join("\n");
    }
    if entries.is_empty() {
        return view.empty_message().to_string();
    }
    if options.oneline {
        return entries
            .iter()
            .map(|entry| oneline(entry))
            .collect::<Vec<_>>()
            .join("\n");
    }
    entries
        .iter()
        .map(|entry| block(entry))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Incident payloads wrap their records in the first array-of-objects field.
fn entries(payload: &Value, view: View) -> Vec<&Value> {
    match payload {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) if view == View::Incident => record_array(map)
            .map_or_else(|| vec![payload], |items| items.iter().collect()),
        other => vec![other],
    }
}

fn record_array(map: &Map<String, Value>) -> Option<&Vec<Value>> {
    map.values().find_map(|value| match value {
        Value::Array(items) if items.iter().all(Value::is_object) => Some(items),
        _ => None,
    })
}

fn oneline(entry: &Value) -> String {
    match entry {
        Value::Object(map) => map
            .iter()
            .filter(|(_, value)| is_scalar(value))
            .map(|(key, value)| format!("{key}={}", scalar_text(value)))
            .collect::<Vec<_>>()
            .join(" "),
        other => scalar_text(other),
    }
}

fn block(entry: &Value) -> String {
    let mut lines = Vec::new();
    match entry {
        Value::Object(map) => push_fields(&mut lines, map, 0),
        Value::Array(items) => push_items(&mut lines, items, 0),
        other => lines.push(scalar_text(other)),
    }
    lines.join("\n")
}

fn push_fields(lines: &mut Vec<String>, map: &Map<String, Value>, depth: usize) {
    let indent = INDENT.repeat(depth);
    for (key, value) in map {
        match value {
            Value::Object(child) if child.is_empty() => lines.push(format!("{indent}{key}: (none)")),
            Value::Object(child) => {
                lines.push(format!("{indent}{key}:"));
                push_fields(lines, child, depth + 1);
            }
            Value::Array(items) if items.is_empty() => lines.push(format!("{indent}{key}: (none)")),
            Value::Array(items) if items.iter().all(is_scalar) => {
                let joined = items.iter().map(scalar_text).collect::<Vec<_>>().join(", ");
                lines.push(format!("{indent}{key}: {joined}"));
            }
            Value::Array(items) => {
                lines.push(format!("{indent}{key}:"));
                push_items(lines, items, depth + 1);
            }
            scalar => lines.push(format!("{indent}{key}: {}", scalar_text(scalar))),
        }
    }
}

fn push_items(lines: &mut Vec<String>, items: &[Value], depth: usize) {
    let indent = INDENT.repeat(depth);
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::Object(map) => {
                lines.push(format!("{indent}[{index}]"));
                push_fields(lines, map, depth + 1);
            }
            Value::Array(nested) => {
                lines.push(format!("{indent}[{index}]"));
                push_items(lines, nested, depth + 1);
            }
            scalar => lines.push(format!("{indent}- {}", scalar_text(scalar))),
        }
    }
}

const fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
