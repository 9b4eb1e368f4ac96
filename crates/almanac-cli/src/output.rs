use std::io::Write;

use almanac_core::{FeedResponse, NormalizedRecord};

use crate::cli::OutputFormat;
use crate::commands::{CommandOutput, SourceRow};
use crate::error::CliError;

const TITLE_WIDTH: usize = 60;

pub fn render(
    output: &CommandOutput,
    format: OutputFormat,
    pretty: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = match output {
                CommandOutput::Feed(response) => to_json(response, pretty)?,
                CommandOutput::Sources(rows) => to_json(rows, pretty)?,
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => match output {
            CommandOutput::Feed(response) => render_feed_table(response, out)?,
            CommandOutput::Sources(rows) => render_sources_table(rows, out)?,
        },
    }

    Ok(())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(payload)
}

fn render_feed_table(response: &FeedResponse, out: &mut impl Write) -> Result<(), CliError> {
    match response {
        FeedResponse::Live(envelope) => {
            writeln!(out, "source   : {}", envelope.source)?;
            writeln!(out, "count    : {}", envelope.count)?;
            writeln!(out, "timestamp: {}", envelope.timestamp)?;
        }
        FeedResponse::Fallback(envelope) => {
            writeln!(out, "source   : {}", envelope.source)?;
            writeln!(out, "error    : {}", envelope.error)?;
        }
    }

    let events = response.events();
    if events.is_empty() {
        writeln!(out, "(no events)")?;
        return Ok(());
    }

    let rows: Vec<[String; 5]> = events.iter().map(event_columns).collect();
    let header = ["DATE", "CATEGORY", "IMPACT", "SOURCE", "TITLE"].map(String::from);
    write_columns(&header, &rows, out)
}

fn event_columns(record: &NormalizedRecord) -> [String; 5] {
    [
        record.date.clone(),
        record.category.to_string(),
        record.impact_level.to_string(),
        record.source.clone(),
        truncate(&record.title, TITLE_WIDTH),
    ]
}

fn render_sources_table(rows: &[SourceRow], out: &mut impl Write) -> Result<(), CliError> {
    let header = ["ID", "LABEL", "CATEGORY", "STATUS"].map(String::from);
    let rows: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.id.to_string(),
                row.label.to_owned(),
                row.category.to_string(),
                row.status.to_owned(),
            ]
        })
        .collect();
    write_columns(&header, &rows, out)
}

fn write_columns<const N: usize>(
    header: &[String; N],
    rows: &[[String; N]],
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut widths = header.clone().map(|cell| cell.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    for row in std::iter::once(header).chain(rows) {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(out, "{}", line.trim_end())?;
    }

    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let head: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{head}...")
}
