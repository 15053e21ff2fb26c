use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fp::{MinedPattern, PatternStats};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `a b c:support[:period|:ratio]`, support being expected under uncertainty
    #[default]
    Text,
    /// One JSON object per pattern
    JsonLines,
}

/// Text rendering of one pattern.
pub fn format_pattern(pattern: &MinedPattern) -> String {
    let items = pattern.items.join(" ");
    match pattern.stats {
        PatternStats::Frequent { support } => format!("{items}:{support}"),
        PatternStats::Periodic { support, period } => format!("{items}:{support}:{period}"),
        PatternStats::Correlated { support, ratio } => format!("{items}:{support}:{ratio}"),
        PatternStats::Uncertain { expected_support } => format!("{items}:{expected_support}"),
        PatternStats::UncertainPeriodic {
            expected_support,
            period,
        } => format!("{items}:{expected_support}:{period}"),
    }
}

pub fn write_patterns<W: Write>(
    mut writer: W,
    patterns: &[MinedPattern],
    format: OutputFormat,
) -> Result<()> {
    for pattern in patterns {
        match format {
            OutputFormat::Text => writeln!(writer, "{}", format_pattern(pattern))?,
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut writer, pattern)?;
                writeln!(writer)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn write_patterns_file(
    path: impl AsRef<Path>,
    patterns: &[MinedPattern],
    format: OutputFormat,
) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    write_patterns(writer, patterns, format)
}
