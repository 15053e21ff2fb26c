use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::database::{NeighborMap, Occurrence, Transaction, TransactionDatabase};
use crate::error::{MiningError, Result};

/// Layout of a transaction file.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadOptions {
    /// Field separator; tab by default
    pub delimiter: char,
    /// First field of every line is the transaction timestamp
    pub timestamps: bool,
    /// Items are written `label(probability)`
    pub probabilities: bool,
    /// Fail on the first malformed line instead of skipping it
    pub strict: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            timestamps: false,
            probabilities: false,
            strict: false,
        }
    }
}

impl ReadOptions {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_timestamps(mut self) -> Self {
        self.timestamps = true;
        self
    }

    pub fn with_probabilities(mut self) -> Self {
        self.probabilities = true;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number
    pub line: usize,
    pub reason: String,
}

/// What a lenient read left behind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadReport {
    pub accepted: usize,
    pub skipped: Vec<SkippedLine>,
}

impl ReadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

pub fn read_transactions_file(
    path: impl AsRef<Path>,
    options: &ReadOptions,
) -> Result<(TransactionDatabase, ReadReport)> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading transactions");
    read_transactions(BufReader::new(File::open(path)?), options)
}

/// Parses one transaction per line.
///
/// Blank lines are ignored. Without a timestamp column each accepted
/// transaction is stamped with its 1-based position among accepted ones.
pub fn read_transactions<R: BufRead>(
    reader: R,
    options: &ReadOptions,
) -> Result<(TransactionDatabase, ReadReport)> {
    let mut database = TransactionDatabase::new();
    let mut report = ReadReport::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let next_position = database.len() as u64 + 1;
        match parse_transaction(&line, next_position, options) {
            Ok(transaction) => {
                database.push(transaction);
                report.accepted += 1;
            }
            Err(reason) if options.strict => return Err(MiningError::malformed(line_number, reason)),
            Err(reason) => {
                warn!(line = line_number, %reason, "skipping malformed transaction");
                report.skipped.push(SkippedLine {
                    line: line_number,
                    reason,
                });
            }
        }
    }

    debug!(
        accepted = report.accepted,
        skipped = report.skipped.len(),
        "read transactions"
    );
    Ok((database, report))
}

fn parse_transaction(
    line: &str,
    position: u64,
    options: &ReadOptions,
) -> std::result::Result<Transaction, String> {
    let mut fields = line
        .split(options.delimiter)
        .map(str::trim)
        .filter(|field| !field.is_empty());

    let timestamp = if options.timestamps {
        let field = fields.next().ok_or("missing timestamp")?;
        field
            .parse::<u64>()
            .map_err(|_| format!("invalid timestamp {field:?}"))?
    } else {
        position
    };

    let items = fields
        .map(|field| {
            if options.probabilities {
                parse_uncertain(field)
            } else {
                Ok(Occurrence::certain(field))
            }
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if items.is_empty() {
        return Err("transaction has no items".to_string());
    }
    Ok(Transaction::new(timestamp, items))
}

/// `label(probability)` with a probability in (0, 1].
fn parse_uncertain(field: &str) -> std::result::Result<Occurrence, String> {
    let (label, rest) = field
        .split_once('(')
        .ok_or_else(|| format!("expected label(probability), got {field:?}"))?;
    let value = rest
        .strip_suffix(')')
        .ok_or_else(|| format!("unterminated probability in {field:?}"))?;
    let probability = value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| *p > 0.0 && *p <= 1.0)
        .ok_or_else(|| format!("probability out of range in {field:?}"))?;
    let label = label.trim();
    if label.is_empty() {
        return Err(format!("empty label in {field:?}"));
    }
    Ok(Occurrence::uncertain(label, probability))
}

pub fn read_neighbors_file(path: impl AsRef<Path>) -> Result<NeighborMap> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading neighbors");
    read_neighbors(BufReader::new(File::open(path)?))
}

/// Parses an item followed by its neighbors on each line, whitespace
/// separated. Repeated items accumulate their neighbor lists.
pub fn read_neighbors<R: BufRead>(reader: R) -> Result<NeighborMap> {
    let mut neighbors = NeighborMap::new();
    for line in reader.lines() {
        let line = line?;
        let mut fields = line.split_whitespace();
        if let Some(item) = fields.next() {
            neighbors.insert(item, fields);
        }
    }
    debug!(items = neighbors.len(), "read neighbors");
    Ok(neighbors)
}
