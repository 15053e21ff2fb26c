//! Transaction and neighbor file readers, pattern writers

mod reader;
mod writer;

#[cfg(test)]
mod tests;

pub use reader::{
    ReadOptions, ReadReport, SkippedLine, read_neighbors, read_neighbors_file, read_transactions,
    read_transactions_file,
};
pub use writer::{OutputFormat, format_pattern, write_patterns, write_patterns_file};
