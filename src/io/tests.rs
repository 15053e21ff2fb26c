use std::io::{Cursor, Write};

use pretty_assertions::assert_eq;

use super::*;
use crate::database::Occurrence;
use crate::error::MiningError;
use crate::fp::{MinedPattern, PatternStats};
use crate::{Miner, MinerConfig, Threshold};

fn labels(database: &crate::TransactionDatabase) -> Vec<(u64, Vec<String>)> {
    database
        .iter()
        .map(|transaction| {
            (
                transaction.timestamp,
                transaction.items.iter().map(|o| o.label.clone()).collect(),
            )
        })
        .collect()
}

#[test]
fn test_read_plain_transactions() {
    let input = "a\tb\tc\n\na\tb\n";
    let (database, report) = read_transactions(Cursor::new(input), &ReadOptions::default()).unwrap();

    assert!(report.is_clean());
    assert_eq!(report.accepted, 2);
    assert_eq!(
        labels(&database),
        vec![
            (1, vec!["a".to_string(), "b".to_string(), "c".to_string()]),
            (2, vec!["a".to_string(), "b".to_string()]),
        ]
    );
}

#[test]
fn test_read_custom_delimiter() {
    let options = ReadOptions::default().with_delimiter(' ');
    let (database, _) = read_transactions(Cursor::new("x  y\nz\n"), &options).unwrap();
    assert_eq!(
        labels(&database),
        vec![
            (1, vec!["x".to_string(), "y".to_string()]),
            (2, vec!["z".to_string()]),
        ]
    );
}

#[test]
fn test_read_temporal_skips_malformed_lines() {
    let input = "1\ta\tb\nx\ta\n3\tc\n2\n";
    let options = ReadOptions::default().with_timestamps();
    let (database, report) = read_transactions(Cursor::new(input), &options).unwrap();

    assert_eq!(
        labels(&database),
        vec![
            (1, vec!["a".to_string(), "b".to_string()]),
            (3, vec!["c".to_string()]),
        ]
    );
    assert_eq!(report.accepted, 2);
    let skipped: Vec<usize> = report.skipped.iter().map(|s| s.line).collect();
    assert_eq!(skipped, vec![2, 4]);
    assert!(report.skipped[0].reason.contains("timestamp"));
}

#[test]
fn test_read_strict_fails_on_malformed_line() {
    let options = ReadOptions::default().with_timestamps().strict();
    let err = read_transactions(Cursor::new("1\ta\nnope\tb\n"), &options).unwrap_err();
    assert!(matches!(err, MiningError::MalformedInput { line: 2, .. }));
}

#[test]
fn test_read_uncertain_items() {
    let input = "a(0.5)\tb(1.0)\na(1.5)\nb0.5\nc( 0.25 )\n";
    let options = ReadOptions::default().with_probabilities();
    let (database, report) = read_transactions(Cursor::new(input), &options).unwrap();

    let transactions: Vec<_> = database.iter().collect();
    assert_eq!(transactions.len(), 2);
    assert_eq!(
        transactions[0].items,
        vec![Occurrence::uncertain("a", 0.5), Occurrence::uncertain("b", 1.0)]
    );
    assert_eq!(transactions[1].items, vec![Occurrence::uncertain("c", 0.25)]);
    assert_eq!(transactions[1].timestamp, 2);

    let skipped: Vec<usize> = report.skipped.iter().map(|s| s.line).collect();
    assert_eq!(skipped, vec![2, 3]);
}

#[test]
fn test_read_temporal_uncertain_items() {
    let input = "2\ta(0.5)\tb(1.0)\n5\tb(0.25)\n7\tc\n";
    let options = ReadOptions::default().with_timestamps().with_probabilities();
    let (database, report) = read_transactions(Cursor::new(input), &options).unwrap();

    let transactions: Vec<_> = database.iter().collect();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].timestamp, 2);
    assert_eq!(
        transactions[0].items,
        vec![Occurrence::uncertain("a", 0.5), Occurrence::uncertain("b", 1.0)]
    );
    assert_eq!(transactions[1].timestamp, 5);
    assert_eq!(transactions[1].items, vec![Occurrence::uncertain("b", 0.25)]);
    assert_eq!(database.horizon(), 5);

    let skipped: Vec<usize> = report.skipped.iter().map(|s| s.line).collect();
    assert_eq!(skipped, vec![3]);
}

#[test]
fn test_read_neighbors() {
    let input = "a b c\nb a\n\nc a\na d\n";
    let neighbors = read_neighbors(Cursor::new(input)).unwrap();

    assert_eq!(neighbors.len(), 3);
    assert_eq!(
        neighbors.get("a").unwrap(),
        &["b".to_string(), "c".to_string(), "d".to_string()]
    );
    assert_eq!(neighbors.get("b").unwrap(), &["a".to_string()]);
    assert!(neighbors.get("d").is_none());
}

#[test]
fn test_format_pattern_per_mode() {
    let items = vec!["a".to_string(), "b".to_string()];
    let cases = [
        (PatternStats::Frequent { support: 3 }, "a b:3"),
        (PatternStats::Periodic { support: 3, period: 2 }, "a b:3:2"),
        (PatternStats::Correlated { support: 2, ratio: 0.5 }, "a b:2:0.5"),
        (PatternStats::Uncertain { expected_support: 1.25 }, "a b:1.25"),
        (
            PatternStats::UncertainPeriodic {
                expected_support: 1.5,
                period: 4,
            },
            "a b:1.5:4",
        ),
    ];
    for (stats, expected) in cases {
        let pattern = MinedPattern {
            items: items.clone(),
            stats,
        };
        assert_eq!(format_pattern(&pattern), expected);
    }
}

#[test]
fn test_write_json_lines() {
    let patterns = vec![
        MinedPattern {
            items: vec!["a".to_string()],
            stats: PatternStats::Periodic { support: 4, period: 1 },
        },
        MinedPattern {
            items: vec!["a".to_string(), "b".to_string()],
            stats: PatternStats::Frequent { support: 2 },
        },
    ];
    let mut buffer = Vec::new();
    write_patterns(&mut buffer, &patterns, OutputFormat::JsonLines).unwrap();

    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["items"], serde_json::json!(["a"]));
    assert_eq!(lines[0]["kind"], "periodic");
    assert_eq!(lines[0]["support"], 4);
    assert_eq!(lines[0]["period"], 1);
    assert_eq!(lines[1]["kind"], "frequent");
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("transactions.txt");
    let output = dir.path().join("patterns.txt");
    {
        let mut file = std::fs::File::create(&input).unwrap();
        writeln!(file, "a\tb\tc").unwrap();
        writeln!(file, "a\tb").unwrap();
        writeln!(file, "a\tc").unwrap();
    }

    let (database, report) = read_transactions_file(&input, &ReadOptions::default()).unwrap();
    assert!(report.is_clean());
    let patterns = Miner::new(MinerConfig::frequent(Threshold::Count(2)))
        .mine(&database)
        .unwrap();
    write_patterns_file(&output, &patterns, OutputFormat::Text).unwrap();

    let mut written: Vec<String> = std::fs::read_to_string(&output)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    written.sort();
    assert_eq!(written, vec!["a b:2", "a c:2", "a:3", "b:2", "c:2"]);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_transactions_file(dir.path().join("absent.txt"), &ReadOptions::default())
        .unwrap_err();
    assert!(matches!(err, MiningError::Io(_)));
}
