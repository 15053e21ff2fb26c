use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use crate::config::{MinerConfig, Threshold};
use crate::database::{Occurrence, Transaction, TransactionDatabase};
use crate::error::MiningError;
use crate::fp::{MinedPattern, Miner, PatternStats};

impl From<MiningError> for PyErr {
    fn from(err: MiningError) -> Self {
        match err {
            MiningError::Io(err) => PyIOError::new_err(err.to_string()),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

fn parse_threshold(text: &str) -> PyResult<Threshold> {
    Ok(text.parse::<Threshold>()?)
}

fn mine_with(
    database: &TransactionDatabase,
    config: MinerConfig,
    max_length: Option<usize>,
) -> PyResult<Vec<MinedPattern>> {
    let config = match max_length {
        Some(length) => config.with_max_pattern_length(length),
        None => config,
    };
    Ok(Miner::new(config).mine(database)?)
}

/// Frequent itemsets of a dense 0/1 matrix, one array of column indices per
/// itemset length.
#[pyfunction]
#[pyo3(name = "fp_growth")]
fn fp_growth_py<'py>(
    py: Python<'py>,
    transactions: PyReadonlyArray2<'py, i32>,
    min_support: f64,
) -> PyResult<Vec<Bound<'py, PyArray2<usize>>>> {
    let transactions_view = transactions.as_array();
    let mut database = TransactionDatabase::new();
    for row in transactions_view.rows() {
        database.push_items(
            row.iter()
                .enumerate()
                .filter(|(_, value)| **value != 0)
                .map(|(column, _)| column.to_string()),
        );
    }
    let patterns = mine_with(
        &database,
        MinerConfig::frequent(Threshold::Fraction(min_support)).with_parallel(true),
        None,
    )?;

    let mut levels: Vec<Vec<usize>> = Vec::new();
    for pattern in &patterns {
        let mut columns = pattern
            .items
            .iter()
            .map(|label| label.parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        columns.sort_unstable();
        if levels.len() < columns.len() {
            levels.resize_with(columns.len(), Vec::new);
        }
        levels[columns.len() - 1].extend(columns);
    }

    let mut result = Vec::new();
    for (index, data) in levels.into_iter().enumerate() {
        if data.is_empty() {
            continue;
        }
        let itemset_size = index + 1;
        let num_itemsets = data.len() / itemset_size;
        let array = Array2::from_shape_vec((num_itemsets, itemset_size), data)
            .map_err(|_| PyValueError::new_err("Failed to create array"))?;
        result.push(array.into_pyarray(py));
    }
    Ok(result)
}

/// Frequent itemsets of labeled transactions as `(items, support)` pairs.
#[pyfunction]
#[pyo3(name = "mine", signature = (transactions, min_support, max_length=None))]
fn mine_py(
    transactions: Vec<Vec<String>>,
    min_support: &str,
    max_length: Option<usize>,
) -> PyResult<Vec<(Vec<String>, u64)>> {
    let mut database = TransactionDatabase::new();
    for transaction in transactions {
        database.push_items(transaction);
    }
    let config = MinerConfig::frequent(parse_threshold(min_support)?);
    let patterns = mine_with(&database, config, max_length)?;
    Ok(patterns
        .into_iter()
        .filter_map(|pattern| match pattern.stats {
            PatternStats::Frequent { support } => Some((pattern.items, support)),
            _ => None,
        })
        .collect())
}

/// Periodic-frequent itemsets as `(items, support, period)` triples. Each
/// transaction is stamped with the matching entry of `timestamps`.
#[pyfunction]
#[pyo3(
    name = "mine_periodic",
    signature = (transactions, timestamps, min_support, max_period, max_length=None)
)]
fn mine_periodic_py(
    transactions: Vec<Vec<String>>,
    timestamps: Vec<u64>,
    min_support: &str,
    max_period: &str,
    max_length: Option<usize>,
) -> PyResult<Vec<(Vec<String>, u64, u64)>> {
    if transactions.len() != timestamps.len() {
        return Err(PyValueError::new_err(
            "transactions and timestamps must have the same length",
        ));
    }
    let database = transactions
        .into_iter()
        .zip(timestamps)
        .map(|(items, timestamp)| {
            Transaction::new(timestamp, items.into_iter().map(Occurrence::certain).collect())
        })
        .collect::<TransactionDatabase>();
    let config = MinerConfig::periodic(
        parse_threshold(min_support)?,
        parse_threshold(max_period)?,
    );
    let patterns = mine_with(&database, config, max_length)?;
    Ok(patterns
        .into_iter()
        .filter_map(|pattern| match pattern.stats {
            PatternStats::Periodic { support, period } => Some((pattern.items, support, period)),
            _ => None,
        })
        .collect())
}

#[pymodule]
fn itemset_growth(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(fp_growth_py, m)?)?;
    m.add_function(wrap_pyfunction!(mine_py, m)?)?;
    m.add_function(wrap_pyfunction!(mine_periodic_py, m)?)?;
    Ok(())
}
