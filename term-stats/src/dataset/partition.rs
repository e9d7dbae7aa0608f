//! Partitioning of a dataset by grouping-key columns.
//!
//! Partitions are ordered lexicographically by their key tuple, using the natural
//! ordering of each column's values (numeric ascending, labels sorted). Rows with a
//! missing value in any grouping column belong to no partition; they are reported in
//! [`Partitioning::dropped_rows`] rather than discarded silently.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument};

use super::{Category, Dataset};
use crate::error::Result;

/// The grouping-key values identifying one partition.
///
/// An empty key identifies the ungrouped (overall) partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GroupKey {
    entries: Vec<(String, Category)>,
}

impl GroupKey {
    /// Returns the key of the ungrouped partition.
    pub fn overall() -> Self {
        Self::default()
    }

    /// Creates a key from (column, value) pairs, outermost column first.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Category)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(column, value)| (column.into(), value))
                .collect(),
        }
    }

    /// Returns true for the ungrouped key.
    pub fn is_overall(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the (column, value) pairs.
    pub fn entries(&self) -> &[(String, Category)] {
        &self.entries
    }

    /// Returns the value of a grouping column.
    pub fn get(&self, column: &str) -> Option<&Category> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Returns the values in column order.
    pub fn values(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Returns the number of grouping columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true for the ungrouped key.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "overall");
        }
        let parts = self
            .entries
            .iter()
            .map(|(column, value)| format!("{column}={value}"))
            .collect::<Vec<_>>();
        write!(f, "{}", parts.join(", "))
    }
}

/// One partition: a group key and the indices of its rows in the source dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    key: GroupKey,
    rows: Vec<usize>,
}

impl Partition {
    /// Returns the partition's group key.
    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    /// Returns the row indices, ascending.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the partition holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The result of partitioning a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partitioning {
    partitions: Vec<Partition>,
    dropped_rows: Vec<usize>,
}

impl Partitioning {
    /// Returns the partitions in key order.
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Returns the rows excluded because a grouping value was missing.
    pub fn dropped_rows(&self) -> &[usize] {
        &self.dropped_rows
    }

    /// Returns the number of partitions.
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    /// Returns true if no partitions were produced.
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Iterates over the partitions in key order.
    pub fn iter(&self) -> std::slice::Iter<'_, Partition> {
        self.partitions.iter()
    }

    /// Consumes the partitioning, returning the partitions.
    pub fn into_partitions(self) -> Vec<Partition> {
        self.partitions
    }
}

impl<'a> IntoIterator for &'a Partitioning {
    type Item = &'a Partition;
    type IntoIter = std::slice::Iter<'a, Partition>;

    fn into_iter(self) -> Self::IntoIter {
        self.partitions.iter()
    }
}

/// Partitions `dataset` by the given grouping columns.
///
/// With no grouping columns the result is a single overall partition holding every
/// row. Fails with [`StatsError::InvalidColumn`](crate::error::StatsError::InvalidColumn)
/// if a grouping column does not exist, or
/// [`StatsError::TypeMismatch`](crate::error::StatsError::TypeMismatch) if it cannot be
/// read as categories.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use arrow::array::{ArrayRef, Int64Array};
/// use term_stats::dataset::{partition, Dataset};
///
/// let dataset = Dataset::try_from_columns(vec![(
///     "cyl",
///     Arc::new(Int64Array::from(vec![Some(8), Some(4), None, Some(8)])) as ArrayRef,
/// )])
/// .unwrap();
///
/// let partitioning = partition(&dataset, &["cyl"]).unwrap();
/// assert_eq!(partitioning.len(), 2);
/// assert_eq!(partitioning.partitions()[0].key().to_string(), "cyl=4");
/// assert_eq!(partitioning.partitions()[1].rows(), &[0, 3]);
/// assert_eq!(partitioning.dropped_rows(), &[2]);
/// ```
#[instrument(skip(dataset), fields(rows = dataset.num_rows()))]
pub fn partition<S>(dataset: &Dataset, grouping_columns: &[S]) -> Result<Partitioning>
where
    S: AsRef<str> + fmt::Debug,
{
    if grouping_columns.is_empty() {
        return Ok(Partitioning {
            partitions: vec![Partition {
                key: GroupKey::overall(),
                rows: (0..dataset.num_rows()).collect(),
            }],
            dropped_rows: Vec::new(),
        });
    }

    let names = grouping_columns
        .iter()
        .map(|column| column.as_ref().to_string())
        .collect::<Vec<_>>();
    let key_columns = names
        .iter()
        .map(|column| dataset.category_column(column))
        .collect::<Result<Vec<_>>>()?;

    let mut groups: BTreeMap<Vec<Category>, Vec<usize>> = BTreeMap::new();
    let mut dropped_rows = Vec::new();

    for row in 0..dataset.num_rows() {
        let key = key_columns
            .iter()
            .map(|values| values[row].clone())
            .collect::<Option<Vec<_>>>();
        match key {
            Some(key) => groups.entry(key).or_default().push(row),
            None => dropped_rows.push(row),
        }
    }

    if !dropped_rows.is_empty() {
        debug!(
            dropped = dropped_rows.len(),
            "Excluded rows with missing grouping values"
        );
    }

    let partitions = groups
        .into_iter()
        .map(|(values, rows)| Partition {
            key: GroupKey::new(names.iter().cloned().zip(values)),
            rows,
        })
        .collect::<Vec<_>>();

    debug!(partitions = partitions.len(), "Partitioned dataset");

    Ok(Partitioning {
        partitions,
        dropped_rows,
    })
}
