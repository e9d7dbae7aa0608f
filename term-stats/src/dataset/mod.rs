//! Read-only tabular datasets backed by Arrow record batches.
//!
//! A [`Dataset`] is a rectangular table of named, homogeneously typed columns. Arrow
//! nulls are the missing values; for floating point columns `NaN` is treated as
//! missing as well. Columns are read through two views:
//!
//! - [`Dataset::numeric_column`] for response variables (any Arrow numeric type)
//! - [`Dataset::category_column`] for grouping and frequency variables (strings,
//!   dictionaries, booleans, integers and floats)
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Float64Array, Int64Array};
//! use term_stats::dataset::{Category, Dataset};
//!
//! let dataset = Dataset::try_from_columns(vec![
//!     ("mpg", Arc::new(Float64Array::from(vec![21.0, 22.8, 18.7])) as ArrayRef),
//!     ("cyl", Arc::new(Int64Array::from(vec![6, 4, 8])) as ArrayRef),
//! ])
//! .unwrap();
//!
//! assert_eq!(dataset.num_rows(), 3);
//! let cyl = dataset.category_column("cyl").unwrap();
//! assert_eq!(cyl[1], Some(Category::Integer(4)));
//! ```

pub mod partition;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::compute::{cast_with_options, CastOptions};
use arrow::datatypes::{DataType, SchemaRef};
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};

pub use partition::{partition, GroupKey, Partition, Partitioning};

/// An immutable rectangular dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    batch: RecordBatch,
}

impl Dataset {
    /// Wraps an Arrow record batch.
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    /// Builds a dataset from named columns of equal length.
    pub fn try_from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ArrayRef)>,
        S: AsRef<str>,
    {
        Ok(Self::new(RecordBatch::try_from_iter(columns)?))
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Returns the schema of the underlying batch.
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Returns the column names in schema order.
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect()
    }

    /// Returns the underlying record batch.
    pub fn record_batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| StatsError::invalid_column(name))
    }

    /// Reads a numeric column as `f64` values, `None` marking missing entries.
    ///
    /// Fails with [`StatsError::TypeMismatch`] for non-numeric columns.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let array = self.column(name)?;
        if !array.data_type().is_numeric() {
            return Err(type_mismatch(name, "numeric", array.data_type()));
        }

        let values = strict_cast(array, &DataType::Float64)?;
        let values = values
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| type_mismatch(name, "Float64", values.data_type()))?;

        Ok(values
            .iter()
            .map(|value| value.filter(|v| !v.is_nan()))
            .collect())
    }

    /// Reads a column as category values, `None` marking missing entries.
    ///
    /// Strings and dictionaries become [`Category::Label`], booleans
    /// [`Category::Flag`], integers [`Category::Integer`] and floats
    /// [`Category::Number`]. Other types fail with [`StatsError::TypeMismatch`].
    pub fn category_column(&self, name: &str) -> Result<Vec<Option<Category>>> {
        let array = self.column(name)?;

        match array.data_type() {
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View | DataType::Dictionary(..) => {
                let values = strict_cast(array, &DataType::Utf8)?;
                let values = values
                    .as_any()
                    .downcast_ref::<StringArray>()
                    .ok_or_else(|| type_mismatch(name, "Utf8", values.data_type()))?;
                Ok(values
                    .iter()
                    .map(|value| value.map(|s| Category::Label(s.to_string())))
                    .collect())
            }
            DataType::Boolean => {
                let values = array
                    .as_any()
                    .downcast_ref::<BooleanArray>()
                    .ok_or_else(|| type_mismatch(name, "Boolean", array.data_type()))?;
                Ok(values.iter().map(|value| value.map(Category::Flag)).collect())
            }
            data_type if data_type.is_integer() => {
                let values = strict_cast(array, &DataType::Int64)?;
                let values = values
                    .as_any()
                    .downcast_ref::<Int64Array>()
                    .ok_or_else(|| type_mismatch(name, "Int64", values.data_type()))?;
                Ok(values.iter().map(|value| value.map(Category::Integer)).collect())
            }
            data_type if data_type.is_floating() => Ok(self
                .numeric_column(name)?
                .into_iter()
                .map(|value| value.map(Category::from))
                .collect()),
            other => Err(type_mismatch(
                name,
                "categorical (string, dictionary, boolean, integer or float)",
                other,
            )),
        }
    }
}

impl From<RecordBatch> for Dataset {
    fn from(batch: RecordBatch) -> Self {
        Self::new(batch)
    }
}

/// Casts without silently turning overflowing values into nulls.
fn strict_cast(array: &ArrayRef, to_type: &DataType) -> Result<ArrayRef> {
    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    Ok(cast_with_options(array.as_ref(), to_type, &options)?)
}

fn type_mismatch(column: &str, expected: &str, found: &DataType) -> StatsError {
    StatsError::TypeMismatch {
        column: column.to_string(),
        expected: expected.to_string(),
        found: format!("{found:?}"),
    }
}

/// A single non-missing value of a categorical variable.
///
/// Values of one column always share a variant. Ordering is the natural ordering of
/// the variant (numeric ascending, labels lexicographic, `false < true`), which makes
/// partition and category order deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    /// A boolean value.
    Flag(bool),
    /// An integer value.
    Integer(i64),
    /// A floating point value (never `NaN`, never `-0.0` when read from a column).
    Number(f64),
    /// A text label.
    Label(String),
}

impl Category {
    fn rank(&self) -> u8 {
        match self {
            Category::Flag(_) => 0,
            Category::Integer(_) => 1,
            Category::Number(_) => 2,
            Category::Label(_) => 3,
        }
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Category {}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Category::Flag(a), Category::Flag(b)) => a.cmp(b),
            (Category::Integer(a), Category::Integer(b)) => a.cmp(b),
            (Category::Number(a), Category::Number(b)) => a.total_cmp(b),
            (Category::Label(a), Category::Label(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Category::Flag(v) => v.hash(state),
            Category::Integer(v) => v.hash(state),
            Category::Number(v) => v.to_bits().hash(state),
            Category::Label(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Flag(v) => write!(f, "{v}"),
            Category::Integer(v) => write!(f, "{v}"),
            Category::Number(v) => write!(f, "{v}"),
            Category::Label(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Category {
    fn from(value: bool) -> Self {
        Category::Flag(value)
    }
}

impl From<i64> for Category {
    fn from(value: i64) -> Self {
        Category::Integer(value)
    }
}

impl From<i32> for Category {
    fn from(value: i32) -> Self {
        Category::Integer(i64::from(value))
    }
}

impl From<f64> for Category {
    /// `-0.0` becomes `0.0` so that both zeros are one category.
    fn from(value: f64) -> Self {
        Category::Number(value + 0.0)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::Label(value.to_string())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::Label(value)
    }
}
