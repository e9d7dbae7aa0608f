//! Common test fixtures for summary scenarios.
//!
//! Available to unit tests and, behind the `test-utils` feature, to benchmarks and
//! downstream test suites.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::Dataset;

/// (model, mpg, cyl, am, gear, vs) for the 32 cars of the 1974 Motor Trend road tests.
const MTCARS: [(&str, f64, i64, i64, i64, i64); 32] = [
    ("Mazda RX4", 21.0, 6, 1, 4, 0),
    ("Mazda RX4 Wag", 21.0, 6, 1, 4, 0),
    ("Datsun 710", 22.8, 4, 1, 4, 1),
    ("Hornet 4 Drive", 21.4, 6, 0, 3, 1),
    ("Hornet Sportabout", 18.7, 8, 0, 3, 0),
    ("Valiant", 18.1, 6, 0, 3, 1),
    ("Duster 360", 14.3, 8, 0, 3, 0),
    ("Merc 240D", 24.4, 4, 0, 4, 1),
    ("Merc 230", 22.8, 4, 0, 4, 1),
    ("Merc 280", 19.2, 6, 0, 4, 1),
    ("Merc 280C", 17.8, 6, 0, 4, 1),
    ("Merc 450SE", 16.4, 8, 0, 3, 0),
    ("Merc 450SL", 17.3, 8, 0, 3, 0),
    ("Merc 450SLC", 15.2, 8, 0, 3, 0),
    ("Cadillac Fleetwood", 10.4, 8, 0, 3, 0),
    ("Lincoln Continental", 10.4, 8, 0, 3, 0),
    ("Chrysler Imperial", 14.7, 8, 0, 3, 0),
    ("Fiat 128", 32.4, 4, 1, 4, 1),
    ("Honda Civic", 30.4, 4, 1, 4, 1),
    ("Toyota Corolla", 33.9, 4, 1, 4, 1),
    ("Toyota Corona", 21.5, 4, 0, 3, 1),
    ("Dodge Challenger", 15.5, 8, 0, 3, 0),
    ("AMC Javelin", 15.2, 8, 0, 3, 0),
    ("Camaro Z28", 13.3, 8, 0, 3, 0),
    ("Pontiac Firebird", 19.2, 8, 0, 3, 0),
    ("Fiat X1-9", 27.3, 4, 1, 4, 1),
    ("Porsche 914-2", 26.0, 4, 1, 5, 0),
    ("Lotus Europa", 30.4, 4, 1, 5, 1),
    ("Ford Pantera L", 15.8, 8, 1, 5, 0),
    ("Ferrari Dino", 19.7, 6, 1, 5, 0),
    ("Maserati Bora", 15.0, 8, 1, 5, 0),
    ("Volvo 142E", 21.4, 4, 1, 4, 1),
];

/// The mtcars dataset with columns `model` (Utf8), `mpg` (Float64) and the integer
/// codes `cyl`, `am`, `gear` and `vs` (Int64).
pub fn mtcars() -> Dataset {
    let schema = Arc::new(Schema::new(vec![
        Field::new("model", DataType::Utf8, false),
        Field::new("mpg", DataType::Float64, false),
        Field::new("cyl", DataType::Int64, false),
        Field::new("am", DataType::Int64, false),
        Field::new("gear", DataType::Int64, false),
        Field::new("vs", DataType::Int64, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(MTCARS.iter().map(|car| car.0))),
        Arc::new(Float64Array::from_iter_values(MTCARS.iter().map(|car| car.1))),
        Arc::new(Int64Array::from_iter_values(MTCARS.iter().map(|car| car.2))),
        Arc::new(Int64Array::from_iter_values(MTCARS.iter().map(|car| car.3))),
        Arc::new(Int64Array::from_iter_values(MTCARS.iter().map(|car| car.4))),
        Arc::new(Int64Array::from_iter_values(MTCARS.iter().map(|car| car.5))),
    ];

    // Static data with a matching schema
    let batch = RecordBatch::try_new(schema, columns).expect("mtcars fixture is well-formed");
    Dataset::new(batch)
}

/// A deterministic synthetic dataset of `rows` rows for benchmarks.
///
/// Columns: `value` (Float64, every 50th value missing), `region` (Utf8, 8 labels),
/// `segment` (Int64, 5 codes) and `flag` (Int64, 0/1).
pub fn synthetic(rows: usize) -> Dataset {
    const REGIONS: [&str; 8] = [
        "north", "south", "east", "west", "central", "coastal", "mountain", "plains",
    ];

    let mut rng = StdRng::seed_from_u64(42);

    let mut values = Vec::with_capacity(rows);
    let mut regions = Vec::with_capacity(rows);
    let mut segments = Vec::with_capacity(rows);
    let mut flags = Vec::with_capacity(rows);
    for i in 0..rows {
        let value = rng.random_range(0.0..100.0);
        values.push(if i % 50 == 49 { None } else { Some(value) });
        regions.push(REGIONS[rng.random_range(0..REGIONS.len())]);
        segments.push(rng.random_range(0..5i64));
        flags.push(i64::from(rng.random_bool(0.5)));
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("value", DataType::Float64, true),
        Field::new("region", DataType::Utf8, false),
        Field::new("segment", DataType::Int64, false),
        Field::new("flag", DataType::Int64, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(values)),
        Arc::new(StringArray::from(regions)),
        Arc::new(Int64Array::from(segments)),
        Arc::new(Int64Array::from(flags)),
    ];

    let batch = RecordBatch::try_new(schema, columns).expect("synthetic fixture is well-formed");
    Dataset::new(batch)
}
