//! Vehicle table: typed records, file loading and the filter predicate.
//!
//! `loader` turns a `.csv`, `.json` or `.parquet` file into a
//! [`model::FleetDataset`] and refuses malformed input. `filter` narrows the
//! dataset to the rows matching a [`filter::FilterSelection`]; every chart is
//! computed from that view and nothing else.

pub mod filter;
pub mod loader;
pub mod model;
