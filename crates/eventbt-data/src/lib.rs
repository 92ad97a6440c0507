//! Bar feeds and data loading.

mod align;
mod csv_source;
mod feed;

pub use align::forward_fill;
pub use csv_source::{load_csv_dir, CsvDataSource};
pub use feed::{ExhaustionPolicy, HistoricBarFeed};
