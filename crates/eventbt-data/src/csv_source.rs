//! CSV data source.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use eventbt_core::error::DataError;
use eventbt_core::types::Bar;

/// CSV record format. Yahoo-style headers and lowercase variants are accepted.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(
        alias = "Date",
        alias = "datetime",
        alias = "Datetime",
        alias = "timestamp",
        alias = "Timestamp"
    )]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Adj Close", alias = "adj close", alias = "AdjClose", default)]
    adj_close: Option<f64>,
    #[serde(alias = "Volume", default)]
    volume: f64,
}

/// CSV data source for historical bars.
pub struct CsvDataSource {
    path: PathBuf,
}

impl CsvDataSource {
    /// Create a new CSV data source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NoDataAvailable(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Load all bars from the CSV file, sorted by timestamp.
    pub fn load_all(&self) -> Result<Vec<Bar>, DataError> {
        let file = std::fs::File::open(&self.path)
            .map_err(|e| DataError::ParseError(format!("{}: {}", self.path.display(), e)))?;
        Self::parse(file)
    }

    /// Parse bars from any reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<Bar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut bars = Vec::new();

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;

            let timestamp = parse_timestamp(&record.date)?;
            let bar = Bar::new(
                timestamp,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            );
            bars.push(match record.adj_close {
                Some(adj_close) => bar.with_adj_close(adj_close),
                None => bar,
            });
        }

        // Stable sort keeps duplicate timestamps in file order
        bars.sort_by_key(|b| b.timestamp);

        Ok(bars)
    }
}

/// Load `<dir>/<SYMBOL>.csv` (or a lowercase / `_daily` variant) for every
/// symbol, preserving the symbol order.
pub fn load_csv_dir(dir: &Path, symbols: &[String]) -> Result<Vec<(String, Vec<Bar>)>, DataError> {
    let mut data = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        let lower = symbol.to_lowercase();
        let candidates = [
            dir.join(format!("{}.csv", symbol)),
            dir.join(format!("{}.csv", lower)),
            dir.join(format!("{}_daily.csv", symbol)),
            dir.join(format!("{}_daily.csv", lower)),
        ];

        let path = candidates
            .iter()
            .find(|p| p.exists())
            .ok_or_else(|| DataError::UnknownInstrument(symbol.clone()))?;

        debug!(symbol = %symbol, path = %path.display(), "Loading CSV");
        let bars = CsvDataSource::new(path)?.load_all()?;
        info!(symbol = %symbol, bars = bars.len(), "Loaded bars");
        data.push((symbol.clone(), bars));
    }

    Ok(data)
}

/// Parse various timestamp formats into Unix milliseconds.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }

    if let Ok(ts) = date_str.parse::<i64>() {
        // Assume milliseconds if > 10 digits
        let millis = if ts > 10_000_000_000 {
            Some(ts)
        } else {
            ts.checked_mul(1000)
        };
        return millis
            .filter(|ms| DateTime::from_timestamp_millis(*ms).is_some())
            .ok_or_else(|| DataError::ParseError(format!("Timestamp out of range: {}", date_str)));
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("1970-01-02").unwrap(), 86_400_000);
        assert!(parse_timestamp("2024-01-15 10:30:00").is_ok());
        assert!(parse_timestamp("2024/01/15").is_ok());
        assert_eq!(parse_timestamp("1705312800000").unwrap(), 1_705_312_800_000);
        assert_eq!(parse_timestamp("1705312800").unwrap(), 1_705_312_800_000);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_out_of_range_epoch_rejected() {
        assert!(matches!(
            parse_timestamp("9223372036854775807"),
            Err(DataError::ParseError(_))
        ));
        assert!(matches!(
            parse_timestamp("-9000000000000000"),
            Err(DataError::ParseError(_))
        ));

        let csv = "Date,Open,High,Low,Close,Volume\n9223372036854775807,1,1,1,1,10\n";
        assert!(CsvDataSource::parse(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_yahoo_csv() {
        let csv = "\
Date,Open,High,Low,Close,Adj Close,Volume
2015-05-04,100.0,102.0,99.0,101.0,95.0,1000
2015-05-01,98.0,100.5,97.0,100.0,94.0,2000
";
        let bars = CsvDataSource::parse(csv.as_bytes()).unwrap();

        assert_eq!(bars.len(), 2);
        // Sorted oldest first
        assert!(bars[0].timestamp < bars[1].timestamp);
        assert_eq!(bars[0].close, 100.0);
        assert_eq!(bars[0].adj_close, 94.0);
        assert_eq!(bars[1].volume, 1000.0);
    }

    #[test]
    fn test_parse_without_adj_close() {
        let csv = "\
date,open,high,low,close,volume
2020-01-01,1.0,2.0,0.5,1.5,10
";
        let bars = CsvDataSource::parse(csv.as_bytes()).unwrap();
        assert_eq!(bars[0].adj_close, 1.5);
    }

    #[test]
    fn test_parse_rejects_bad_numbers() {
        let csv = "\
Date,Open,High,Low,Close
2020-01-01,abc,2.0,0.5,1.5
";
        assert!(matches!(
            CsvDataSource::parse(csv.as_bytes()),
            Err(DataError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(CsvDataSource::new("/definitely/not/here.csv").is_err());
    }
}
