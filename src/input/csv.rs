use crate::core::RoutePoint;
use crate::input::RouteError;
use chrono::{DateTime, Utc};

/// Load route samples from CSV data
///
/// Supports flexible column names:
/// - latitude, longitude, timestamp
/// - lat, lon, time
/// - lat, lng, ts
///
/// Extra columns are ignored. Timestamps must be RFC 3339 strings.
pub fn parse_csv(data: &[u8]) -> Result<Vec<RoutePoint>, RouteError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = rdr.headers()?.clone();
    let (lat_idx, lon_idx, time_idx) = detect_columns(&headers)?;

    let mut points = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        // header is line 1
        let line = row + 2;

        let latitude = parse_number(&record, lat_idx, line)?;
        let longitude = parse_number(&record, lon_idx, line)?;

        let raw_time = record.get(time_idx).unwrap_or_default();
        let timestamp = DateTime::parse_from_rfc3339(raw_time)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| RouteError::InvalidTimestamp {
                line,
                value: raw_time.to_string(),
            })?;

        points.push(RoutePoint::new(latitude, longitude, timestamp));
    }

    Ok(points)
}

fn parse_number(record: &csv::StringRecord, idx: usize, line: usize) -> Result<f64, RouteError> {
    let raw = record.get(idx).unwrap_or_default();
    raw.parse::<f64>().map_err(|_| RouteError::InvalidNumber {
        line,
        value: raw.to_string(),
    })
}

/// Detect column indices from CSV headers
fn detect_columns(headers: &csv::StringRecord) -> Result<(usize, usize, usize), RouteError> {
    let lat_idx = find_column(headers, &["latitude", "lat"])?;
    let lon_idx = find_column(headers, &["longitude", "lon", "lng", "long"])?;
    let time_idx = find_column(headers, &["timestamp", "time", "ts", "datetime"])?;

    Ok((lat_idx, lon_idx, time_idx))
}

/// Find a column by checking possible names
fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Result<usize, RouteError> {
    headers
        .iter()
        .position(|header| {
            let header_lower = header.to_lowercase();
            names.iter().any(|&name| header_lower == name)
        })
        .ok_or_else(|| RouteError::MissingColumn(names.join("|")))
}
