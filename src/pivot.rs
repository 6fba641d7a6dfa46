use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::{Error, Result};
use crate::models::SampleTable;
use crate::resultset::{ColumnIndex, QueryResult, RequiredColumns, Row};

/// Parse a `time` scalar into nanoseconds since the Unix epoch.
///
/// Accepts RFC 3339 (`2024-01-01T00:00:00Z`), Timestream's native result
/// format (`2024-01-01 00:00:00.000000000`, naive UTC), and bare dates.
pub fn parse_instant(text: &str) -> Result<i64> {
    let instant: DateTime<Utc> = DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
        .or_else(|_| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
        })
        .map_err(|_| Error::InvalidTimestamp(text.to_string()))?;

    instant
        .timestamp_nanos_opt()
        .ok_or_else(|| Error::InvalidTimestamp(text.to_string()))
}

/// Resolve a row's measure value: `measure_value::double`, falling back to
/// `measure_value::bigint` only when the double slot is absent.
fn sample_value(
    row: &Row,
    columns: &RequiredColumns,
    time_text: &str,
    signal: &str,
) -> Result<f64> {
    let text = columns
        .value_double
        .and_then(|position| row.scalar_at(position))
        .or_else(|| {
            columns
                .value_bigint
                .and_then(|position| row.scalar_at(position))
        });

    match text {
        Some(text) => text.trim().parse::<f64>().map_err(|_| {
            Error::Other(format!(
                "Unparseable measure value {:?} for signal {:?}",
                text, signal
            ))
        }),
        None => Err(Error::MissingValue {
            time: time_text.to_string(),
            signal: signal.to_string(),
        }),
    }
}

/// Pivot a query result into a sample table.
///
/// Long-format rows `(time, measure_name, value)` become wide-format cells
/// `timestamp -> {signal: value}`, processed in input order so a duplicate
/// (timestamp, signal) pair resolves to the later row.
pub fn build_table(result: &QueryResult) -> Result<SampleTable> {
    let index = ColumnIndex::new(&result.column_info);
    let columns = RequiredColumns::from_index(&index)?;

    let mut table = SampleTable::new();
    for (i, row) in result.rows.iter().enumerate() {
        let time_text = row
            .scalar_at(columns.time)
            .ok_or_else(|| Error::InvalidFormat(format!("row {}: time is null", i)))?;
        let timestamp_ns = parse_instant(&time_text)?;

        let signal = row
            .scalar_at(columns.measure_name)
            .ok_or_else(|| Error::InvalidFormat(format!("row {}: measure_name is null", i)))?;

        let value = sample_value(row, &columns, &time_text, &signal)?;
        table.insert(timestamp_ns, &signal, value);
    }

    Ok(table)
}
