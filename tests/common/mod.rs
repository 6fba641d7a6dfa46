/// Test utilities: a builder for Timestream query result documents and a
/// block-level probe for emitted MDF files.
use byteorder::{LittleEndian, ReadBytesExt};
use serde_json::{json, Value};
use std::io::Cursor;

/// Builder for creating query result JSON documents
pub struct QueryResultBuilder {
    columns: Vec<String>,
    rows: Vec<Value>,
}

impl QueryResultBuilder {
    /// Create a builder with no columns
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Create a builder with the four standard columns:
    /// time, measure_name, measure_value::double, measure_value::bigint
    pub fn standard() -> Self {
        Self::new()
            .column("time")
            .column("measure_name")
            .column("measure_value::double")
            .column("measure_value::bigint")
    }

    /// Declare a column
    pub fn column(mut self, name: &str) -> Self {
        self.columns.push(name.to_string());
        self
    }

    /// Add a row; `Some(text)` becomes a `ScalarValue`, `None` becomes a
    /// `NullValue` slot
    pub fn row(mut self, cells: &[Option<&str>]) -> Self {
        let data: Vec<Value> = cells
            .iter()
            .map(|cell| match cell {
                Some(text) => json!({ "ScalarValue": text }),
                None => json!({ "NullValue": true }),
            })
            .collect();
        self.rows.push(json!({ "Data": data }));
        self
    }

    /// Add a standard-column row in one call
    pub fn sample(self, time: &str, name: &str, double: Option<&str>, bigint: Option<&str>) -> Self {
        self.row(&[Some(time), Some(name), double, bigint])
    }

    /// Add a row from raw JSON value slots
    pub fn raw_row(mut self, data: Vec<Value>) -> Self {
        self.rows.push(json!({ "Data": data }));
        self
    }

    /// Build the final JSON document
    pub fn build(self) -> String {
        let columns: Vec<Value> = self
            .columns
            .iter()
            .map(|name| json!({ "Name": name, "Type": { "ScalarType": "VARCHAR" } }))
            .collect();
        json!({ "ColumnInfo": columns, "Rows": self.rows }).to_string()
    }
}

impl Default for QueryResultBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// MDF block probe
// ---------------------------------------------------------------------------

pub fn read_u16_at(bytes: &[u8], offset: usize) -> u16 {
    Cursor::new(&bytes[offset..offset + 2])
        .read_u16::<LittleEndian>()
        .unwrap()
}

pub fn read_u64_at(bytes: &[u8], offset: usize) -> u64 {
    Cursor::new(&bytes[offset..offset + 8])
        .read_u64::<LittleEndian>()
        .unwrap()
}

pub fn read_f64_at(bytes: &[u8], offset: usize) -> f64 {
    Cursor::new(&bytes[offset..offset + 8])
        .read_f64::<LittleEndian>()
        .unwrap()
}

/// 4-byte block id at a block address, e.g. "##DG"
pub fn block_id(bytes: &[u8], offset: usize) -> &str {
    std::str::from_utf8(&bytes[offset..offset + 4]).unwrap()
}

/// Zero-terminated payload of a ##TX/##MD block
pub fn text_at(bytes: &[u8], offset: usize) -> String {
    assert!(matches!(block_id(bytes, offset), "##TX" | "##MD"));
    let length = read_u64_at(bytes, offset + 8) as usize;
    let payload = &bytes[offset + 24..offset + length];
    let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
    String::from_utf8(payload[..end].to_vec()).unwrap()
}

/// One decoded data group: channel name, master channel metadata, and the
/// (time, value) record stream
#[derive(Debug)]
pub struct ProbedGroup {
    pub channel_name: String,
    pub master_name: String,
    pub master_unit: String,
    pub cycle_count: u64,
    pub records: Vec<(f64, f64)>,
}

/// Walk the data group chain of an MDF 4 image, decoding every group
pub fn walk_data_groups(bytes: &[u8]) -> Vec<ProbedGroup> {
    assert_eq!(&bytes[0..8], b"MDF     ");
    assert_eq!(block_id(bytes, 64), "##HD");

    let mut groups = Vec::new();
    let mut dg = read_u64_at(bytes, 88) as usize; // hd_dg_first

    while dg != 0 {
        assert_eq!(block_id(bytes, dg), "##DG");
        let dg_next = read_u64_at(bytes, dg + 24) as usize;
        let cg = read_u64_at(bytes, dg + 32) as usize;
        let dt = read_u64_at(bytes, dg + 40) as usize;

        assert_eq!(block_id(bytes, cg), "##CG");
        let cn_time = read_u64_at(bytes, cg + 32) as usize; // cg_cn_first
        let cycle_count = read_u64_at(bytes, cg + 80);

        assert_eq!(block_id(bytes, cn_time), "##CN");
        let cn_value = read_u64_at(bytes, cn_time + 24) as usize; // cn_cn_next
        let master_name = text_at(bytes, read_u64_at(bytes, cn_time + 40) as usize);
        let master_unit = text_at(bytes, read_u64_at(bytes, cn_time + 72) as usize);

        assert_eq!(block_id(bytes, cn_value), "##CN");
        let channel_name = text_at(bytes, read_u64_at(bytes, cn_value + 40) as usize);

        assert_eq!(block_id(bytes, dt), "##DT");
        let mut records = Vec::new();
        for i in 0..cycle_count as usize {
            let record = dt + 24 + i * 16;
            records.push((read_f64_at(bytes, record), read_f64_at(bytes, record + 8)));
        }

        groups.push(ProbedGroup {
            channel_name,
            master_name,
            master_unit,
            cycle_count,
            records,
        });
        dg = dg_next;
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_emits_expected_shape() {
        let doc = QueryResultBuilder::standard()
            .sample("2024-01-01T00:00:00Z", "speed", Some("10.5"), None)
            .build();

        let parsed: Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(parsed["ColumnInfo"][0]["Name"], "time");
        assert_eq!(parsed["Rows"][0]["Data"][2]["ScalarValue"], "10.5");
        assert!(parsed["Rows"][0]["Data"][3].get("ScalarValue").is_none());
    }
}
