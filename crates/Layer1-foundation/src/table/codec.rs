//! Table blob codec
//!
//! Tables are stored as UTF-8 JSON in split orientation:
//!
//! ```text
//! {"format":"table/v1","columns":["Name","HR"],"data":[["Test Player",1]]}
//! ```
//!
//! The explicit column list keeps column order (and the columns of a
//! zero-row table); row-major `data` keeps row order and cell types.
//! Floats decode bit-for-bit: serde_json is built with `float_roundtrip`,
//! so a cache hit returns exactly the table the miss path produced.
//! Anything that does not parse back into a rectangular table is reported
//! as [`DecodeResult::Malformed`], which callers treat as a cache miss.

use super::{Cell, Table};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Format tag written into every blob
pub const TABLE_FORMAT: &str = "table/v1";

#[derive(Serialize)]
struct EncodedTable<'a> {
    format: &'a str,
    columns: &'a [String],
    data: &'a [Vec<Cell>],
}

#[derive(Deserialize)]
struct StoredTable {
    format: String,
    columns: Vec<String>,
    data: Vec<Vec<Cell>>,
}

/// Outcome of decoding a cached blob
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeResult {
    /// The blob held a valid table
    Table(Table),
    /// The blob is corrupt or in a foreign format
    Malformed(String),
}

impl DecodeResult {
    /// The decoded table, or `None` for a malformed blob
    pub fn into_table(self) -> Option<Table> {
        match self {
            DecodeResult::Table(table) => Some(table),
            DecodeResult::Malformed(_) => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, DecodeResult::Malformed(_))
    }
}

/// Serialize a table into a self-describing blob
pub fn encode(table: &Table) -> Result<Vec<u8>> {
    let encoded = EncodedTable {
        format: TABLE_FORMAT,
        columns: table.columns(),
        data: table.rows(),
    };
    Ok(serde_json::to_vec(&encoded)?)
}

/// Parse a blob produced by [`encode`]
pub fn decode(bytes: &[u8]) -> DecodeResult {
    let stored: StoredTable = match serde_json::from_slice(bytes) {
        Ok(stored) => stored,
        Err(e) => return DecodeResult::Malformed(format!("not a table blob: {}", e)),
    };

    if stored.format != TABLE_FORMAT {
        return DecodeResult::Malformed(format!("unsupported table format '{}'", stored.format));
    }

    match Table::from_rows(stored.columns, stored.data) {
        Ok(table) => DecodeResult::Table(table),
        Err(e) => DecodeResult::Malformed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn round_trip(table: &Table) -> Table {
        let blob = encode(table).expect("encode");
        match decode(&blob) {
            DecodeResult::Table(t) => t,
            DecodeResult::Malformed(reason) => panic!("malformed: {}", reason),
        }
    }

    #[test]
    fn test_round_trip_preserves_order_and_types() {
        let table = Table::from_rows(
            ["Name", "HR", "AVG", "Active", "Note"],
            vec![
                vec![
                    Cell::from("Test Player"),
                    Cell::from(1),
                    Cell::from(0.3),
                    Cell::from(true),
                    Cell::Null,
                ],
                vec![
                    Cell::from("Another"),
                    Cell::from(42),
                    Cell::from(1.0),
                    Cell::from(false),
                    Cell::from("7"),
                ],
            ],
        )
        .unwrap();

        let decoded = round_trip(&table);
        assert_eq!(decoded, table);
        // 1.0 stays a float and "7" stays text
        assert_eq!(decoded.cell(1, "AVG"), Some(&Cell::Float(1.0)));
        assert_eq!(decoded.cell(1, "Note"), Some(&Cell::Text("7".to_string())));
    }

    #[test]
    fn test_round_trip_zero_rows_keeps_columns() {
        let table = Table::new(["Date", "Tm", "Opp"]);
        let decoded = round_trip(&table);
        assert!(decoded.is_empty());
        assert_eq!(decoded.columns(), &["Date", "Tm", "Opp"]);
    }

    #[test]
    fn test_round_trip_fully_empty_table() {
        assert_eq!(round_trip(&Table::empty()), Table::empty());
    }

    #[test]
    fn test_round_trip_keeps_every_float_bit() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut rows = Vec::new();
        for _ in 0..20_000 {
            // exit-velocity range plus raw bit patterns
            let speed = rng.gen_range(0.0..120.0);
            let bits = f64::from_bits(rng.gen::<u64>());
            rows.push(vec![Cell::from(speed), Cell::from(bits)]);
        }
        let table = Table::from_rows(["launch_speed", "any"], rows).unwrap();

        let decoded = round_trip(&table);
        for (before, after) in table.rows().iter().zip(decoded.rows()) {
            for (a, b) in before.iter().zip(after) {
                match (a, b) {
                    (Cell::Float(x), Cell::Float(y)) => assert_eq!(x.to_bits(), y.to_bits()),
                    _ => assert_eq!(a, b),
                }
            }
        }
    }

    #[test]
    fn test_round_trip_mixed_cells() {
        const TEXT: &[&str] = &[
            "",
            "Acuña Jr., Ronald",
            "大谷翔平",
            "tab\there",
            "null",
            "true",
            "1.5",
            "\"quoted\"",
        ];

        let mut rng = StdRng::seed_from_u64(42);
        let columns = ["a", "b", "c", "d", "e", "f"];
        let mut rows = Vec::new();
        for _ in 0..2_000 {
            let row = (0..columns.len())
                .map(|_| match rng.gen_range(0..10) {
                    0..=3 => Cell::Null,
                    4 => Cell::from(rng.gen::<bool>()),
                    5 => Cell::Int(rng.gen::<i64>()),
                    6 => Cell::Int([i64::MIN, i64::MAX, -1, 0][rng.gen_range(0..4)]),
                    7 => Cell::from(rng.gen_range(-1.0e12..1.0e12)),
                    8 => Cell::from(rng.gen_range(-5i64..5) as f64),
                    _ => Cell::from(TEXT[rng.gen_range(0..TEXT.len())]),
                })
                .collect();
            rows.push(row);
        }
        let table = Table::from_rows(columns, rows).unwrap();
        assert_eq!(round_trip(&table), table);

        let all_null = Table::from_rows(["x", "y"], vec![vec![Cell::Null, Cell::Null]; 5]).unwrap();
        assert_eq!(round_trip(&all_null), all_null);
    }

    #[test]
    fn test_round_trip_zero_columns_with_rows() {
        let table = Table::from_rows(Vec::<String>::new(), vec![Vec::new(); 3]).unwrap();
        let decoded = round_trip(&table);
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded, table);
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        assert!(decode(b"\x00\x01not json").is_malformed());
        assert!(decode(b"").is_malformed());
    }

    #[test]
    fn test_decode_foreign_format_is_malformed() {
        // pandas orient="split" output is close, but untagged
        let foreign = br#"{"columns":["A"],"index":[0],"data":[[1]]}"#;
        assert!(decode(foreign).is_malformed());

        let wrong_tag = br#"{"format":"table/v0","columns":["A"],"data":[[1]]}"#;
        assert!(decode(wrong_tag).is_malformed());
    }

    #[test]
    fn test_decode_ragged_rows_is_malformed() {
        let ragged = br#"{"format":"table/v1","columns":["A","B"],"data":[[1,2],[3]]}"#;
        let result = decode(ragged);
        assert!(result.is_malformed());
        assert!(result.into_table().is_none());
    }
}
