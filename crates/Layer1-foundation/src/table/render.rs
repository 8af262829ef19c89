//! Tab-separated rendering of tables for tool output

use super::Table;
use crate::{Error, Result};

impl Table {
    /// Render as a TSV block: a header line, then one line per row.
    ///
    /// `Null` cells render as empty fields. Fields containing tabs, quotes
    /// or newlines are quoted.
    pub fn to_tsv(&self) -> Result<String> {
        if self.columns().is_empty() {
            return Ok(String::new());
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer
            .write_record(self.columns())
            .map_err(|e| Error::Internal(format!("Failed to render header: {}", e)))?;

        for row in self.rows() {
            writer
                .write_record(row.iter().map(|cell| cell.to_string()))
                .map_err(|e| Error::Internal(format!("Failed to render row: {}", e)))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Internal(format!("Failed to flush table: {}", e)))?;

        String::from_utf8(bytes).map_err(|e| Error::Internal(format!("Invalid UTF-8: {}", e)))
    }
}
