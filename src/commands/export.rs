//! The CSV export command.

use crate::commands::Out;
use crate::{utils, App, Result};
use anyhow::Context;
use std::path::Path;

/// Downloads the transaction export and writes it to `output`.
///
/// The payload is passed through byte-for-byte; the row count in the message comes from
/// parsing a copy of it.
pub async fn export(app: &App, output: &Path) -> Result<Out<u64>> {
    let bytes = app
        .backend()
        .export_csv()
        .await
        .context("Unable to export transactions")?;

    let rows = count_rows(&bytes)?;
    utils::write(output, &bytes).await?;

    Ok(Out::new(
        format!("Exported {rows} transactions to {}", output.display()),
        rows,
    ))
}

/// Counts the data rows (excluding the header) in a CSV payload.
fn count_rows(bytes: &[u8]) -> Result<u64> {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut rows = 0_u64;
    for record in reader.records() {
        record.context("The export payload is not valid CSV")?;
        rows += 1;
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_export_writes_file() {
        let env = TestEnv::new().await;
        let app = env.app();
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("export.csv");

        let out = export(&app, &output).await.unwrap();

        assert_eq!(out.structure(), Some(&4));
        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.starts_with("Date,Description,Category,Amount,Type"));
    }

    #[test]
    fn test_count_rows() {
        let csv_data = b"A,B\n1,2\n3,4\n";
        assert_eq!(count_rows(csv_data).unwrap(), 2);
    }
}
