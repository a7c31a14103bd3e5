use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

use super::domain::Invoice;
use super::service::WorkflowRequest;

#[derive(Debug, thiserror::Error)]
pub enum InvoiceImportError {
    #[error("failed to read invoice export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid invoice CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invoice on line {line} rejected: {reason}")]
    Row { line: u64, reason: String },
}

/// Reads invoices from a CSV export with an
/// `amount,department,requires_manager_approval` header.
pub struct InvoiceCsvImporter;

impl InvoiceCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Invoice>, InvoiceImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Invoice>, InvoiceImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut invoices = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |position| position.line());
            let row: InvoiceRow = record.deserialize(Some(&headers))?;
            let request = WorkflowRequest {
                amount: row.amount,
                department: row.department,
                requires_manager_approval: row.requires_manager_approval,
            };
            let invoice = request
                .into_invoice()
                .map_err(|err| InvoiceImportError::Row {
                    line,
                    reason: err.to_string(),
                })?;
            invoices.push(invoice);
        }

        Ok(invoices)
    }
}

#[derive(Debug, Deserialize)]
struct InvoiceRow {
    amount: f64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    department: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    requires_manager_approval: bool,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "unrecognised manager approval flag '{other}'"
        ))),
    }
}
