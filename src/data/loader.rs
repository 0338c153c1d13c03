//! CSV Data Loader Module
//! Handles size-bounded CSV loading into a typed supplier data set using Polars.

use crate::data::processor::ProcessedRows;
use crate::data::{DataProcessor, ProcessorError, Supplier};
use crate::scoring::{self, ScoringModel};
use crate::stats::ValueRange;
use polars::prelude::*;
use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Sample data set shipped with the application.
pub const DEFAULT_SUPPLIERS_CSV: &str = include_str!("../../data/default_suppliers.csv");

/// Default upload bound (200 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 200 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("File is {size} bytes, over the {limit} byte upload limit")]
    FileTooLarge { size: u64, limit: u64 },
    #[error(transparent)]
    Process(#[from] ProcessorError),
}

/// Observed ranges of the procurement columns, used for slider bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DatasetBounds {
    pub lead_time: Option<ValueRange>,
    pub onboarding_cost: Option<ValueRange>,
    pub switching_cost: Option<ValueRange>,
}

/// Suppliers loaded for the session.
#[derive(Debug, Clone, Default)]
pub struct SupplierDataset {
    /// File name or "sample data".
    pub source: String,
    pub suppliers: Vec<Supplier>,
    pub skipped_rows: usize,
    pub filled_columns: Vec<String>,
}

impl SupplierDataset {
    fn from_rows(source: String, rows: ProcessedRows) -> Self {
        Self {
            source,
            suppliers: rows.suppliers,
            skipped_rows: rows.skipped_rows,
            filled_columns: rows.filled_columns,
        }
    }

    pub fn len(&self) -> usize {
        self.suppliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }

    /// Sorted unique industries.
    pub fn industries(&self) -> Vec<String> {
        self.suppliers
            .iter()
            .map(|s| s.industry.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted unique locations.
    pub fn locations(&self) -> Vec<String> {
        self.suppliers
            .iter()
            .map(|s| s.location.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn bounds(&self) -> DatasetBounds {
        DatasetBounds {
            lead_time: ValueRange::of(self.suppliers.iter().map(|s| s.lead_time_days)),
            onboarding_cost: ValueRange::of(self.suppliers.iter().map(|s| s.onboarding_cost_usd)),
            switching_cost: ValueRange::of(self.suppliers.iter().map(|s| s.switching_cost_usd)),
        }
    }

    pub fn find(&self, supplier_id: &str) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.supplier_id == supplier_id)
    }

    /// Recompute every sustainability score with `model`.
    pub fn score(&mut self, model: &ScoringModel) {
        scoring::score_suppliers(&mut self.suppliers, model);
    }

    /// One-line description for the status bar.
    pub fn describe(&self) -> String {
        let mut text = format!("Loaded {} suppliers from {}", self.len(), self.source);
        if self.skipped_rows > 0 {
            text.push_str(&format!(", skipped {} incomplete rows", self.skipped_rows));
        }
        if !self.filled_columns.is_empty() {
            text.push_str(&format!(
                ", defaulted missing columns: {}",
                self.filled_columns.join(", ")
            ));
        }
        text
    }
}

/// Handles CSV file loading with Polars for high performance.
#[derive(Debug, Clone, Copy)]
pub struct SupplierLoader {
    max_upload_bytes: u64,
}

impl Default for SupplierLoader {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

impl SupplierLoader {
    pub fn new(max_upload_bytes: u64) -> Self {
        Self { max_upload_bytes }
    }

    /// Load a supplier CSV file using Polars.
    pub fn load_csv(&self, path: &Path) -> Result<SupplierDataset, LoaderError> {
        let size = std::fs::metadata(path)?.len();
        if size > self.max_upload_bytes {
            warn!(path = %path.display(), size, limit = self.max_upload_bytes, "CSV rejected");
            return Err(LoaderError::FileTooLarge {
                size,
                limit: self.max_upload_bytes,
            });
        }

        let path_str = path.to_string_lossy().to_string();
        debug!(path = %path_str, size, "Reading CSV");

        // Use lazy evaluation for memory efficiency, then collect
        let df = LazyCsvReader::new(&path_str)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or(path_str);

        self.build_dataset(source, &df)
    }

    /// Load CSV content already held in memory.
    pub fn load_bytes(&self, source: &str, bytes: Vec<u8>) -> Result<SupplierDataset, LoaderError> {
        let size = bytes.len() as u64;
        if size > self.max_upload_bytes {
            return Err(LoaderError::FileTooLarge {
                size,
                limit: self.max_upload_bytes,
            });
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        self.build_dataset(source.to_string(), &df)
    }

    /// Load the bundled sample suppliers.
    pub fn load_default(&self) -> Result<SupplierDataset, LoaderError> {
        self.load_bytes("sample data", DEFAULT_SUPPLIERS_CSV.as_bytes().to_vec())
    }

    fn build_dataset(&self, source: String, df: &DataFrame) -> Result<SupplierDataset, LoaderError> {
        let rows = DataProcessor::extract_suppliers(df)?;

        if !rows.filled_columns.is_empty() {
            warn!(
                source = %source,
                columns = ?rows.filled_columns,
                "Optional columns missing, filled with defaults"
            );
        }

        let dataset = SupplierDataset::from_rows(source, rows);
        info!(
            source = %dataset.source,
            suppliers = dataset.len(),
            skipped = dataset.skipped_rows,
            "Supplier data loaded"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_default_dataset() {
        let dataset = SupplierLoader::default().load_default().unwrap();

        assert_eq!(dataset.len(), 50);
        assert_eq!(dataset.skipped_rows, 0);
        assert!(dataset.filled_columns.is_empty());
        assert!(!dataset.describe().contains("defaulted"));
        assert_eq!(
            dataset.industries(),
            vec!["Chemicals", "Electronics", "Food", "Manufacturing", "Textiles"]
        );
        assert_eq!(dataset.locations().len(), 5);

        let first = dataset.find("1").unwrap();
        assert_eq!(first.name, "Supplier 1");
        assert_eq!(first.location, "Asia");
        assert!(first.certifications.is_empty());

        let bounds = dataset.bounds();
        let lead = bounds.lead_time.unwrap();
        assert_eq!(lead.min, 5.9);
        assert_eq!(lead.max, 49.6);
    }

    #[test]
    fn test_load_csv_file_with_messy_headers() {
        let file = write_csv(
            "Supplier ID, Supplier Name ,Industry,Location,Carbon Footprint,Recycling Rate,Energy Efficiency,Water Usage,Waste Production,B_Corp\n\
             7,Acme,Food,Asia,500,40,60,2000,100,1\n\
             8,Globex,Textiles,Europe,not-a-number,40,60,2000,100,0\n",
        );

        let dataset = SupplierLoader::default().load_csv(file.path()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.skipped_rows, 1);
        assert!(dataset.source.ends_with(".csv"));

        let acme = &dataset.suppliers[0];
        assert_eq!(acme.supplier_id, "7");
        assert_eq!(acme.name, "Acme");
        assert_eq!(acme.certifications.len(), 1);

        let status = dataset.describe();
        assert!(status.contains("skipped 1 incomplete rows"));
        assert!(status.contains(
            "defaulted missing columns: lead_time_days, onboarding_cost_usd, switching_cost_usd"
        ));
        assert!(!dataset.filled_columns.contains(&"b_corp".to_string()));
    }

    #[test]
    fn test_load_csv_rejects_large_files() {
        let file = write_csv(DEFAULT_SUPPLIERS_CSV);
        let result = SupplierLoader::new(64).load_csv(file.path());
        assert!(matches!(
            result,
            Err(LoaderError::FileTooLarge { limit: 64, .. })
        ));
    }

    #[test]
    fn test_load_bytes_missing_column() {
        let csv = "name,industry,location\nAcme,Food,Asia\n";
        let result = SupplierLoader::default().load_bytes("inline", csv.as_bytes().to_vec());
        assert!(matches!(
            result,
            Err(LoaderError::Process(ProcessorError::MissingColumn(_)))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = SupplierLoader::default().load_csv(Path::new("/nonexistent/suppliers.csv"));
        assert!(matches!(result, Err(LoaderError::Io(_))));
    }
}
