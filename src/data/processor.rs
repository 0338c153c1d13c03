//! Data Processor Module
//! Handles column cleaning and conversion of CSV frames into supplier records.

use crate::data::{Certification, CertificationSet, Supplier};
use polars::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("No usable supplier rows")]
    NoData,
}

/// Columns every supplier file must provide (after normalization).
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "name",
    "industry",
    "location",
    "carbon_footprint",
    "recycling_rate",
    "energy_efficiency",
    "water_usage",
    "waste_production",
];

/// Procurement columns defaulted to 0 when absent.
pub const OPTIONAL_COST_COLUMNS: [&str; 3] =
    ["lead_time_days", "onboarding_cost_usd", "switching_cost_usd"];

/// Suppliers extracted from a frame plus bookkeeping for the status line.
#[derive(Debug, Clone, Default)]
pub struct ProcessedRows {
    pub suppliers: Vec<Supplier>,
    pub skipped_rows: usize,
    pub filled_columns: Vec<String>,
}

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Normalize a raw header: trim, lower-case, spaces to underscores.
    pub fn normalize_column_name(raw: &str) -> String {
        let name = raw
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");

        match name.as_str() {
            "supplier_name" => "name".to_string(),
            _ => name,
        }
    }

    /// Map normalized column names to the names present in the frame.
    /// The first raw column wins when two headers normalize to the same name.
    pub fn column_map(df: &DataFrame) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for raw in df.get_column_names() {
            map.entry(Self::normalize_column_name(raw.as_str()))
                .or_insert_with(|| raw.to_string());
        }
        map
    }

    fn float_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>, ProcessorError> {
        let casted = df.column(column)?.cast(&DataType::Float64)?;
        let values = casted
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        Ok(values)
    }

    fn string_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>, ProcessorError> {
        let casted = df.column(column)?.cast(&DataType::String)?;
        let values = casted
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| {
                v.map(|s| s.trim().trim_matches('"').to_string())
                    .filter(|s| !s.is_empty())
            })
            .collect();
        Ok(values)
    }

    fn require<'a>(
        columns: &'a HashMap<String, String>,
        name: &str,
    ) -> Result<&'a str, ProcessorError> {
        columns
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ProcessorError::MissingColumn(name.to_string()))
    }

    /// Convert a loaded frame into supplier records.
    ///
    /// Rows with an empty name or a missing/non-numeric sustainability metric
    /// are skipped and counted.
    pub fn extract_suppliers(df: &DataFrame) -> Result<ProcessedRows, ProcessorError> {
        let columns = Self::column_map(df);
        let height = df.height();

        for required in REQUIRED_COLUMNS {
            Self::require(&columns, required)?;
        }

        let names = Self::string_values(df, Self::require(&columns, "name")?)?;
        let industries = Self::string_values(df, Self::require(&columns, "industry")?)?;
        let locations = Self::string_values(df, Self::require(&columns, "location")?)?;
        let carbon = Self::float_values(df, Self::require(&columns, "carbon_footprint")?)?;
        let recycling = Self::float_values(df, Self::require(&columns, "recycling_rate")?)?;
        let energy = Self::float_values(df, Self::require(&columns, "energy_efficiency")?)?;
        let water = Self::float_values(df, Self::require(&columns, "water_usage")?)?;
        let waste = Self::float_values(df, Self::require(&columns, "waste_production")?)?;

        let mut filled_columns = Vec::new();

        let ids = match columns.get("supplier_id") {
            Some(col) => Self::string_values(df, col)?,
            None => {
                filled_columns.push("supplier_id".to_string());
                vec![None; height]
            }
        };

        let mut optional_float = |name: &str| -> Result<Vec<Option<f64>>, ProcessorError> {
            match columns.get(name) {
                Some(col) => Self::float_values(df, col),
                None => {
                    filled_columns.push(name.to_string());
                    Ok(vec![Some(0.0); height])
                }
            }
        };

        let lead_time = optional_float(OPTIONAL_COST_COLUMNS[0])?;
        let onboarding = optional_float(OPTIONAL_COST_COLUMNS[1])?;
        let switching = optional_float(OPTIONAL_COST_COLUMNS[2])?;

        let mut cert_columns = Vec::with_capacity(Certification::ALL.len());
        for cert in Certification::ALL {
            cert_columns.push((cert, optional_float(cert.column())?));
        }

        let mut suppliers = Vec::with_capacity(height);
        let mut skipped_rows = 0;

        for i in 0..height {
            let (Some(name), Some(cf), Some(rr), Some(ee), Some(wu), Some(wp)) = (
                names[i].clone(),
                carbon[i],
                recycling[i],
                energy[i],
                water[i],
                waste[i],
            ) else {
                skipped_rows += 1;
                continue;
            };

            let certifications: CertificationSet = cert_columns
                .iter()
                .filter(|(_, values)| values[i].is_some_and(|v| (v - 1.0).abs() < f64::EPSILON))
                .map(|(cert, _)| *cert)
                .collect();

            suppliers.push(Supplier {
                supplier_id: ids[i].clone().unwrap_or_else(|| (i + 1).to_string()),
                name,
                industry: industries[i].clone().unwrap_or_else(|| "Unknown".to_string()),
                location: locations[i].clone().unwrap_or_else(|| "Unknown".to_string()),
                carbon_footprint: cf,
                recycling_rate: rr,
                energy_efficiency: ee,
                water_usage: wu,
                waste_production: wp,
                certifications,
                lead_time_days: lead_time[i].unwrap_or(0.0),
                onboarding_cost_usd: onboarding[i].unwrap_or(0.0),
                switching_cost_usd: switching[i].unwrap_or(0.0),
                sustainability_score: 0.0,
            });
        }

        if suppliers.is_empty() {
            return Err(ProcessorError::NoData);
        }

        Ok(ProcessedRows {
            suppliers,
            skipped_rows,
            filled_columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(columns: Vec<Column>) -> DataFrame {
        DataFrame::new(columns).unwrap()
    }

    fn minimal_columns() -> Vec<Column> {
        vec![
            Column::new("Supplier Name".into(), vec!["Acme", "Globex"]),
            Column::new(" Industry ".into(), vec!["Food", "Textiles"]),
            Column::new("Location".into(), vec!["Asia", "Europe"]),
            Column::new("carbon_footprint".into(), vec![500.0, 120.0]),
            Column::new("recycling_rate".into(), vec![40.0, 80.0]),
            Column::new("energy_efficiency".into(), vec![60.0, 90.0]),
            Column::new("Water Usage".into(), vec![2000.0, 800.0]),
            Column::new("waste_production".into(), vec![100.0, 50.0]),
        ]
    }

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(DataProcessor::normalize_column_name(" Supplier Name "), "name");
        assert_eq!(DataProcessor::normalize_column_name("Supplier ID"), "supplier_id");
        assert_eq!(DataProcessor::normalize_column_name("ISO_14001"), "iso_14001");
        assert_eq!(
            DataProcessor::normalize_column_name("Lead Time Days"),
            "lead_time_days"
        );
    }

    #[test]
    fn test_extract_fills_optional_columns() {
        let df = frame(minimal_columns());
        let rows = DataProcessor::extract_suppliers(&df).unwrap();

        assert_eq!(rows.suppliers.len(), 2);
        assert_eq!(rows.skipped_rows, 0);
        assert!(rows.filled_columns.contains(&"supplier_id".to_string()));
        assert!(rows.filled_columns.contains(&"iso_14001".to_string()));
        assert!(rows.filled_columns.contains(&"lead_time_days".to_string()));

        let acme = &rows.suppliers[0];
        assert_eq!(acme.name, "Acme");
        assert_eq!(acme.industry, "Food");
        assert_eq!(acme.supplier_id, "1");
        assert_eq!(acme.water_usage, 2000.0);
        assert!(acme.certifications.is_empty());
        assert_eq!(acme.lead_time_days, 0.0);
    }

    #[test]
    fn test_extract_reads_certifications() {
        let mut columns = minimal_columns();
        columns.push(Column::new("Fair_Trade".into(), vec![1i64, 0]));
        columns.push(Column::new("Organic".into(), vec![1i64, 1]));
        let df = frame(columns);

        let rows = DataProcessor::extract_suppliers(&df).unwrap();
        assert_eq!(rows.suppliers[0].certifications.len(), 2);
        assert!(rows.suppliers[1]
            .certifications
            .contains(Certification::Organic));
        assert!(!rows.suppliers[1]
            .certifications
            .contains(Certification::FairTrade));
    }

    #[test]
    fn test_extract_skips_rows_with_missing_metrics() {
        let mut columns = minimal_columns();
        columns[3] = Column::new("carbon_footprint".into(), vec![Some(500.0), None]);
        let df = frame(columns);

        let rows = DataProcessor::extract_suppliers(&df).unwrap();
        assert_eq!(rows.suppliers.len(), 1);
        assert_eq!(rows.skipped_rows, 1);
    }

    #[test]
    fn test_extract_missing_required_column() {
        let mut columns = minimal_columns();
        columns.remove(4);
        let df = frame(columns);

        match DataProcessor::extract_suppliers(&df) {
            Err(ProcessorError::MissingColumn(col)) => assert_eq!(col, "recycling_rate"),
            other => panic!("expected missing column, got {:?}", other.map(|r| r.suppliers)),
        }
    }
}
