//! Data module - CSV loading, cleaning and filtering

mod filter;
mod loader;
mod processor;
mod supplier;

pub use filter::SupplierFilter;
pub use loader::{DatasetBounds, SupplierDataset, SupplierLoader};
pub use processor::{DataProcessor, ProcessorError};
pub use supplier::{Certification, CertificationSet, Supplier};
