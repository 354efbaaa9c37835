// Service exports
pub mod audit;
pub mod catalog;
pub mod estimator;
pub mod outreach;

pub use audit::{AuditError, AuditLog, CsvAuditLog, PostgresAuditLog};
pub use catalog::{load_catalog, parse_catalog, CatalogError, CatalogSnapshot, CatalogStore};
pub use estimator::{EstimatorError, LinearEstimator, QuantityEstimator, RemoteEstimator};
