pub mod movie;

pub use movie::{load_catalog, CatalogRecord, Movie};
