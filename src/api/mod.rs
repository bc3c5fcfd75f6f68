//! Resource clients
//!
//! - `catalog` - Fetches the catalog document (HTTP or file)
//! - `artwork` - Probes poster/background image availability

pub mod artwork;
pub mod catalog;

pub use artwork::{Artwork, ArtworkProbe};
pub use catalog::{CatalogClient, CatalogError, CatalogSource};
