//! Interfaces shared between the `typeahead` coordinator and the data sources it
//! queries.
//!
//! A data source answers two kinds of lookups: cheap suggestions for very short
//! queries and full result sets for longer ones. Both receive a cancellation
//! token so that superseded requests can be abandoned early.

#[cfg(feature = "catalog")]
pub mod catalog;
pub mod error;
pub mod source;
pub mod types;

#[cfg(feature = "catalog")]
pub use catalog::{Catalog, CatalogEntry, CatalogOptions};
pub use error::SourceError;
pub use source::{DataSource, cancellable};
pub use types::{FilterSet, GeoPoint, ResultsRequest, SearchResult, Suggestion};
