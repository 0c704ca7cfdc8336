mod payload;
mod request;

pub use payload::{SearchResult, Suggestion};
pub use request::{FilterSet, GeoPoint, ResultsRequest};
