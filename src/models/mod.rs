// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{columns, CityMatchMode, FilterSpec, MatchKeys, Place, PlaceRecord, Row};
pub use requests::QueryRequest;
pub use responses::{ErrorResponse, HealthResponse, QueryResponse};
