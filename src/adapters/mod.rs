// Adapters layer: concrete post sources.

pub mod fixture;
pub mod http;

pub use fixture::FixturePostSource;
pub use http::{HttpPostSource, DEFAULT_BASE_URL};
