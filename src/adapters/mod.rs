// Adapters layer: concrete postal code sources (HTTP download, local archive).

pub mod file;
pub mod http;

pub use file::FilePostalCodeSource;
pub use http::HttpPostalCodeSource;
