//! HTTP client capability for clusterload
//!
//! Simulated users never talk to reqwest directly: they are handed something
//! implementing [`HttpClient`], which makes them testable with a stub and lets
//! the harness wrap the real client to collect statistics.

pub mod client;
pub mod config;
pub mod errors;
pub mod types;

pub use client::{HttpClient, HttpManager};
pub use config::HttpConfig;
pub use errors::HttpError;
pub use types::{HttpMethod, HttpResponse};
