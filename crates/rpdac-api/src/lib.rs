// rpdac-api: Async Rust client for the ReportPortal v1 REST API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ReportPortalClient;
pub use error::Error;
pub use transport::TransportConfig;
