pub mod error;
pub mod http;
pub mod manifest;
pub mod telemetry;
pub mod view_store;
