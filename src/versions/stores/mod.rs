//! Object store implementations

pub mod http;

pub use http::HttpObjectStore;
