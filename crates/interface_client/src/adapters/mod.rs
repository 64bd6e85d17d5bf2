//! Adapters implementing the fee domain ports

pub mod http;

pub use http::HttpEnrollmentAdapter;
