//! LMS Client Layer
//!
//! This crate connects the fee engine to the LMS backend.
//!
//! # Architecture
//!
//! - **Config**: `LMS_`-prefixed environment settings
//! - **Session**: login token and role, persisted between runs
//! - **Client**: authorized JSON requests with status-to-error mapping
//! - **Adapters**: `EnrollmentPort` over REST
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_client::{ApiClient, ClientConfig, HttpEnrollmentAdapter, SessionStore};
//!
//! let config = ClientConfig::from_env()?;
//! let session = SessionStore::new(&config.session_path).load()?.into_shared();
//! let client = ApiClient::new(&config, session)?;
//! let port = HttpEnrollmentAdapter::new(client, config.fee_currency()?);
//! ```

pub mod config;
pub mod error;
pub mod session;
pub mod client;
pub mod adapters;

pub use config::ClientConfig;
pub use error::ClientError;
pub use session::{AuthSession, Session, SessionStore, SharedSession};
pub use client::{ApiClient, Credentials};
pub use adapters::HttpEnrollmentAdapter;
