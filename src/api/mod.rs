//! Volume API transport
//!
//! - [`http`] - reqwest wrapper returning raw `(status, body)` pairs
//! - [`client`] - endpoint and credentials, path-to-URL mapping
//!
//! # Example
//!
//! ```ignore
//! use volctl::api::client::ApiClient;
//! use volctl::config::ClientConfig;
//!
//! async fn example() -> volctl::Result<()> {
//!     let client = ApiClient::new(&ClientConfig::new("http://cinder:8776/v1/tenant"))?;
//!     let response = client.get("/volumes").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
