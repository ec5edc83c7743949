//! Client bindings for a block-storage volume REST API
//!
//! Every manager operation is one HTTP round trip against a versioned
//! endpoint. Responses are unwrapped from their JSON envelope into
//! [`Resource`]-backed types.
//!
//! # Example
//!
//! ```ignore
//! use volctl::{ApiClient, ClientConfig, VolumeCreate, VolumeManager};
//!
//! async fn example() -> volctl::Result<()> {
//!     let config = ClientConfig::new("http://cinder:8776/v1/tenant").with_auth_token("token");
//!     let manager = VolumeManager::new(ApiClient::new(&config)?);
//!     let volume = manager.create(&VolumeCreate::new(10).display_name("data")).await?;
//!     volume.attach("instance-uuid", "/dev/vdb").await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod hooks;
pub mod resource;
pub mod volumes;

pub use api::client::ApiClient;
pub use api::http::ApiResponse;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use hooks::{ActionBodyHook, HookPoint, Hooks};
pub use resource::{get_id, Resource, ResourceRef};
pub use volumes::{Volume, VolumeAttachment, VolumeCreate, VolumeManager};
