//! Volumes and volume attachments
//!
//! - [`Volume`] - one volume, with convenience methods routed through its manager
//! - [`VolumeAttachment`] - a server-side view of an attached volume
//! - [`VolumeManager`] - create/get/list/delete, actions and server attachments

mod attachment;
mod manager;
mod volume;

pub use attachment::{VolumeAttachment, VOLUME_ATTACHMENTS};
pub use manager::VolumeManager;
pub use volume::{Volume, VolumeCreate, VOLUMES};
