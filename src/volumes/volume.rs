//! Volume resource

use super::manager::VolumeManager;
use crate::api::http::ApiResponse;
use crate::error::Result;
use crate::resource::{Resource, ResourceRef};
use chrono::{DateTime, NaiveDateTime};
use serde_json::{json, Map, Value};
use std::fmt;
use std::ops::Deref;

pub const VOLUMES: &str = "volumes";

/// Attributes with a typed accessor below; everything else is in [`Volume::extra`]
const KNOWN_FIELDS: &[&str] = &[
    "size",
    "status",
    "display_name",
    "display_description",
    "volume_type",
    "snapshot_id",
    "availability_zone",
    "created_at",
    "attachments",
    "metadata",
];

/// A block storage volume.
///
/// Holds a borrow of the manager that fetched it so the convenience
/// methods can route back through it. A volume never changes after it is
/// decoded; use [`Volume::refresh`] to observe server-side changes.
#[derive(Debug, Clone)]
pub struct Volume<'m> {
    resource: Resource,
    manager: &'m VolumeManager,
}

impl<'m> Volume<'m> {
    pub(crate) fn new(resource: Resource, manager: &'m VolumeManager) -> Self {
        Self { resource, manager }
    }

    pub fn manager(&self) -> &'m VolumeManager {
        self.manager
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn into_resource(self) -> Resource {
        self.resource
    }

    /// Size in GB
    pub fn size(&self) -> Option<u64> {
        self.get_u64("size")
    }

    pub fn status(&self) -> Option<&str> {
        self.get_str("status")
    }

    pub fn display_name(&self) -> Option<&str> {
        self.get_str("display_name")
    }

    pub fn display_description(&self) -> Option<&str> {
        self.get_str("display_description")
    }

    pub fn volume_type(&self) -> Option<&str> {
        self.get_str("volume_type")
    }

    pub fn snapshot_id(&self) -> Option<&str> {
        self.get_str("snapshot_id")
    }

    pub fn availability_zone(&self) -> Option<&str> {
        self.get_str("availability_zone")
    }

    /// Creation time. The service reports naive UTC timestamps, with or
    /// without fractional seconds; RFC 3339 strings are accepted too.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        let raw = self.get_str("created_at")?;
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.naive_utc())
            })
    }

    /// Attachment records as reported by the server
    pub fn attachments(&self) -> &[Value] {
        self.get("attachments")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.get("metadata").and_then(|v| v.as_object())
    }

    /// Attributes without a typed accessor
    pub fn extra(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.resource
            .attributes()
            .iter()
            .filter(|(key, _)| !KNOWN_FIELDS.contains(&key.as_str()))
    }

    /// Delete this volume.
    pub async fn delete(&self) -> Result<()> {
        self.manager.delete(self).await
    }

    /// Set attachment metadata.
    pub async fn attach(&self, instance_uuid: &str, mountpoint: &str) -> Result<ApiResponse> {
        self.manager.attach(self, instance_uuid, mountpoint).await
    }

    /// Clear attachment metadata.
    pub async fn detach(&self) -> Result<ApiResponse> {
        self.manager.detach(self).await
    }

    pub async fn reserve(&self) -> Result<ApiResponse> {
        self.manager.reserve(self).await
    }

    pub async fn unreserve(&self) -> Result<ApiResponse> {
        self.manager.unreserve(self).await
    }

    /// Initialize a connection; `connector` describes the attaching host.
    pub async fn initialize_connection(&self, connector: &Value) -> Result<Value> {
        self.manager.initialize_connection(self, connector).await
    }

    pub async fn terminate_connection(&self, connector: &Value) -> Result<()> {
        self.manager.terminate_connection(self, connector).await
    }

    /// Fetch the current server-side state as a new volume
    pub async fn refresh(&self) -> Result<Volume<'m>> {
        self.manager.get(self.id()).await
    }
}

impl Deref for Volume<'_> {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.resource
    }
}

impl<'a> From<&'a Volume<'_>> for ResourceRef<'a> {
    fn from(volume: &'a Volume<'_>) -> Self {
        ResourceRef::Resource(&volume.resource)
    }
}

impl fmt::Display for Volume<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Volume: {}>", self.id())
    }
}

/// Parameters for creating a volume
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeCreate {
    /// Size in GB
    pub size: u64,
    pub snapshot_id: Option<String>,
    pub display_name: Option<String>,
    pub display_description: Option<String>,
    pub volume_type: Option<String>,
}

impl VolumeCreate {
    pub fn new(size: u64) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    pub fn snapshot_id(mut self, snapshot_id: impl Into<String>) -> Self {
        self.snapshot_id = Some(snapshot_id.into());
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn display_description(mut self, description: impl Into<String>) -> Self {
        self.display_description = Some(description.into());
        self
    }

    pub fn volume_type(mut self, volume_type: impl Into<String>) -> Self {
        self.volume_type = Some(volume_type.into());
        self
    }

    /// Request body; unset fields are sent as `null`
    pub fn body(&self) -> Value {
        json!({
            "volume": {
                "size": self.size,
                "snapshot_id": self.snapshot_id,
                "display_name": self.display_name,
                "display_description": self.display_description,
                "volume_type": self.volume_type,
            }
        })
    }
}
