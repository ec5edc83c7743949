//! Volume manager
//!
//! Maps each operation onto one request against the volume API and
//! unwraps the response envelope. No status inspection happens here:
//! non-2xx answers already failed in the transport.

use super::attachment::{VolumeAttachment, VOLUME_ATTACHMENTS};
use super::volume::{Volume, VolumeCreate, VOLUMES};
use crate::api::client::{segment, ApiClient};
use crate::api::http::ApiResponse;
use crate::error::{Error, Result};
use crate::hooks::{ActionBodyHook, HookPoint, Hooks};
use crate::resource::{get_id, Resource, ResourceRef};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Manage [`Volume`] resources
#[derive(Debug, Clone)]
pub struct VolumeManager {
    client: ApiClient,
    hooks: Hooks,
}

impl VolumeManager {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            hooks: Hooks::new(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn register_hook(&mut self, point: HookPoint, hook: Arc<dyn ActionBodyHook>) {
        self.hooks.register(point, hook);
    }

    pub fn with_hook(mut self, point: HookPoint, hook: Arc<dyn ActionBodyHook>) -> Self {
        self.register_hook(point, hook);
        self
    }

    fn volume(&self, value: Value) -> Result<Volume<'_>> {
        Ok(Volume::new(Resource::from_value(VOLUMES, value)?, self))
    }

    fn volumes(&self, value: Value) -> Result<Vec<Volume<'_>>> {
        Ok(Resource::list_from_value(VOLUMES, value, "volumes")?
            .into_iter()
            .map(|resource| Volume::new(resource, self))
            .collect())
    }

    /// Create a volume.
    pub async fn create(&self, request: &VolumeCreate) -> Result<Volume<'_>> {
        let response = self.client.post("/volumes", &request.body()).await?;
        self.volume(response.unwrap_key("volume")?)
    }

    pub async fn get(&self, volume_id: &str) -> Result<Volume<'_>> {
        let response = self
            .client
            .get(&format!("/volumes/{}", segment(volume_id)))
            .await?;
        self.volume(response.unwrap_key("volume")?)
    }

    /// List volumes, with full details unless `detailed` is false
    pub async fn list(&self, detailed: bool) -> Result<Vec<Volume<'_>>> {
        let path = if detailed { "/volumes/detail" } else { "/volumes" };
        let response = self.client.get(path).await?;
        self.volumes(response.unwrap_key("volumes")?)
    }

    /// Volumes whose attributes equal every `(key, value)` filter
    pub async fn findall(&self, filters: &[(&str, Value)]) -> Result<Vec<Volume<'_>>> {
        let mut volumes = self.list(true).await?;
        volumes.retain(|volume| {
            filters
                .iter()
                .all(|(key, expected)| volume.matches(key, expected))
        });
        Ok(volumes)
    }

    /// The single volume matching `filters`
    pub async fn find(&self, filters: &[(&str, Value)]) -> Result<Volume<'_>> {
        let mut matches = self.findall(filters).await?;
        match matches.len() {
            0 => Err(Error::NotFound {
                collection: VOLUMES,
            }),
            1 => Ok(matches.remove(0)),
            count => Err(Error::NoUniqueMatch {
                collection: VOLUMES,
                count,
            }),
        }
    }

    pub async fn delete<'a>(&self, volume: impl Into<ResourceRef<'a>>) -> Result<()> {
        let path = format!("/volumes/{}", segment(get_id(volume)));
        self.client.delete(&path).await?;
        Ok(())
    }

    /// Attach a volume to a server by volume ID
    pub async fn create_server_volume<'a>(
        &self,
        server_id: &str,
        volume: impl Into<ResourceRef<'a>>,
        device: &str,
    ) -> Result<VolumeAttachment> {
        let body = json!({
            "volumeAttachment": {
                "volumeId": get_id(volume),
                "device": device,
            }
        });
        let path = format!("/servers/{}/{}", segment(server_id), VOLUME_ATTACHMENTS);
        let response = self.client.post(&path, &body).await?;
        attachment(response.unwrap_key("volumeAttachment")?)
    }

    pub async fn get_server_volume<'a>(
        &self,
        server_id: &str,
        attachment_id: impl Into<ResourceRef<'a>>,
    ) -> Result<VolumeAttachment> {
        let path = format!(
            "/servers/{}/{}/{}",
            segment(server_id),
            VOLUME_ATTACHMENTS,
            segment(get_id(attachment_id))
        );
        let response = self.client.get(&path).await?;
        attachment(response.unwrap_key("volumeAttachment")?)
    }

    /// All volumes attached to a server
    pub async fn get_server_volumes(&self, server_id: &str) -> Result<Vec<VolumeAttachment>> {
        let path = format!("/servers/{}/{}", segment(server_id), VOLUME_ATTACHMENTS);
        let response = self.client.get(&path).await?;
        let items = response.unwrap_key("volumeAttachments")?;
        Ok(
            Resource::list_from_value(VOLUME_ATTACHMENTS, items, "volumeAttachments")?
                .into_iter()
                .map(VolumeAttachment::new)
                .collect(),
        )
    }

    /// Detach a volume from a server by attachment ID
    pub async fn delete_server_volume<'a>(
        &self,
        server_id: &str,
        attachment_id: impl Into<ResourceRef<'a>>,
    ) -> Result<()> {
        let path = format!(
            "/servers/{}/{}/{}",
            segment(server_id),
            VOLUME_ATTACHMENTS,
            segment(get_id(attachment_id))
        );
        self.client.delete(&path).await?;
        Ok(())
    }

    /// POST `{action: info}` to the volume's action endpoint
    async fn action<'a>(
        &self,
        action: &str,
        volume: impl Into<ResourceRef<'a>>,
        info: Option<Value>,
    ) -> Result<ApiResponse> {
        let mut body = Map::new();
        body.insert(action.to_string(), info.unwrap_or(Value::Null));
        self.hooks.run_modify_body_for_action(&mut body);

        let path = format!("/volumes/{}/action", segment(get_id(volume)));
        self.client.post(&path, &Value::Object(body)).await
    }

    /// Set attachment metadata.
    pub async fn attach<'a>(
        &self,
        volume: impl Into<ResourceRef<'a>>,
        instance_uuid: &str,
        mountpoint: &str,
    ) -> Result<ApiResponse> {
        let info = json!({
            "instance_uuid": instance_uuid,
            "mountpoint": mountpoint,
        });
        self.action("os-attach", volume, Some(info)).await
    }

    /// Clear attachment metadata.
    pub async fn detach<'a>(&self, volume: impl Into<ResourceRef<'a>>) -> Result<ApiResponse> {
        self.action("os-detach", volume, None).await
    }

    pub async fn reserve<'a>(&self, volume: impl Into<ResourceRef<'a>>) -> Result<ApiResponse> {
        self.action("os-reserve", volume, None).await
    }

    pub async fn unreserve<'a>(&self, volume: impl Into<ResourceRef<'a>>) -> Result<ApiResponse> {
        self.action("os-unreserve", volume, None).await
    }

    /// Returns only the `connection_info` object of the response
    pub async fn initialize_connection<'a>(
        &self,
        volume: impl Into<ResourceRef<'a>>,
        connector: &Value,
    ) -> Result<Value> {
        let info = json!({ "connector": connector });
        self.action("os-initialize_connection", volume, Some(info))
            .await?
            .unwrap_key("connection_info")
    }

    pub async fn terminate_connection<'a>(
        &self,
        volume: impl Into<ResourceRef<'a>>,
        connector: &Value,
    ) -> Result<()> {
        let info = json!({ "connector": connector });
        self.action("os-terminate_connection", volume, Some(info))
            .await?;
        Ok(())
    }
}

fn attachment(value: Value) -> Result<VolumeAttachment> {
    Ok(VolumeAttachment::new(Resource::from_value(
        VOLUME_ATTACHMENTS,
        value,
    )?))
}
