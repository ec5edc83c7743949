use crate::resource::{Resource, ResourceRef};
use std::fmt;
use std::ops::Deref;

pub const VOLUME_ATTACHMENTS: &str = "os-volume_attachments";

/// A volume attached to a server, as seen from the server's side
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeAttachment(Resource);

impl VolumeAttachment {
    pub(crate) fn new(resource: Resource) -> Self {
        Self(resource)
    }

    pub fn volume_id(&self) -> Option<&str> {
        self.get_str("volumeId")
    }

    pub fn server_id(&self) -> Option<&str> {
        self.get_str("serverId")
    }

    pub fn device(&self) -> Option<&str> {
        self.get_str("device")
    }

    pub fn into_resource(self) -> Resource {
        self.0
    }
}

impl Deref for VolumeAttachment {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.0
    }
}

impl<'a> From<&'a VolumeAttachment> for ResourceRef<'a> {
    fn from(attachment: &'a VolumeAttachment) -> Self {
        ResourceRef::Resource(&attachment.0)
    }
}

impl fmt::Display for VolumeAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<VolumeAttachment: {}>", self.id())
    }
}
