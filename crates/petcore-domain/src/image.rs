//! Image references attached to pets and owners.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Points at an image, either persisted on the backend or freshly picked.
///
/// A persisted image carries a remote `url` and `image_id`. A picked image that
/// has not been uploaded yet only carries `local`, which never goes on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip)]
    pub local: Option<LocalImage>,
}

impl ImageRef {
    pub fn remote(image_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            image_id: Some(image_id.into()),
            url: Some(url.into()),
            local: None,
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            image_id: None,
            url: Some(url.into()),
            local: None,
        }
    }

    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            image_id: None,
            url: None,
            local: Some(LocalImage { path: path.into() }),
        }
    }

    /// True for a picked image that has no remote identity yet.
    pub fn is_pending_upload(&self) -> bool {
        self.local.is_some() && self.url.is_none() && self.image_id.is_none()
    }
}

/// A picked image still living on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImage {
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_image_is_not_serialized() {
        let image = ImageRef::local("/tmp/rex.jpg");
        assert!(image.is_pending_upload());
        assert_eq!(serde_json::to_string(&image).unwrap(), "{}");
    }

    #[test]
    fn remote_image_uses_camel_case_keys() {
        let image = ImageRef::remote("img-1", "https://cdn.example/rex.jpg");
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["imageId"], "img-1");
        assert!(!image.is_pending_upload());
    }
}
