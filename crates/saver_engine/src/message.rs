use saver_core::{SrefCode, StorageMethod};
use serde::{Deserialize, Serialize};

use crate::cover::CoverImage;

/// Action tag of the one message the staging broker accepts.
pub const DOWNLOAD_STYLE_ACTION: &str = "download_style";

/// Request forwarded from the page side to the staging broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadStyleRequest {
    pub action: String,
    pub sref: String,
    pub images: Vec<ImageEntry>,
    pub cover: CoverPayload,
    #[serde(rename = "storageMethod")]
    pub storage_method: StorageMethod,
}

impl DownloadStyleRequest {
    pub fn new(sref: &SrefCode, images: Vec<ImageEntry>, cover: &CoverImage) -> Self {
        Self {
            action: DOWNLOAD_STYLE_ACTION.to_string(),
            sref: sref.as_str().to_string(),
            images,
            cover: CoverPayload {
                data_url: cover.data_url(),
                name: cover.name.clone(),
            },
            storage_method: StorageMethod::Prompt,
        }
    }
}

/// One image to fetch, plus the archive entry name it should take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub url: String,
    pub name: String,
}

/// Cover image carried inline so the helper session needs no page state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverPayload {
    #[serde(rename = "dataUrl")]
    pub data_url: String,
    pub name: String,
}

/// Broker answer sent back to the page side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}
