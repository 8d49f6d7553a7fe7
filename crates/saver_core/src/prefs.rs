use serde::{Deserialize, Serialize};

/// UI color scheme. Stored with the other preferences but never rendered
/// by this workspace; the settings surface lives outside the core flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Target format for archived images. `Original` passes blobs through
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Original,
    Jpg,
    Png,
}

impl ImageFormat {
    /// MIME type this format re-encodes to, or `None` for passthrough.
    pub fn mime(self) -> Option<&'static str> {
        match self {
            ImageFormat::Original => None,
            ImageFormat::Jpg => Some("image/jpeg"),
            ImageFormat::Png => Some("image/png"),
        }
    }

    /// Filename extension for converted entries.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            ImageFormat::Original => None,
            ImageFormat::Jpg => Some("jpg"),
            ImageFormat::Png => Some("png"),
        }
    }
}

/// How a resolved style group is turned into a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMethod {
    /// Archive and deliver immediately.
    #[default]
    Auto,
    /// Stage the request for a user-confirmed helper session.
    Prompt,
}

/// Explicit configuration read at the start of each save operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub format: ImageFormat,
    pub storage_method: StorageMethod,
}
