use futures_util::future::join_all;
use saver_core::ImageFormat;
use saver_logging::saver_warn;

use crate::archive::ArchiveEntry;
use crate::convert::{convert_blob, sniff_mime};
use crate::cover::parse_data_url;
use crate::fetch::Fetcher;
use crate::name::swap_extension;

/// Whether an item is a grid image (subject to format conversion) or the
/// composite cover (always stored as-is).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Image,
    Cover,
}

/// Where an item's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSource {
    Url(String),
    DataUrl(String),
}

/// One unit of work for the download queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItem {
    pub source: ItemSource,
    pub name: String,
    pub kind: ItemKind,
}

impl QueueItem {
    pub fn image(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            source: ItemSource::Url(url.into()),
            name: name.into(),
            kind: ItemKind::Image,
        }
    }

    pub fn cover(data_url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            source: ItemSource::DataUrl(data_url.into()),
            name: name.into(),
            kind: ItemKind::Cover,
        }
    }
}

/// Resolves every queue item concurrently and returns the archive entries
/// in queue order. A failed item is logged and dropped; the rest of the
/// queue still goes through.
pub async fn process_queue(
    fetcher: &dyn Fetcher,
    items: Vec<QueueItem>,
    format: ImageFormat,
) -> Vec<ArchiveEntry> {
    let work = items
        .into_iter()
        .map(|item| process_item(fetcher, item, format));
    join_all(work).await.into_iter().flatten().collect()
}

async fn process_item(
    fetcher: &dyn Fetcher,
    item: QueueItem,
    format: ImageFormat,
) -> Option<ArchiveEntry> {
    let name = item.name.clone();
    let (bytes, native_mime) = match item.source {
        ItemSource::Url(url) => match fetcher.fetch(&url).await {
            Ok(blob) => {
                let mime = blob.mime().map(|m| m.to_string());
                (blob.bytes, mime)
            }
            Err(err) => {
                saver_warn!("Skipping {name}: fetch of {url} failed: {err}");
                return None;
            }
        },
        ItemSource::DataUrl(data_url) => match parse_data_url(&data_url) {
            Ok((mime, bytes)) => (bytes, Some(mime)),
            Err(err) => {
                saver_warn!("Skipping {name}: inline payload unusable: {err}");
                return None;
            }
        },
    };

    if item.kind == ItemKind::Cover {
        return Some(ArchiveEntry { name, bytes });
    }

    let Some(target_mime) = format.mime() else {
        return Some(ArchiveEntry { name, bytes });
    };
    let native = native_mime.or_else(|| sniff_mime(&bytes).map(|m| m.to_string()));
    if native.as_deref() == Some(target_mime) {
        return Some(ArchiveEntry { name, bytes });
    }

    match convert_blob(&bytes, format) {
        Ok(converted) => {
            let ext = format.extension().unwrap_or("bin");
            Some(ArchiveEntry {
                name: swap_extension(&name, ext),
                bytes: converted,
            })
        }
        Err(err) => {
            saver_warn!("Skipping {name}: conversion failed: {err}");
            None
        }
    }
}
