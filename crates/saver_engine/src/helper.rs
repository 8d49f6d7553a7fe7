use std::path::{Path, PathBuf};

use saver_core::ImageFormat;
use saver_logging::saver_info;
use thiserror::Error;

use crate::archive::{build_archive, deliver_archive, ArchiveError};
use crate::fetch::Fetcher;
use crate::message::DownloadStyleRequest;
use crate::name::sanitize;
use crate::pipeline::{process_queue, QueueItem};
use crate::staging::{poll_take, StagingError, StagingStore};

#[derive(Debug, Error)]
pub enum HelperError {
    #[error("helper page opened without a staging key")]
    MissingKey,
    #[error("staged request is unusable")]
    InvalidRequest,
    #[error(transparent)]
    Staging(#[from] StagingError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// The confirmation side of a prompted download: claims the staged request
/// identified by the helper page URL and, on confirmation, runs the
/// archive pipeline for it.
#[derive(Debug)]
pub struct HelperSession {
    request: DownloadStyleRequest,
    file_name: String,
}

impl HelperSession {
    /// Opens a session from a helper page URL, consuming the staged
    /// request it points at. The store is polled briefly in case the
    /// broker's write has not landed yet.
    pub async fn open(store: &dyn StagingStore, page_url: &str) -> Result<Self, HelperError> {
        let key = staging_key_from_url(page_url).ok_or(HelperError::MissingKey)?;
        let request = poll_take(store, &key).await?;
        if request.sref.is_empty() {
            return Err(HelperError::InvalidRequest);
        }
        let file_name = format!("sref_{}.zip", sanitize(&request.sref));
        saver_info!(
            "Helper session claimed key {key}: style {} with {} images",
            request.sref,
            request.images.len()
        );
        Ok(Self { request, file_name })
    }

    pub fn request(&self) -> &DownloadStyleRequest {
        &self.request
    }

    /// Name the delivered archive will carry.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Runs the download after the user confirms: fetches every staged
    /// image, appends the inline cover and delivers the archive.
    pub async fn confirm(
        &self,
        fetcher: &dyn Fetcher,
        format: ImageFormat,
        out_dir: &Path,
    ) -> Result<PathBuf, HelperError> {
        let mut queue: Vec<QueueItem> = self
            .request
            .images
            .iter()
            .map(|entry| QueueItem::image(entry.url.clone(), sanitize(&entry.name)))
            .collect();
        queue.push(QueueItem::cover(
            self.request.cover.data_url.clone(),
            sanitize(&self.request.cover.name),
        ));

        let entries = process_queue(fetcher, queue, format).await;
        let archive = build_archive(&entries)?;
        let path = deliver_archive(out_dir, &self.file_name, &archive)?;
        saver_info!(
            "Delivered {} ({} entries)",
            path.display(),
            entries.len()
        );
        Ok(path)
    }
}

/// Extracts the `id` query parameter from a helper page URL. Works on
/// relative URLs, so it does not go through a full URL parser.
fn staging_key_from_url(page_url: &str) -> Option<String> {
    let (_, query) = page_url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == "id")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
