use std::path::PathBuf;
use std::sync::Arc;

use saver_core::ImageFormat;
use saver_logging::saver_info;
use thiserror::Error;

use crate::archive::{build_archive, deliver_archive, ArchiveError};
use crate::broker::{BrokerError, DownloadBroker, HelperHandoff};
use crate::cover::{compose_cover, CoverError};
use crate::fetch::Fetcher;
use crate::message::{DownloadStyleRequest, ImageEntry};
use crate::name::{archive_file_name, entry_name, last_path_segment};
use crate::pipeline::{process_queue, QueueItem};
use crate::resolve::StyleGroup;
use crate::staging::StagingStore;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Cover(#[from] CoverError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error(transparent)]
    Broker(#[from] BrokerError),
}

/// Drives a resolved style group down one of the two download paths:
/// immediate archive delivery, or staging for a confirmed helper session.
pub struct DownloadOrchestrator {
    fetcher: Arc<dyn Fetcher>,
    broker: DownloadBroker,
    downloads_dir: PathBuf,
}

impl DownloadOrchestrator {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn StagingStore>,
        downloads_dir: PathBuf,
    ) -> Self {
        Self {
            fetcher,
            broker: DownloadBroker::new(store),
            downloads_dir,
        }
    }

    /// Automatic path: compose the cover, fetch and convert every grid
    /// image, then deliver the finished archive straight away.
    pub async fn run_auto(
        &self,
        group: &StyleGroup,
        format: ImageFormat,
    ) -> Result<PathBuf, DownloadError> {
        let code = group.sref.as_str();
        let cover = compose_cover(self.fetcher.as_ref(), &group.sref, &group.image_urls).await?;

        let mut queue: Vec<QueueItem> = group
            .image_urls
            .iter()
            .map(|url| QueueItem::image(url.clone(), entry_name(code, last_path_segment(url))))
            .collect();
        queue.push(QueueItem::cover(cover.data_url(), cover.name.clone()));

        let entries = process_queue(self.fetcher.as_ref(), queue, format).await;
        let archive = build_archive(&entries)?;
        let path = deliver_archive(&self.downloads_dir, &archive_file_name(code), &archive)?;
        saver_info!(
            "Saved style {code}: {} entries -> {}",
            entries.len(),
            path.display()
        );
        Ok(path)
    }

    /// Prompted path: compose the cover, then stage the request for a
    /// helper session instead of downloading anything here.
    pub async fn run_prompted(&self, group: &StyleGroup) -> Result<HelperHandoff, DownloadError> {
        let code = group.sref.as_str();
        let cover = compose_cover(self.fetcher.as_ref(), &group.sref, &group.image_urls).await?;

        let images = group
            .image_urls
            .iter()
            .map(|url| ImageEntry {
                url: url.clone(),
                name: format!("{code}_{}", last_path_segment(url)),
            })
            .collect();
        let request = DownloadStyleRequest::new(&group.sref, images, &cover);
        Ok(self.broker.stage(&request)?)
    }
}
