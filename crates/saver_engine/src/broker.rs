use std::sync::Arc;

use saver_logging::{saver_debug, saver_info, saver_warn};
use thiserror::Error;

use crate::message::{DownloadStyleRequest, StageResponse, DOWNLOAD_STYLE_ACTION};
use crate::staging::{generate_staging_key, StagingError, StagingStore};

/// Relative URL of the helper page opened to confirm a staged download.
pub const HELPER_PAGE: &str = "download.html";

/// Result of staging a request: the storage key plus the helper page URL
/// that will consume it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperHandoff {
    pub key: String,
    pub helper_url: String,
}

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("unsupported action {0:?}")]
    UnsupportedAction(String),
    #[error(transparent)]
    Staging(#[from] StagingError),
}

/// Accepts download requests, parks them in the staging store under a
/// one-time key and hands back the helper page URL carrying that key.
pub struct DownloadBroker {
    store: Arc<dyn StagingStore>,
}

impl DownloadBroker {
    pub fn new(store: Arc<dyn StagingStore>) -> Self {
        Self { store }
    }

    pub fn stage(&self, request: &DownloadStyleRequest) -> Result<HelperHandoff, BrokerError> {
        if request.action != DOWNLOAD_STYLE_ACTION {
            return Err(BrokerError::UnsupportedAction(request.action.clone()));
        }
        let key = generate_staging_key();
        self.store.put(&key, request)?;
        let helper_url = format!("{HELPER_PAGE}?id={key}");
        saver_info!(
            "Staged style {} ({} images) under key {key}",
            request.sref,
            request.images.len()
        );
        Ok(HelperHandoff { key, helper_url })
    }

    /// Wire-level entry point: parses a raw JSON message, stages it and
    /// reports back in the response shape the page side expects.
    pub fn handle_message(&self, raw: &str) -> (StageResponse, Option<HelperHandoff>) {
        let request: DownloadStyleRequest = match serde_json::from_str(raw) {
            Ok(request) => request,
            Err(err) => {
                saver_warn!("Rejecting malformed download message: {err}");
                return (StageResponse::failure(err.to_string()), None);
            }
        };
        match self.stage(&request) {
            Ok(handoff) => {
                saver_debug!("Helper handoff: {}", handoff.helper_url);
                (StageResponse::ok(), Some(handoff))
            }
            Err(err) => {
                saver_warn!("Staging failed: {err}");
                (StageResponse::failure(err.to_string()), None)
            }
        }
    }
}
