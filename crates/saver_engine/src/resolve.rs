use std::collections::HashSet;

use ego_tree::NodeId;
use saver_core::{extract_sref, SrefCode, SrefError};
use thiserror::Error;

use crate::page::PageDom;

/// Fixed substring that marks a grid image URL.
pub const IMAGE_SRC_PATTERN: &str = "_640_N.webp";
/// An ancestor qualifies as group root once it holds strictly more than
/// this many matching images.
pub const GROUP_ROOT_MIN: usize = 4;
/// Number of images a fully loaded grid presents.
pub const FULL_GRID: usize = 8;

/// A cluster of related images sharing one style code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleGroup {
    pub sref: SrefCode,
    /// Distinct image URLs in first-seen document order.
    pub image_urls: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GroupError {
    #[error("could not find the style grid around the control; the page structure may have changed")]
    NoGroupRoot,
    #[error("style grid not fully loaded: expected {expected} images, found {found}")]
    NotFullyLoaded { expected: usize, found: usize },
    #[error("style code extraction failed: {0}")]
    Sref(#[from] SrefError),
}

/// Walks upward from the injected control to the nearest ancestor holding
/// a style image grid, then derives the style group from its images.
pub fn resolve_group(dom: &PageDom, control: NodeId) -> Result<StyleGroup, GroupError> {
    let mut current = dom.parent(control);
    let mut matches: Option<Vec<String>> = None;

    while let Some(id) = current {
        if id == dom.root() {
            break;
        }
        if let Some(el) = dom.element(id) {
            if el.name() == "body" {
                break;
            }
        }
        let srcs = dom.img_srcs(id, IMAGE_SRC_PATTERN);
        if srcs.len() > GROUP_ROOT_MIN {
            matches = Some(srcs);
            break;
        }
        current = dom.parent(id);
    }

    let matches = matches.ok_or(GroupError::NoGroupRoot)?;
    if matches.len() < FULL_GRID {
        return Err(GroupError::NotFullyLoaded {
            expected: FULL_GRID,
            found: matches.len(),
        });
    }

    let sref = extract_sref(matches.iter().map(String::as_str))?;

    let mut seen = HashSet::new();
    let image_urls = matches
        .into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect();

    Ok(StyleGroup { sref, image_urls })
}
