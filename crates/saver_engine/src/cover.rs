use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use futures_util::future::join_all;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use saver_core::SrefCode;
use thiserror::Error;

use crate::convert::JPEG_QUALITY;
use crate::fetch::{FetchError, Fetcher};
use crate::name::cover_name;

pub const CELL_WIDTH: u32 = 640;
pub const CELL_HEIGHT: u32 = 960;
pub const GRID_COLS: u32 = 4;
pub const GRID_ROWS: u32 = 2;

/// Composite cover JPEG for one style group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl CoverImage {
    /// Wire representation carried inside a staged download request.
    pub fn data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", BASE64.encode(&self.bytes))
    }
}

#[derive(Debug, Error)]
pub enum CoverError {
    #[error("no images provided for cover")]
    NoImages,
    #[error("cover fetch failed for {url}: {source}")]
    Fetch { url: String, source: FetchError },
    #[error("cover decode failed for {url}: {message}")]
    Decode { url: String, message: String },
    #[error("cover encode failed: {0}")]
    Encode(String),
}

/// Re-fetches every grid image and composites up to eight of them into a
/// fixed 4x2 grid, producing one JPEG. Any fetch or decode failure fails
/// the whole cover; intermediate buffers drop on every path.
pub async fn compose_cover(
    fetcher: &dyn Fetcher,
    code: &SrefCode,
    urls: &[String],
) -> Result<CoverImage, CoverError> {
    if urls.is_empty() {
        return Err(CoverError::NoImages);
    }

    let loads = urls.iter().map(|url| async move {
        let blob = fetcher
            .fetch(url)
            .await
            .map_err(|source| CoverError::Fetch {
                url: url.clone(),
                source,
            })?;
        image::load_from_memory(&blob.bytes).map_err(|err| CoverError::Decode {
            url: url.clone(),
            message: err.to_string(),
        })
    });
    let images = join_all(loads)
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    let mut canvas = RgbImage::new(CELL_WIDTH * GRID_COLS, CELL_HEIGHT * GRID_ROWS);
    let cells = (GRID_COLS * GRID_ROWS) as usize;
    for (index, img) in images.iter().take(cells).enumerate() {
        let col = index as u32 % GRID_COLS;
        let row = index as u32 / GRID_COLS;
        let cell = image::imageops::resize(
            &img.to_rgb8(),
            CELL_WIDTH,
            CELL_HEIGHT,
            FilterType::Triangle,
        );
        image::imageops::overlay(
            &mut canvas,
            &cell,
            (col * CELL_WIDTH) as i64,
            (row * CELL_HEIGHT) as i64,
        );
    }

    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    encoder
        .encode_image(&DynamicImage::ImageRgb8(canvas))
        .map_err(|err| CoverError::Encode(err.to_string()))?;

    Ok(CoverImage {
        name: cover_name(code.as_str()),
        bytes,
    })
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("not a data url")]
    NotDataUrl,
    #[error("malformed data url")]
    Malformed,
    #[error("data url must be base64-encoded")]
    UnsupportedEncoding,
    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Splits a base64 data URL into its MIME type and payload bytes.
pub fn parse_data_url(input: &str) -> Result<(String, Vec<u8>), DataUrlError> {
    let rest = input.strip_prefix("data:").ok_or(DataUrlError::NotDataUrl)?;
    let (meta, payload) = rest.split_once(',').ok_or(DataUrlError::Malformed)?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or(DataUrlError::UnsupportedEncoding)?;
    let bytes = BASE64.decode(payload)?;
    Ok((mime.to_string(), bytes))
}
