use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use saver_core::ImageFormat;
use thiserror::Error;

/// Quality used for every JPEG re-encode, including the cover.
pub const JPEG_QUALITY: u8 = 90;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("image encode failed: {0}")]
    Encode(String),
    #[error("original format is passthrough, nothing to convert to")]
    NoTarget,
}

/// Re-encodes an image blob to the requested format. JPEG targets are
/// flattened onto an opaque white background first so transparency does
/// not turn into artifacts.
pub fn convert_blob(bytes: &[u8], target: ImageFormat) -> Result<Vec<u8>, ConvertError> {
    let img = image::load_from_memory(bytes).map_err(|err| ConvertError::Decode(err.to_string()))?;

    let mut out = Vec::new();
    match target {
        ImageFormat::Jpg => {
            let flattened = flatten_onto_white(&img);
            let mut encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
            encoder
                .encode_image(&DynamicImage::ImageRgb8(flattened))
                .map_err(|err| ConvertError::Encode(err.to_string()))?;
        }
        ImageFormat::Png => {
            let rgba = img.to_rgba8();
            let encoder = PngEncoder::new(&mut out);
            encoder
                .write_image(
                    rgba.as_raw(),
                    rgba.width(),
                    rgba.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(|err| ConvertError::Encode(err.to_string()))?;
        }
        ImageFormat::Original => return Err(ConvertError::NoTarget),
    }
    Ok(out)
}

/// Best-effort MIME sniff from magic bytes, used when a blob carries no
/// content type.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        image::ImageFormat::Jpeg => Some("image/jpeg"),
        image::ImageFormat::Png => Some("image/png"),
        image::ImageFormat::WebP => Some("image/webp"),
        image::ImageFormat::Gif => Some("image/gif"),
        image::ImageFormat::Bmp => Some("image/bmp"),
        _ => None,
    }
}

fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    for (x, y, px) in rgba.enumerate_pixels() {
        let alpha = px[3] as u32;
        let inverse = 255 - alpha;
        let target = out.get_pixel_mut(x, y);
        for channel in 0..3 {
            target[channel] = ((px[channel] as u32 * alpha + 255 * inverse) / 255) as u8;
        }
    }
    out
}
