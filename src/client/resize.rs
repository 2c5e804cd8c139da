//! Downscale-on-cache policy for downloaded images
//!
//! Handles decode → resize → encode for images above the size threshold.

use std::io::Cursor;

use bytes::Bytes;
use image::imageops::FilterType;
use thiserror::Error;
use tracing::{debug, warn};

/// Images larger than this many bytes are resized before caching
pub const MAX_IMAGE_SIZE_BYTES: usize = 1_000_000;

/// Bounding box for resized images
pub const MAX_IMAGE_WIDTH: u32 = 800;
pub const MAX_IMAGE_HEIGHT: u32 = 600;

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image has zero width or height")]
    EmptyImage,
}

/// Returns the bytes to write to the image cache.
///
/// Images at or under [`MAX_IMAGE_SIZE_BYTES`] come back untouched. Larger
/// ones are always resized to the bounding box ratio; if that fails for any
/// reason the original bytes are returned.
pub fn prepare_for_cache(data: Bytes) -> Bytes {
    if data.len() <= MAX_IMAGE_SIZE_BYTES {
        return data;
    }

    match downscale(&data, MAX_IMAGE_WIDTH, MAX_IMAGE_HEIGHT) {
        Ok(resized) => {
            debug!(
                "Resized image from {} to {} bytes",
                data.len(),
                resized.len()
            );
            Bytes::from(resized)
        }
        Err(e) => {
            warn!("Error resizing image, using original: {}", e);
            data
        }
    }
}

/// Decodes `data`, scales it to fill `max_width` x `max_height` with its
/// aspect ratio kept, and encodes it back in its source format.
pub fn downscale(data: &[u8], max_width: u32, max_height: u32) -> Result<Vec<u8>, ResizeError> {
    let format = image::guess_format(data)?;
    let img = image::load_from_memory_with_format(data, format)?;

    if img.width() == 0 || img.height() == 0 {
        return Err(ResizeError::EmptyImage);
    }

    let (width, height) = fit_within(img.width(), img.height(), max_width, max_height);
    let resized = img.resize_exact(width, height, FilterType::Triangle);

    let mut output = Cursor::new(Vec::new());
    resized.write_to(&mut output, format)?;
    Ok(output.into_inner())
}

/// Scales `width` x `height` by `r = min(max_width / width, max_height / height)`
/// and floors both results, never going below 1.
///
/// The ratio is applied with integer arithmetic: whichever side binds is set
/// to its bound and the other is `floor(side * bound / binding_side)`. Images
/// smaller than the box are scaled up by the same rule.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    let (w, h) = (width as u64, height as u64);
    let (max_w, max_h) = (max_width as u64, max_height as u64);

    // max_w / w <= max_h / h  <=>  max_w * h <= max_h * w
    let (new_w, new_h) = if max_w * h <= max_h * w {
        (max_w, h * max_w / w)
    } else {
        (w * max_h / h, max_h)
    };

    (new_w.max(1) as u32, new_h.max(1) as u32)
}
