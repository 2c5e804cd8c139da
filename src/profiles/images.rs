//! Uploaded image storage
//!
//! Images are kept in memory under a generated filename. That filename is
//! what profiles store as their image reference.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use chrono::Utc;
use image::ImageFormat;
use tokio::sync::RwLock;

/// An uploaded image and its MIME type.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub data: Bytes,
    pub content_type: &'static str,
}

#[derive(Debug, Default)]
pub struct ImageStore {
    images: RwLock<HashMap<String, StoredImage>>,
    counter: AtomicU64,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` and returns its assigned filename, or `None` when the
    /// bytes are not a recognizable image.
    pub async fn upload(&self, data: Bytes) -> Option<String> {
        let format = image::guess_format(&data).ok()?;
        let extension = format.extensions_str().first().copied().unwrap_or("img");
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);
        let file_name = format!(
            "{}_{}.{}",
            Utc::now().timestamp_millis(),
            sequence,
            extension
        );

        let stored = StoredImage {
            data,
            content_type: content_type(format),
        };
        self.images.write().await.insert(file_name.clone(), stored);
        Some(file_name)
    }

    pub async fn get(&self, file_name: &str) -> Option<StoredImage> {
        self.images.read().await.get(file_name).cloned()
    }

    pub async fn delete(&self, file_name: &str) -> bool {
        self.images.write().await.remove(file_name).is_some()
    }
}

fn content_type(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        _ => "application/octet-stream",
    }
}
