//! Thumbnail extraction for jump list items
//!
//! Turns a destination's native image into PNG bytes:
//!
//! 1. The shell backend captures a [`DeviceBitmap`] (32-bpp BGRA rows)
//! 2. File reference bitmaps arrive in device order (bottom-up) and are flipped
//! 3. The bitmap is encoded through the process-wide [`EncoderRegistry`]
//!
//! Every step reports failure as `None`. A missing thumbnail never fails the
//! item it belongs to.

pub mod encoder;

#[cfg(windows)]
pub(crate) mod gdi;

pub use encoder::{EncoderInfo, EncoderRegistry, ImageFormat, encode_bitmap, encode_png, select_encoder};

use crate::shell::{FileReference, ShortcutReference};
use tracing::debug;

/// Logical thumbnail size used when none is configured
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 32;

/// Smallest thumbnail size accepted from configuration
pub const MIN_THUMBNAIL_SIZE: u32 = 16;

/// Largest thumbnail size accepted from configuration
pub const MAX_THUMBNAIL_SIZE: u32 = 256;

/// Bytes per pixel of a [`DeviceBitmap`]
pub const BYTES_PER_PIXEL: usize = 4;

/// Raw 32-bpp BGRA pixel rows captured from the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceBitmap {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bytes per row (at least `width * 4`)
    pub stride: usize,
    /// Pixel rows, `stride * height` bytes
    pub bits: Vec<u8>,
    /// Format the imaging subsystem reports for the bitmap
    pub raw_format: ImageFormat,
}

impl DeviceBitmap {
    /// Wrap tightly packed BGRA rows
    ///
    /// Returns `None` if `bits` does not hold exactly `width * height` pixels.
    pub fn from_bgra(width: u32, height: u32, bits: Vec<u8>) -> Option<Self> {
        let stride = usize::try_from(width).ok()?.checked_mul(BYTES_PER_PIXEL)?;
        Self::with_stride(width, height, stride, bits)
    }

    /// Wrap BGRA rows with an explicit stride
    pub fn with_stride(width: u32, height: u32, stride: usize, bits: Vec<u8>) -> Option<Self> {
        let row_bytes = usize::try_from(width).ok()?.checked_mul(BYTES_PER_PIXEL)?;
        let expected = stride.checked_mul(usize::try_from(height).ok()?)?;
        if stride < row_bytes || bits.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            stride,
            bits,
            raw_format: ImageFormat::MemoryBmp,
        })
    }

    /// Same pixels, reported under a different raw format
    #[must_use]
    pub fn with_raw_format(mut self, raw_format: ImageFormat) -> Self {
        self.raw_format = raw_format;
        self
    }

    /// A fully transparent square canvas
    pub fn transparent_canvas(size: u32) -> Option<Self> {
        let side = usize::try_from(size).ok()?;
        let len = side.checked_mul(side)?.checked_mul(BYTES_PER_PIXEL)?;
        Self::from_bgra(size, size, vec![0; len])
    }

    /// Pixels of the visible part of each row, without stride padding, top row first
    pub(crate) fn packed_rows(&self) -> impl Iterator<Item = &[u8]> {
        let row_bytes = self.width as usize * BYTES_PER_PIXEL;
        self.bits
            .chunks_exact(self.stride.max(1))
            .map(move |row| &row[..row_bytes])
    }
}

/// Reverse the row order of a bitmap
///
/// Each row is copied verbatim to its mirrored position, so applying the flip twice
/// yields the original bytes.
pub fn flip_rows(bitmap: &DeviceBitmap) -> DeviceBitmap {
    let mut bits = Vec::with_capacity(bitmap.bits.len());
    if bitmap.stride > 0 {
        for row in bitmap.bits.chunks_exact(bitmap.stride).rev() {
            bits.extend_from_slice(row);
        }
    }
    DeviceBitmap {
        width: bitmap.width,
        height: bitmap.height,
        stride: bitmap.stride,
        bits,
        raw_format: bitmap.raw_format,
    }
}

/// Thumbnail of a file reference
///
/// Requests the item's image at `size`, flips it from device order and encodes it.
pub fn extract_from_file_reference<F: FileReference>(file: &F, size: u32) -> Option<Vec<u8>> {
    let Some(bitmap) = file.device_bitmap(size) else {
        debug!("No device bitmap for file reference at size {size}");
        return None;
    };
    encode_bitmap(&flip_rows(&bitmap))
}

/// Thumbnail of a shortcut reference
///
/// The shortcut's icon is drawn on a transparent canvas and always encoded as PNG.
pub fn extract_from_shortcut_reference<L: ShortcutReference>(link: &L, size: u32) -> Option<Vec<u8>> {
    let Some(canvas) = link.icon_canvas(size) else {
        debug!("No icon for shortcut reference at size {size}");
        return None;
    };
    encode_png(&canvas)
}
