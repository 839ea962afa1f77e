//! Image encoder registry and encoding
//!
//! The registry maps image formats to the encoders the imaging subsystem offers.
//! It is queried once per process on first use and never invalidated:
//!
//! - Windows: the GDI+ encoder list (`GdipGetImageEncoders`)
//! - Elsewhere: the formats the `image` crate is compiled with (PNG and ICO)

use super::DeviceBitmap;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Image formats known to the imaging subsystem, identified by their GDI+ format GUID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// In-memory bitmap (the raw format of any bitmap built from pixel rows)
    MemoryBmp,
    /// Windows bitmap
    Bmp,
    /// Enhanced metafile
    Emf,
    /// Windows metafile
    Wmf,
    /// JPEG
    Jpeg,
    /// PNG
    Png,
    /// GIF
    Gif,
    /// TIFF
    Tiff,
    /// EXIF
    Exif,
    /// Windows icon
    Icon,
    /// HEIF
    Heif,
    /// WebP
    Webp,
    /// Any other format GUID
    Other(u128),
}

const FORMAT_GUIDS: [(ImageFormat, u128); 12] = [
    (ImageFormat::MemoryBmp, 0xb96b_3caa_0728_11d3_9d7b_0000_f81e_f32e),
    (ImageFormat::Bmp, 0xb96b_3cab_0728_11d3_9d7b_0000_f81e_f32e),
    (ImageFormat::Emf, 0xb96b_3cac_0728_11d3_9d7b_0000_f81e_f32e),
    (ImageFormat::Wmf, 0xb96b_3cad_0728_11d3_9d7b_0000_f81e_f32e),
    (ImageFormat::Jpeg, 0xb96b_3cae_0728_11d3_9d7b_0000_f81e_f32e),
    (ImageFormat::Png, 0xb96b_3caf_0728_11d3_9d7b_0000_f81e_f32e),
    (ImageFormat::Gif, 0xb96b_3cb0_0728_11d3_9d7b_0000_f81e_f32e),
    (ImageFormat::Tiff, 0xb96b_3cb1_0728_11d3_9d7b_0000_f81e_f32e),
    (ImageFormat::Exif, 0xb96b_3cb2_0728_11d3_9d7b_0000_f81e_f32e),
    (ImageFormat::Icon, 0xb96b_3cb5_0728_11d3_9d7b_0000_f81e_f32e),
    (ImageFormat::Heif, 0xb96b_3cb6_0728_11d3_9d7b_0000_f81e_f32e),
    (ImageFormat::Webp, 0xb96b_3cb7_0728_11d3_9d7b_0000_f81e_f32e),
];

impl ImageFormat {
    /// Format GUID as a 128-bit value
    pub fn guid(self) -> u128 {
        if let Self::Other(guid) = self {
            return guid;
        }
        FORMAT_GUIDS
            .iter()
            .find(|(format, _)| *format == self)
            .map_or(0, |(_, guid)| *guid)
    }

    /// Format identified by a GUID
    pub fn from_guid(guid: u128) -> Self {
        FORMAT_GUIDS
            .iter()
            .find(|(_, known)| *known == guid)
            .map_or(Self::Other(guid), |(format, _)| *format)
    }

    /// Whether re-encoding in this format loses information
    pub const fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg)
    }
}

/// An encoder offered by the imaging subsystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderInfo {
    /// Format the encoder writes
    pub format: ImageFormat,
    /// Encoder class identifier (zero when the subsystem has none)
    pub clsid: u128,
    /// MIME type of the output
    pub mime_type: String,
}

/// Format to encoder lookup table
#[derive(Debug, Clone, Default)]
pub struct EncoderRegistry {
    encoders: Vec<EncoderInfo>,
}

static REGISTRY: OnceLock<EncoderRegistry> = OnceLock::new();

impl EncoderRegistry {
    /// Build a registry from an explicit encoder list
    pub const fn new(encoders: Vec<EncoderInfo>) -> Self {
        Self { encoders }
    }

    /// The process-wide registry, queried from the imaging subsystem on first use
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(|| {
            let registry = Self::new(load_system_encoders());
            debug!("Loaded {} image encoders", registry.encoders.len());
            registry
        })
    }

    /// Encoder for a format, if the subsystem has one
    pub fn find(&self, format: ImageFormat) -> Option<&EncoderInfo> {
        self.encoders.iter().find(|encoder| encoder.format == format)
    }

    /// All registered encoders, in subsystem order
    pub fn encoders(&self) -> &[EncoderInfo] {
        &self.encoders
    }
}

/// Pick the encoder for a bitmap's raw format
///
/// Lossy formats and formats without an encoder fall back to PNG.
pub fn select_encoder(registry: &EncoderRegistry, raw_format: ImageFormat) -> Option<&EncoderInfo> {
    if !raw_format.is_lossy()
        && let Some(encoder) = registry.find(raw_format)
    {
        return Some(encoder);
    }
    registry.find(ImageFormat::Png)
}

/// Encode a bitmap with the encoder selected for its raw format
pub fn encode_bitmap(bitmap: &DeviceBitmap) -> Option<Vec<u8>> {
    let Some(encoder) = select_encoder(EncoderRegistry::global(), bitmap.raw_format) else {
        warn!("No image encoder available for {:?}", bitmap.raw_format);
        return None;
    };
    encode_with(bitmap, encoder)
}

/// Encode a bitmap as PNG regardless of its raw format
pub fn encode_png(bitmap: &DeviceBitmap) -> Option<Vec<u8>> {
    let Some(encoder) = EncoderRegistry::global().find(ImageFormat::Png) else {
        warn!("No PNG encoder available");
        return None;
    };
    encode_with(bitmap, encoder)
}

#[cfg(windows)]
fn load_system_encoders() -> Vec<EncoderInfo> {
    super::gdi::image_encoders()
}

#[cfg(not(windows))]
fn load_system_encoders() -> Vec<EncoderInfo> {
    vec![
        EncoderInfo {
            format: ImageFormat::Png,
            clsid: 0,
            mime_type: "image/png".to_string(),
        },
        EncoderInfo {
            format: ImageFormat::Icon,
            clsid: 0,
            mime_type: "image/x-icon".to_string(),
        },
    ]
}

#[cfg(windows)]
fn encode_with(bitmap: &DeviceBitmap, encoder: &EncoderInfo) -> Option<Vec<u8>> {
    super::gdi::save_to_memory(bitmap, encoder.clsid)
}

#[cfg(not(windows))]
fn encode_with(bitmap: &DeviceBitmap, encoder: &EncoderInfo) -> Option<Vec<u8>> {
    use image::{DynamicImage, RgbaImage};
    use std::io::Cursor;

    let output_format = match encoder.format {
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Icon => image::ImageFormat::Ico,
        other => {
            warn!("Encoder for {other:?} is not available");
            return None;
        }
    };

    // BGRA rows to RGBA pixels
    let mut rgba = Vec::with_capacity(bitmap.width as usize * bitmap.height as usize * 4);
    for row in bitmap.packed_rows() {
        for pixel in row.chunks_exact(4) {
            rgba.extend_from_slice(&[pixel[2], pixel[1], pixel[0], pixel[3]]);
        }
    }

    let Some(image) = RgbaImage::from_raw(bitmap.width, bitmap.height, rgba) else {
        warn!(
            "Pixel buffer does not match {}x{} bitmap",
            bitmap.width, bitmap.height
        );
        return None;
    };

    let mut stream = Cursor::new(Vec::new());
    match DynamicImage::ImageRgba8(image).write_to(&mut stream, output_format) {
        Ok(()) => Some(stream.into_inner()),
        Err(e) => {
            warn!("Failed to encode {output_format:?} thumbnail: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn registry(formats: &[ImageFormat]) -> EncoderRegistry {
        EncoderRegistry::new(
            formats
                .iter()
                .map(|&format| EncoderInfo {
                    format,
                    clsid: format.guid() ^ 1,
                    mime_type: String::new(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_guid_round_trip_for_known_formats() {
        for (format, guid) in FORMAT_GUIDS {
            assert_eq!(format.guid(), guid);
            assert_eq!(ImageFormat::from_guid(guid), format);
        }
    }

    #[test]
    fn test_unknown_guid_is_other() {
        let format = ImageFormat::from_guid(42);
        assert_eq!(format, ImageFormat::Other(42));
        assert_eq!(format.guid(), 42);
    }

    #[test]
    fn test_select_matching_encoder() {
        let registry = registry(&[ImageFormat::Bmp, ImageFormat::Png]);
        let encoder = select_encoder(&registry, ImageFormat::Bmp).expect("encoder");
        assert_eq!(encoder.format, ImageFormat::Bmp);
    }

    #[test]
    fn test_select_forces_png_for_jpeg() {
        let registry = registry(&[ImageFormat::Jpeg, ImageFormat::Png]);
        let encoder = select_encoder(&registry, ImageFormat::Jpeg).expect("encoder");
        assert_eq!(encoder.format, ImageFormat::Png);
    }

    #[test]
    fn test_select_falls_back_to_png_without_match() {
        let registry = registry(&[ImageFormat::Png, ImageFormat::Gif]);
        let encoder = select_encoder(&registry, ImageFormat::MemoryBmp).expect("encoder");
        assert_eq!(encoder.format, ImageFormat::Png);
    }

    #[test]
    fn test_select_without_png_encoder() {
        let registry = registry(&[ImageFormat::Gif]);
        assert!(select_encoder(&registry, ImageFormat::Jpeg).is_none());
        assert!(select_encoder(&EncoderRegistry::default(), ImageFormat::Png).is_none());
    }

    #[test]
    fn test_global_registry_is_shared() {
        let first = EncoderRegistry::global();
        let second = EncoderRegistry::global();
        assert!(std::ptr::eq(first, second));
        assert!(first.find(ImageFormat::Png).is_some());
    }

    #[test]
    fn test_encode_png_signature() {
        let canvas = DeviceBitmap::transparent_canvas(16).expect("canvas");
        let bytes = encode_png(&canvas).expect("png bytes");
        assert_eq!(bytes[..8], PNG_SIGNATURE);
    }

    #[test]
    fn test_encode_jpeg_tagged_bitmap_produces_png() {
        let bitmap = DeviceBitmap::transparent_canvas(8)
            .expect("canvas")
            .with_raw_format(ImageFormat::Jpeg);
        let bytes = encode_bitmap(&bitmap).expect("encoded");
        assert_eq!(bytes[..8], PNG_SIGNATURE);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_encode_swaps_bgra_to_rgba() {
        let bitmap = DeviceBitmap::from_bgra(1, 1, vec![0x10, 0x20, 0x30, 0xFF]).expect("bitmap");
        let bytes = encode_png(&bitmap).expect("png bytes");
        let decoded = image::load_from_memory(&bytes).expect("decodes").to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0).0, [0x30, 0x20, 0x10, 0xFF]);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_encode_icon_format() {
        let bitmap = DeviceBitmap::transparent_canvas(32)
            .expect("canvas")
            .with_raw_format(ImageFormat::Icon);
        let bytes = encode_bitmap(&bitmap).expect("ico bytes");
        assert_eq!(bytes[..4], [0, 0, 1, 0]);
    }
}
