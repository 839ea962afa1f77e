//! GDI capture and GDI+ encoding
//!
//! Every handle is wrapped in a guard that releases it on drop, so early returns
//! never leak bitmaps, icons, device contexts, GDI+ images or streams.

#![expect(
    unsafe_code,
    reason = "Windows FFI for GDI bitmap capture and GDI+ image encoding"
)]

use super::encoder::{EncoderInfo, ImageFormat};
use super::{BYTES_PER_PIXEL, DeviceBitmap};
use std::ffi::c_void;
use std::sync::OnceLock;
use tracing::{debug, warn};
use windows::Win32::Foundation::HGLOBAL;
use windows::Win32::Graphics::Gdi::{
    BI_RGB, BITMAP, BITMAPINFO, BITMAPINFOHEADER, CreateCompatibleDC, CreateDIBSection,
    DIB_RGB_COLORS, DeleteDC, DeleteObject, GdiFlush, GetObjectW, HBITMAP, HDC, HGDIOBJ,
    SelectObject,
};
use windows::Win32::Graphics::GdiPlus::{
    GdipCreateBitmapFromScan0, GdipDisposeImage, GdipGetImageEncoders, GdipGetImageEncodersSize,
    GdipSaveImageToStream, GdiplusStartup, GdiplusStartupInput, GpBitmap, GpImage, ImageCodecInfo,
};
use windows::Win32::System::Com::StructuredStorage::CreateStreamOnHGlobal;
use windows::Win32::System::Com::{STATFLAG_NONAME, STATSTG, STREAM_SEEK_SET};
use windows::Win32::UI::WindowsAndMessaging::{DI_NORMAL, DestroyIcon, DrawIconEx, HICON};
use windows::core::GUID;

/// `PixelFormat32bppARGB`
const PIXEL_FORMAT_32BPP_ARGB: i32 = 2_498_570;

/// GDI+ `Status::Ok`
const GDIPLUS_OK: i32 = 0;

/// Owned GDI bitmap, deleted on drop
pub(crate) struct OwnedBitmap(pub(crate) HBITMAP);

impl Drop for OwnedBitmap {
    fn drop(&mut self) {
        if !self.0.is_invalid() {
            unsafe {
                let _ = DeleteObject(self.0.into());
            }
        }
    }
}

/// Owned icon handle, destroyed on drop
pub(crate) struct OwnedIcon(pub(crate) HICON);

impl Drop for OwnedIcon {
    fn drop(&mut self) {
        if !self.0.is_invalid() {
            unsafe {
                let _ = DestroyIcon(self.0);
            }
        }
    }
}

struct MemoryDc(HDC);

impl Drop for MemoryDc {
    fn drop(&mut self) {
        unsafe {
            let _ = DeleteDC(self.0);
        }
    }
}

/// Restores the previously selected object of a DC
struct Selection {
    dc: HDC,
    previous: HGDIOBJ,
}

impl Drop for Selection {
    fn drop(&mut self) {
        unsafe {
            SelectObject(self.dc, self.previous);
        }
    }
}

struct GdipImage(*mut GpImage);

impl Drop for GdipImage {
    fn drop(&mut self) {
        unsafe {
            GdipDisposeImage(self.0);
        }
    }
}

/// Start GDI+ once per process
///
/// The token is never shut down; GDI+ lives as long as the process.
fn ensure_gdiplus() -> bool {
    static TOKEN: OnceLock<Option<usize>> = OnceLock::new();

    TOKEN
        .get_or_init(|| {
            let input = GdiplusStartupInput {
                GdiplusVersion: 1,
                ..Default::default()
            };
            let mut token = 0usize;
            let status =
                unsafe { GdiplusStartup(&raw mut token, &raw const input, std::ptr::null_mut()) };
            if status.0 == GDIPLUS_OK {
                debug!("GDI+ started");
                Some(token)
            } else {
                warn!("GdiplusStartup failed with status {}", status.0);
                None
            }
        })
        .is_some()
}

/// Copy the pixels of a 32-bpp DIB section, keeping the device row order
pub(crate) fn bitmap_bits(hbitmap: HBITMAP) -> Option<DeviceBitmap> {
    let mut bitmap = BITMAP::default();
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        reason = "size_of::<BITMAP>() is a small compile-time constant"
    )]
    let written = unsafe {
        GetObjectW(
            hbitmap.into(),
            std::mem::size_of::<BITMAP>() as i32,
            Some((&raw mut bitmap).cast::<c_void>()),
        )
    };
    if written == 0 || bitmap.bmBits.is_null() || bitmap.bmBitsPixel != 32 {
        debug!(
            "Bitmap is not a 32-bpp DIB section (bits per pixel: {})",
            bitmap.bmBitsPixel
        );
        return None;
    }

    let width = u32::try_from(bitmap.bmWidth).ok()?;
    let height = u32::try_from(bitmap.bmHeight).ok()?;
    let stride = usize::try_from(bitmap.bmWidthBytes).ok()?;
    let len = stride.checked_mul(height as usize)?;

    // bmBits points at stride * height bytes owned by the DIB section
    let bits = unsafe { std::slice::from_raw_parts(bitmap.bmBits.cast::<u8>(), len) }.to_vec();
    DeviceBitmap::with_stride(width, height, stride, bits)
}

/// Draw an icon on a transparent, top-down square canvas
pub(crate) fn draw_icon_canvas(icon: HICON, size: u32) -> Option<DeviceBitmap> {
    let side = i32::try_from(size).ok()?;
    let len = (size as usize)
        .checked_mul(size as usize)?
        .checked_mul(BYTES_PER_PIXEL)?;

    let dc = MemoryDc(unsafe { CreateCompatibleDC(None) });
    if dc.0.is_invalid() {
        warn!("CreateCompatibleDC failed");
        return None;
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "size_of::<BITMAPINFOHEADER>() is a small compile-time constant"
    )]
    let info = BITMAPINFO {
        bmiHeader: BITMAPINFOHEADER {
            biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: side,
            biHeight: -side,
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB.0,
            ..Default::default()
        },
        ..Default::default()
    };

    let mut bits: *mut c_void = std::ptr::null_mut();
    let dib = match unsafe {
        CreateDIBSection(Some(dc.0), &raw const info, DIB_RGB_COLORS, &raw mut bits, None, 0)
    } {
        Ok(dib) => OwnedBitmap(dib),
        Err(e) => {
            warn!("CreateDIBSection failed: {e}");
            return None;
        }
    };
    if bits.is_null() {
        return None;
    }

    unsafe { std::ptr::write_bytes(bits.cast::<u8>(), 0, len) };

    let previous = unsafe { SelectObject(dc.0, dib.0.into()) };
    let _selection = Selection { dc: dc.0, previous };

    if let Err(e) = unsafe { DrawIconEx(dc.0, 0, 0, icon, side, side, 0, None, DI_NORMAL) } {
        warn!("DrawIconEx failed: {e}");
        return None;
    }

    unsafe {
        let _ = GdiFlush();
    }

    // The DIB section owns len bytes until `dib` is dropped
    let pixels = unsafe { std::slice::from_raw_parts(bits.cast::<u8>(), len) }.to_vec();
    DeviceBitmap::from_bgra(size, size, pixels)
}

/// Query the GDI+ encoder list
pub(crate) fn image_encoders() -> Vec<EncoderInfo> {
    if !ensure_gdiplus() {
        return Vec::new();
    }

    let (mut count, mut size) = (0u32, 0u32);
    let status = unsafe { GdipGetImageEncodersSize(&raw mut count, &raw mut size) };
    if status.0 != GDIPLUS_OK || count == 0 {
        warn!("GdipGetImageEncodersSize failed with status {}", status.0);
        return Vec::new();
    }

    // The codec array is followed by the strings it points to, all within `size` bytes
    let entries = (size as usize).div_ceil(std::mem::size_of::<ImageCodecInfo>());
    let mut codecs = vec![ImageCodecInfo::default(); entries.max(count as usize)];
    let status = unsafe { GdipGetImageEncoders(count, size, codecs.as_mut_ptr()) };
    if status.0 != GDIPLUS_OK {
        warn!("GdipGetImageEncoders failed with status {}", status.0);
        return Vec::new();
    }

    codecs
        .iter()
        .take(count as usize)
        .map(|codec| EncoderInfo {
            format: ImageFormat::from_guid(codec.FormatID.to_u128()),
            clsid: codec.Clsid.to_u128(),
            mime_type: unsafe { codec.MimeType.to_string() }.unwrap_or_default(),
        })
        .collect()
}

/// Encode a bitmap with a GDI+ encoder into an in-memory stream and copy the bytes out
pub(crate) fn save_to_memory(bitmap: &DeviceBitmap, encoder_clsid: u128) -> Option<Vec<u8>> {
    if !ensure_gdiplus() {
        return None;
    }

    let width = i32::try_from(bitmap.width).ok()?;
    let height = i32::try_from(bitmap.height).ok()?;
    let stride = i32::try_from(bitmap.stride).ok()?;

    let mut gp_bitmap: *mut GpBitmap = std::ptr::null_mut();
    let status = unsafe {
        GdipCreateBitmapFromScan0(
            width,
            height,
            stride,
            PIXEL_FORMAT_32BPP_ARGB,
            Some(bitmap.bits.as_ptr()),
            &raw mut gp_bitmap,
        )
    };
    if status.0 != GDIPLUS_OK || gp_bitmap.is_null() {
        warn!("GdipCreateBitmapFromScan0 failed with status {}", status.0);
        return None;
    }
    let image = GdipImage(gp_bitmap.cast::<GpImage>());

    let stream = match unsafe { CreateStreamOnHGlobal(HGLOBAL::default(), true) } {
        Ok(stream) => stream,
        Err(e) => {
            warn!("CreateStreamOnHGlobal failed: {e}");
            return None;
        }
    };

    let encoder = GUID::from_u128(encoder_clsid);
    let status = unsafe { GdipSaveImageToStream(image.0, &stream, &raw const encoder, None) };
    if status.0 != GDIPLUS_OK {
        warn!("GdipSaveImageToStream failed with status {}", status.0);
        return None;
    }

    let mut stat = STATSTG::default();
    unsafe { stream.Stat(&raw mut stat, STATFLAG_NONAME) }.ok()?;
    let len = u32::try_from(stat.cbSize).ok()?;

    unsafe { stream.Seek(0, STREAM_SEEK_SET, None) }.ok()?;

    let mut bytes = vec![0u8; len as usize];
    let mut read = 0u32;
    unsafe { stream.Read(bytes.as_mut_ptr().cast::<c_void>(), len, Some(&raw mut read)) }
        .ok()
        .ok()?;
    bytes.truncate(read as usize);
    Some(bytes)
}
