#![no_main]

use jumplist_manager::thumbnail::{DeviceBitmap, flip_rows};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&[width, height, padding], bits)) = data.split_first_chunk::<3>() else {
        return;
    };
    let width = u32::from(width % 16);
    let height = u32::from(height % 16);
    let stride = width as usize * 4 + usize::from(padding % 4);
    let Some(bitmap) = DeviceBitmap::with_stride(width, height, stride, bits.to_vec()) else {
        return;
    };
    assert_eq!(flip_rows(&flip_rows(&bitmap)), bitmap);
});
