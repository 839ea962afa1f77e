#![no_main]

use jumplist_manager::AppIdHash;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let app_id = String::from_utf8_lossy(data);
    let hash = AppIdHash::compute(&app_id);
    assert_eq!(hash.to_hex().len(), 16);
    assert_eq!(hash, AppIdHash::compute(&app_id.to_ascii_lowercase()));
});
