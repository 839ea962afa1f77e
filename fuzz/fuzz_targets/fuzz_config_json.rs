#![no_main]

use jumplist_manager::config::AppConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = serde_json::from_str::<AppConfig>(s) {
            let size = config.effective_thumbnail_size();
            assert!((16..=256).contains(&size));
            let _ = config.limits.clamped();
        }
    }
});
