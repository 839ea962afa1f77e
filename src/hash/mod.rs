//! Application identifier hashing
//!
//! The shell stores each application's jump list in
//! `%APPDATA%\Microsoft\Windows\Recent\{Automatic,Custom}Destinations\<hash>.*`, where
//! `<hash>` is a CRC-64 of the uppercased, UTF-16LE encoded application identifier.
//! The manager never touches those files; the hash is exposed for diagnostics.
//!
//! # Example
//!
//! ```
//! use jumplist_manager::hash::AppIdHash;
//!
//! let hash = AppIdHash::compute("Microsoft.Windows.Explorer");
//! assert_eq!(hash.to_hex(), "F01B4D95CF55D32A");
//! assert_eq!(
//!     hash.automatic_destinations_file_name(),
//!     "f01b4d95cf55d32a.automaticDestinations-ms"
//! );
//! ```

pub mod crc64;

pub use crc64::{CRC64_INITIAL, CRC64_POLYNOMIAL, Crc64};

/// 64-bit hash of an application identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppIdHash(u64);

impl AppIdHash {
    /// Hash an application identifier
    ///
    /// The identifier is uppercased and encoded as UTF-16LE before hashing.
    pub fn compute(app_id: &str) -> Self {
        let mut hasher = Crc64::new();
        let mut buf = [0u16; 2];
        for ch in app_id.chars().map(uppercase_char) {
            for unit in ch.encode_utf16(&mut buf) {
                hasher.update(&unit.to_le_bytes());
            }
        }
        Self(hasher.finish())
    }

    /// Raw register value
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Little-endian bytes of the register, as the shell stores them
    pub const fn to_le_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    /// 16 uppercase hex digits (e.g. `F01B4D95CF55D32A`)
    pub fn to_hex(self) -> String {
        format!("{:016X}", self.0)
    }

    /// File name of the automatic destinations store for this identifier
    pub fn automatic_destinations_file_name(self) -> String {
        format!("{:016x}.automaticDestinations-ms", self.0)
    }

    /// File name of the custom destinations store for this identifier
    pub fn custom_destinations_file_name(self) -> String {
        format!("{:016x}.customDestinations-ms", self.0)
    }
}

impl std::fmt::Display for AppIdHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

impl From<AppIdHash> for u64 {
    fn from(hash: AppIdHash) -> Self {
        hash.0
    }
}

/// Uppercase a character when the mapping is one-to-one
///
/// Characters whose uppercase form expands (`ß` → `SS`) are kept, so the UTF-16
/// length of the identifier never changes.
fn uppercase_char(ch: char) -> char {
    let mut upper = ch.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}
