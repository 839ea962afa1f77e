#![expect(
    clippy::unwrap_used,
    reason = "Test utilities use .unwrap() for brevity"
)]

//! Shared test utilities for unit tests.
//!
//! Provides the `APPDATA` guard used by configuration and logging tests, and
//! fixtures built on the in-memory shell.

use crate::shell::memory::{
    AppDestinations, FileEntry, MemoryObject, MemoryShell, ShortcutEntry, StoredCategory,
};
use crate::shell::{DestinationOf, classify};
use crate::thumbnail::DeviceBitmap;
use std::sync::Mutex;
use tempfile::TempDir;

/// Application identifier used by the jump list fixtures
pub const FIXTURE_APP_ID: &str = "Contoso.Writer";

/// Serializes tests that modify the APPDATA environment variable
static APPDATA_LOCK: Mutex<()> = Mutex::new(());

/// Create a temporary directory that is removed when dropped
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Points APPDATA at a temporary directory for the lifetime of the guard
///
/// The previous value is restored on drop. Holding `APPDATA_LOCK` for the
/// guard's lifetime keeps concurrent tests from observing each other's value.
pub struct AppdataGuard {
    original: Option<String>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[expect(
    unsafe_code,
    reason = "Test-only environment mutation serialized by APPDATA_LOCK"
)]
impl AppdataGuard {
    /// Set APPDATA to `temp_dir`
    pub fn new(temp_dir: &TempDir) -> Self {
        let lock = APPDATA_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let original = std::env::var("APPDATA").ok();
        // SAFETY: APPDATA_LOCK is held, so no other guarded test touches the variable
        unsafe {
            std::env::set_var("APPDATA", temp_dir.path());
        }
        Self {
            original,
            _lock: lock,
        }
    }
}

#[expect(
    unsafe_code,
    reason = "Test-only environment mutation serialized by APPDATA_LOCK"
)]
impl Drop for AppdataGuard {
    fn drop(&mut self) {
        // SAFETY: the lock is still held until this guard's fields drop
        match &self.original {
            Some(original) => unsafe { std::env::set_var("APPDATA", original) },
            None => unsafe { std::env::remove_var("APPDATA") },
        }
    }
}

/// A standalone file destination
pub fn file_destination(path: &str) -> DestinationOf<MemoryObject> {
    classify(&MemoryShell::new().object(FileEntry::new(path))).unwrap()
}

/// A standalone shortcut destination
pub fn shortcut_destination(
    target_path: &str,
    arguments: &str,
    title: &str,
) -> DestinationOf<MemoryObject> {
    classify(&MemoryShell::new().object(ShortcutEntry::new(target_path, arguments, title))).unwrap()
}

/// An opaque square bitmap with a distinct first row
pub fn marked_bitmap(size: u32) -> DeviceBitmap {
    let side = size as usize;
    let mut bits = vec![0xFF; side * side * 4];
    bits[..side * 4].fill(0x10);
    DeviceBitmap::from_bgra(size, size, bits).unwrap()
}

/// A word processor's jump list
///
/// - Pinned: `Report.docx`
/// - Recent: `Report.docx`, `Notes.txt`
/// - Categories: Known (frequent placeholder), custom "Templates" with one
///   shortcut, Tasks with one shortcut
pub fn writer_destinations() -> AppDestinations {
    let report = FileEntry::new(r"C:\Users\me\Documents\Report.docx").with_image(marked_bitmap(32));
    let notes = FileEntry::new(r"C:\Users\me\Documents\Notes.txt");
    AppDestinations {
        pinned: vec![report.clone().into()],
        recent: vec![report.into(), notes.into()],
        frequent: Vec::new(),
        categories: vec![
            StoredCategory::known(1),
            StoredCategory::custom(
                "Templates",
                vec![ShortcutEntry::new(r"C:\Program Files\Writer\writer.exe", "/t letter", "Letter").into()],
            ),
            StoredCategory::tasks(vec![
                ShortcutEntry::new(r"C:\Program Files\Writer\writer.exe", "/new", "New document").into(),
            ]),
        ],
    }
}

/// A memory shell holding [`writer_destinations`] under [`FIXTURE_APP_ID`]
pub fn writer_shell() -> MemoryShell {
    let shell = MemoryShell::new();
    shell.set_destinations(FIXTURE_APP_ID, writer_destinations());
    shell
}
