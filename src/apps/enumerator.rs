//! Apps folder enumeration
//!
//! Walks the children of `shell:AppsFolder`, reading for each one:
//!
//! - The display name (`SIGDN_PARENTRELATIVEFORUI`)
//! - The application identifier (`System.AppUserModel.ID`)
//! - A 64-pixel icon, encoded through the thumbnail pipeline
//!
//! Children without an identifier cannot own a jump list and are skipped.

use crate::Result;

/// Logical size of application icons
pub const APP_ICON_SIZE: u32 = 64;

/// An installed application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationEntry {
    /// Encoded icon bytes
    pub icon: Option<Vec<u8>>,
    /// Name shown in the Apps folder (e.g., "File Explorer")
    pub display_name: String,
    /// Application identifier (e.g., "`Microsoft.Windows.Explorer`")
    pub app_id: String,
}

/// Enumerate the applications of the Apps folder, in shell order
///
/// The calling thread must be inside a COM apartment. Children whose name or
/// identifier cannot be read are skipped.
///
/// # Errors
///
/// Returns an error if the Apps folder cannot be opened or enumerated.
///
/// # Platform
///
/// Returns an empty vector on non-Windows platforms.
#[cfg(windows)]
#[expect(unsafe_code, reason = "COM calls to enumerate the shell Apps folder")]
pub fn enumerate_applications() -> Result<Vec<ApplicationEntry>> {
    use crate::shell::windows::win32;
    use tracing::{debug, info};
    use windows::Win32::Foundation::S_OK;
    use windows::Win32::UI::Shell::{
        BHID_EnumItems, IEnumShellItems, IShellItem, SHCreateItemFromParsingName,
    };

    let folder: IShellItem =
        unsafe { SHCreateItemFromParsingName(windows_core::w!("shell:AppsFolder"), None) }
            .map_err(win32("SHCreateItemFromParsingName"))?;
    let children: IEnumShellItems = unsafe { folder.BindToHandler(None, &BHID_EnumItems) }
        .map_err(win32("BindToHandler"))?;

    let mut entries = Vec::new();
    loop {
        let mut batch = [None];
        let mut fetched = 0u32;
        let hr = unsafe { children.Next(&mut batch, Some(&raw mut fetched)) };
        if hr != S_OK || fetched == 0 {
            break;
        }
        let Some(child) = batch[0].take() else {
            continue;
        };

        match read_entry(child) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {}
            Err(e) => debug!("Skipping Apps folder child: {e}"),
        }
    }

    info!("Found {} applications", entries.len());
    Ok(entries)
}

#[cfg(windows)]
#[expect(unsafe_code, reason = "COM calls to read an Apps folder child")]
fn read_entry(
    child: windows::Win32::UI::Shell::IShellItem,
) -> std::result::Result<Option<ApplicationEntry>, crate::error::ShellError> {
    use crate::shell::windows::{ComFileReference, CoTaskString, win32};
    use crate::thumbnail::extract_from_file_reference;
    use windows::Win32::Storage::EnhancedStorage::PKEY_AppUserModel_ID;
    use windows::Win32::UI::Shell::PropertiesSystem::IPropertyStore;
    use windows::Win32::UI::Shell::{BHID_PropertyStore, SIGDN_PARENTRELATIVEFORUI};

    let name = unsafe { child.GetDisplayName(SIGDN_PARENTRELATIVEFORUI) }
        .map_err(win32("GetDisplayName"))?;
    let display_name = CoTaskString(name).read("GetDisplayName")?;

    let store: IPropertyStore = unsafe { child.BindToHandler(None, &BHID_PropertyStore) }
        .map_err(win32("BindToHandler"))?;
    let app_id = unsafe { store.GetValue(&PKEY_AppUserModel_ID) }
        .map_err(win32("GetValue"))?
        .to_string();
    if app_id.is_empty() {
        tracing::debug!("'{display_name}' has no application identifier");
        return Ok(None);
    }

    let icon = extract_from_file_reference(&ComFileReference::from(child), APP_ICON_SIZE);
    Ok(Some(ApplicationEntry {
        icon,
        display_name,
        app_id,
    }))
}

/// Enumerate the applications of the Apps folder
///
/// Returns an empty vector on non-Windows platforms.
#[cfg(not(windows))]
pub fn enumerate_applications() -> Result<Vec<ApplicationEntry>> {
    Ok(Vec::new())
}
