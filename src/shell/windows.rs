//! COM backend for the jump list containers
//!
//! Wraps the three shell containers and the two destination shapes (`IShellItem`
//! and `IShellLinkW`). Interface pointers are owned `windows` crate values, so
//! every reference is released exactly once when the wrapper drops.
//!
//! The calling thread must be inside a COM apartment (see [`crate::utils::com`]).

#![expect(
    unsafe_code,
    reason = "COM calls into the shell's jump list containers and destination objects"
)]

use super::com::{
    APPDESTCATEGORY, APPDESTCATEGORY_CUSTOM, APPDESTCATEGORY_KNOWN, APPDESTCATEGORY_TASKS,
    CLSID_AUTOMATIC_DESTINATION_LIST, CLSID_DESTINATION_LIST, IAutomaticDestinationList,
    IInternalCustomDestinationList, MAX_PATH, SICHINT_CANONICAL_TEST_FILESYSPATH, SLGP_RAWPATH,
};
use super::{
    AutomaticDestinationList, Category, CategoryFlags, CategoryKind, CustomDestinationList,
    Destination, DestinationListKind, DestinationOf, FileReference, GetListFlags,
    InternalCustomDestinationList, PinIndex, ShellObject, ShellProvider, ShellResult,
    ShortcutReference,
};
use crate::error::{E_FAIL, ShellError};
use crate::thumbnail::DeviceBitmap;
use crate::thumbnail::gdi::{self, OwnedBitmap, OwnedIcon};
use std::ffi::c_void;
use tracing::{debug, warn};
use windows::Win32::Foundation::SIZE;
use windows::Win32::Storage::EnhancedStorage::PKEY_Title;
use windows::Win32::System::Com::{CLSCTX_INPROC_SERVER, CoCreateInstance, CoTaskMemFree};
use windows::Win32::UI::Shell::Common::IObjectCollection;
use windows::Win32::UI::Shell::PropertiesSystem::IPropertyStore;
use windows::Win32::UI::Shell::{
    ICustomDestinationList, IExtractIconW, IShellItem, IShellItemImageFactory, IShellLinkW,
    SHLoadIndirectString, SIGDN_NORMALDISPLAY, SIIGBF_ICONONLY,
};
use windows::Win32::UI::WindowsAndMessaging::HICON;
use windows_core::{BOOL, HRESULT, HSTRING, IUnknown, Interface, PCWSTR, PWSTR};

/// Capacity of the buffer indirect strings are resolved into
const INDIRECT_STRING_CAPACITY: usize = 1024;

/// Size of the small icon requested alongside the large one
const SMALL_ICON_SIZE: u32 = 16;

fn check(operation: &'static str, hr: HRESULT) -> ShellResult<()> {
    if hr.is_ok() {
        Ok(())
    } else {
        Err(ShellError::new(operation, hr.0))
    }
}

pub(crate) fn win32(operation: &'static str) -> impl FnOnce(windows_core::Error) -> ShellError {
    move |e| ShellError::from_win32(operation, &e)
}

fn wide_to_string(buffer: &[u16]) -> String {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}

/// Shell-allocated string, freed with `CoTaskMemFree` on drop
pub(crate) struct CoTaskString(pub(crate) PWSTR);

impl CoTaskString {
    pub(crate) fn read(&self, operation: &'static str) -> ShellResult<String> {
        if self.0.is_null() {
            return Ok(String::new());
        }
        unsafe { self.0.to_string() }.map_err(|_| ShellError::new(operation, E_FAIL))
    }
}

impl Drop for CoTaskString {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe { CoTaskMemFree(Some(self.0.0.cast_const().cast::<c_void>())) };
        }
    }
}

/// Convert an out-parameter object collection into owned objects
fn collect_objects(collection: &IObjectCollection) -> ShellResult<Vec<ComObject>> {
    let count = unsafe { collection.GetCount() }.map_err(win32("GetCount"))?;
    let mut objects = Vec::with_capacity(count as usize);
    for index in 0..count {
        match unsafe { collection.GetAt::<IUnknown>(index) } {
            Ok(object) => objects.push(ComObject(object)),
            Err(e) => debug!("Skipping destination {index}: GetAt failed: {e}"),
        }
    }
    Ok(objects)
}

/// Take ownership of an interface returned through a `void**` out-parameter
fn take_collection(operation: &'static str, raw: *mut c_void) -> ShellResult<IObjectCollection> {
    if raw.is_null() {
        return Err(ShellError::new(operation, E_FAIL));
    }
    Ok(unsafe { IObjectCollection::from_raw(raw) })
}

/// Borrowed `IUnknown*` of a destination, valid while the destination lives
fn destination_ptr(destination: &DestinationOf<ComObject>) -> *mut c_void {
    match destination {
        Destination::FileReference(file) => file.0.as_raw(),
        Destination::ShortcutReference(link) => link.0.as_raw(),
    }
}

/// Activates the shell containers through `CoCreateInstance`
#[derive(Debug, Clone, Copy, Default)]
pub struct ComShellProvider;

impl ShellProvider for ComShellProvider {
    type Object = ComObject;
    type AutomaticList = ComAutomaticList;
    type CustomList = ComCustomList;
    type InternalList = ComInternalList;

    fn create_automatic_list(&self) -> ShellResult<ComAutomaticList> {
        unsafe { CoCreateInstance(&CLSID_AUTOMATIC_DESTINATION_LIST, None, CLSCTX_INPROC_SERVER) }
            .map(ComAutomaticList)
            .map_err(win32("CoCreateInstance"))
    }

    fn create_custom_list(&self) -> ShellResult<ComCustomList> {
        unsafe { CoCreateInstance(&CLSID_DESTINATION_LIST, None, CLSCTX_INPROC_SERVER) }
            .map(ComCustomList)
            .map_err(win32("CoCreateInstance"))
    }

    fn create_internal_list(&self) -> ShellResult<ComInternalList> {
        unsafe { CoCreateInstance(&CLSID_DESTINATION_LIST, None, CLSCTX_INPROC_SERVER) }
            .map(ComInternalList)
            .map_err(win32("CoCreateInstance"))
    }

    fn load_indirect_string(&self, source: &str) -> ShellResult<String> {
        if !source.starts_with('@') {
            return Ok(source.to_string());
        }
        let source = HSTRING::from(source);
        let mut buffer = vec![0u16; INDIRECT_STRING_CAPACITY];
        unsafe { SHLoadIndirectString(&source, &mut buffer, None) }
            .map_err(win32("SHLoadIndirectString"))?;
        Ok(wide_to_string(&buffer))
    }
}

/// `IAutomaticDestinationList` wrapper
#[derive(Debug)]
pub struct ComAutomaticList(IAutomaticDestinationList);

impl AutomaticDestinationList for ComAutomaticList {
    type Object = ComObject;

    fn initialize(
        &self,
        app_id: &str,
        app_path: Option<&str>,
        custom_file: Option<&str>,
    ) -> ShellResult<()> {
        let app_id = HSTRING::from(app_id);
        let app_path = app_path.map(HSTRING::from);
        let custom_file = custom_file.map(HSTRING::from);
        let optional = |s: &Option<HSTRING>| s.as_ref().map_or(PCWSTR::null(), |s| PCWSTR(s.as_ptr()));

        check("Initialize", unsafe {
            self.0.Initialize(
                PCWSTR(app_id.as_ptr()),
                optional(&app_path),
                optional(&custom_file),
            )
        })
    }

    fn has_list(&self) -> ShellResult<bool> {
        let mut has_list = BOOL::default();
        check("HasList", unsafe { self.0.HasList(&raw mut has_list) })?;
        Ok(has_list.as_bool())
    }

    fn get_list(
        &self,
        kind: DestinationListKind,
        max_count: u32,
        flags: GetListFlags,
    ) -> ShellResult<Vec<ComObject>> {
        let mut raw: *mut c_void = std::ptr::null_mut();
        check("GetList", unsafe {
            self.0.GetList(
                kind as u32,
                i32::try_from(max_count).unwrap_or(i32::MAX),
                flags as u32,
                &IObjectCollection::IID,
                &raw mut raw,
            )
        })?;
        let collection = take_collection("GetList", raw)?;
        collect_objects(&collection)
    }

    fn pin_or_unpin(&self, destination: &DestinationOf<ComObject>, index: PinIndex) -> ShellResult<()> {
        check("PinItem", unsafe {
            self.0.PinItem(destination_ptr(destination), index.raw())
        })
    }

    fn remove_destination(&self, destination: &DestinationOf<ComObject>) -> ShellResult<()> {
        check("RemoveDestination", unsafe {
            self.0.RemoveDestination(destination_ptr(destination))
        })
    }

    fn clear_list(&self, remove_pins: bool) -> ShellResult<()> {
        check("ClearList", unsafe { self.0.ClearList(BOOL::from(remove_pins)) })
    }
}

/// `ICustomDestinationList` wrapper
#[derive(Debug)]
pub struct ComCustomList(ICustomDestinationList);

impl CustomDestinationList for ComCustomList {
    fn set_app_id(&self, app_id: &str) -> ShellResult<()> {
        unsafe { self.0.SetAppID(&HSTRING::from(app_id)) }.map_err(win32("SetAppID"))
    }
}

/// `IInternalCustomDestinationList` wrapper
#[derive(Debug)]
pub struct ComInternalList(IInternalCustomDestinationList);

impl InternalCustomDestinationList for ComInternalList {
    type Object = ComObject;

    fn set_application_id(&self, app_id: &str) -> ShellResult<()> {
        let app_id = HSTRING::from(app_id);
        check("SetApplicationID", unsafe {
            self.0.SetApplicationID(PCWSTR(app_id.as_ptr()))
        })
    }

    fn category_count(&self) -> ShellResult<u32> {
        let mut count = 0u32;
        check("GetCategoryCount", unsafe {
            self.0.GetCategoryCount(&raw mut count)
        })?;
        Ok(count)
    }

    fn category(&self, index: u32, flags: CategoryFlags) -> ShellResult<Category> {
        let mut raw = APPDESTCATEGORY::default();
        check("GetCategory", unsafe {
            self.0.GetCategory(index, flags as u32, &raw mut raw)
        })?;

        let kind = match raw.Type {
            APPDESTCATEGORY_CUSTOM => {
                // The shell allocates the name of custom categories
                let name = CoTaskString(unsafe { raw.Anonymous.Name });
                CategoryKind::Custom {
                    name: name.read("GetCategory")?,
                }
            }
            APPDESTCATEGORY_KNOWN => CategoryKind::Known {
                subtype: unsafe { raw.Anonymous.SubType },
            },
            APPDESTCATEGORY_TASKS => CategoryKind::Tasks,
            other => {
                warn!("Category {index} has unknown type {other}");
                return Err(ShellError::new("GetCategory", E_FAIL));
            }
        };

        Ok(Category {
            kind,
            count: raw.Count,
        })
    }

    fn enumerate_category_destinations(&self, index: u32) -> ShellResult<Vec<ComObject>> {
        let mut raw: *mut c_void = std::ptr::null_mut();
        check("EnumerateCategoryDestinations", unsafe {
            self.0
                .EnumerateCategoryDestinations(index, &IObjectCollection::IID, &raw mut raw)
        })?;
        let collection = take_collection("EnumerateCategoryDestinations", raw)?;
        collect_objects(&collection)
    }

    fn remove_destination(&self, destination: &DestinationOf<ComObject>) -> ShellResult<()> {
        check("RemoveDestination", unsafe {
            self.0.RemoveDestination(destination_ptr(destination))
        })
    }
}

/// A destination object as returned by the containers
#[derive(Debug, Clone)]
pub struct ComObject(IUnknown);

impl ShellObject for ComObject {
    type File = ComFileReference;
    type Shortcut = ComShortcutReference;

    fn as_file_reference(&self) -> Option<ComFileReference> {
        self.0.cast::<IShellItem>().ok().map(ComFileReference)
    }

    fn as_shortcut_reference(&self) -> Option<ComShortcutReference> {
        self.0.cast::<IShellLinkW>().ok().map(ComShortcutReference)
    }
}

/// `IShellItem` destination
#[derive(Debug, Clone)]
pub struct ComFileReference(IShellItem);

impl FileReference for ComFileReference {
    fn display_name(&self) -> ShellResult<String> {
        let name = unsafe { self.0.GetDisplayName(SIGDN_NORMALDISPLAY) }
            .map_err(win32("GetDisplayName"))?;
        CoTaskString(name).read("GetDisplayName")
    }

    fn compare_canonical(&self, other: &Self) -> ShellResult<i32> {
        unsafe { self.0.Compare(&other.0, SICHINT_CANONICAL_TEST_FILESYSPATH) }
            .map_err(win32("Compare"))
    }

    fn device_bitmap(&self, size: u32) -> Option<DeviceBitmap> {
        let factory = self.0.cast::<IShellItemImageFactory>().ok()?;
        let side = i32::try_from(size).ok()?;
        let hbitmap = match unsafe { factory.GetImage(SIZE { cx: side, cy: side }, SIIGBF_ICONONLY) } {
            Ok(hbitmap) => OwnedBitmap(hbitmap),
            Err(e) => {
                debug!("GetImage failed: {e}");
                return None;
            }
        };
        gdi::bitmap_bits(hbitmap.0)
    }
}

impl From<IShellItem> for ComFileReference {
    fn from(item: IShellItem) -> Self {
        Self(item)
    }
}

/// `IShellLinkW` destination
#[derive(Debug, Clone)]
pub struct ComShortcutReference(IShellLinkW);

impl ShortcutReference for ComShortcutReference {
    fn raw_target_path(&self) -> ShellResult<String> {
        let mut buffer = [0u16; MAX_PATH];
        unsafe { self.0.GetPath(&mut buffer, std::ptr::null_mut(), SLGP_RAWPATH) }
            .map_err(win32("GetPath"))?;
        Ok(wide_to_string(&buffer))
    }

    fn arguments(&self) -> ShellResult<String> {
        let mut buffer = [0u16; MAX_PATH];
        unsafe { self.0.GetArguments(&mut buffer) }.map_err(win32("GetArguments"))?;
        Ok(wide_to_string(&buffer))
    }

    fn title(&self) -> ShellResult<String> {
        let store = self
            .0
            .cast::<IPropertyStore>()
            .map_err(win32("QueryInterface"))?;
        let value = unsafe { store.GetValue(&PKEY_Title) }.map_err(win32("GetValue"))?;
        Ok(value.to_string())
    }

    fn icon_canvas(&self, size: u32) -> Option<DeviceBitmap> {
        let mut location = [0u16; MAX_PATH];
        let mut index = 0i32;
        if let Err(e) = unsafe { self.0.GetIconLocation(&mut location, &raw mut index) } {
            debug!("GetIconLocation failed: {e}");
            return None;
        }

        let extractor = self.0.cast::<IExtractIconW>().ok()?;
        let mut large = HICON::default();
        let mut small = HICON::default();
        let result = unsafe {
            extractor.Extract(
                PCWSTR(location.as_ptr()),
                index.cast_unsigned(),
                Some(&raw mut large),
                Some(&raw mut small),
                size | (SMALL_ICON_SIZE << 16),
            )
        };
        let large = OwnedIcon(large);
        let small = OwnedIcon(small);

        if let Err(e) = result {
            debug!("IExtractIconW::Extract failed: {e}");
            return None;
        }
        if large.0.is_invalid() || small.0.is_invalid() {
            debug!("IExtractIconW::Extract returned no icon");
            return None;
        }

        gdi::draw_icon_canvas(large.0, size)
    }
}
