//! Raw COM declarations for the undocumented jump list interfaces
//!
//! The shell does not publish these interfaces. Method order below is the vtable
//! slot order and must not change; only the slots the manager calls are used.

#![allow(non_snake_case)]
#![allow(non_camel_case_types)]
#![allow(missing_docs)]
#![expect(
    unsafe_code,
    reason = "COM interface declarations and a repr(C) union mirror the shell's binary layout"
)]

use std::ffi::c_void;
use windows::Win32::Foundation::HWND;
use windows_core::{BOOL, GUID, HRESULT, IUnknown, IUnknown_Vtbl, PCWSTR, PWSTR, interface};

/// `CLSID_AutomaticDestinationList`
pub const CLSID_AUTOMATIC_DESTINATION_LIST: GUID =
    GUID::from_u128(0xf0ae1542_f497_484b_a175_a20db09144ba);

/// `CLSID_DestinationList`, implementing both custom destination interfaces
pub const CLSID_DESTINATION_LIST: GUID = GUID::from_u128(0x77f10cf0_3db5_4966_b520_b7c54fd35ed6);

/// `SICHINT_CANONICAL | SICHINT_TEST_FILESYSPATH_IF_NOT_EQUAL`
pub const SICHINT_CANONICAL_TEST_FILESYSPATH: u32 = 0x3000_0000;

/// `SLGP_RAWPATH`
pub const SLGP_RAWPATH: u32 = 0x4;

/// Buffer length for paths and arguments read from shortcuts
pub const MAX_PATH: usize = 260;

#[interface("E9C5EF8D-FD41-4F72-BA87-EB03BAD5817C")]
pub unsafe trait IAutomaticDestinationList: IUnknown {
    fn Initialize(&self, app_id: PCWSTR, app_path: PCWSTR, custom_file: PCWSTR) -> HRESULT;
    fn HasList(&self, has_list: *mut BOOL) -> HRESULT;
    fn GetList(
        &self,
        list_type: u32,
        max_count: i32,
        flags: u32,
        riid: *const GUID,
        ppv: *mut *mut c_void,
    ) -> HRESULT;
    fn AddUsagePoint(&self, punk: *mut c_void) -> HRESULT;
    fn PinItem(&self, punk: *mut c_void, index: i32) -> HRESULT;
    fn GetPinIndex(&self, punk: *mut c_void, index: *mut i32) -> HRESULT;
    fn RemoveDestination(&self, punk: *mut c_void) -> HRESULT;
    fn SetUsageData(
        &self,
        punk: *mut c_void,
        access_count: *const f32,
        last_accessed_utc: *const i64,
    ) -> HRESULT;
    fn GetUsageData(
        &self,
        punk: *mut c_void,
        access_count: *mut f32,
        last_accessed_utc: *mut i64,
    ) -> HRESULT;
    fn ResolveDestination(
        &self,
        hwnd: HWND,
        flags: i32,
        psi: *mut c_void,
        riid: *const GUID,
        ppv: *mut *mut c_void,
    ) -> HRESULT;
    fn ClearList(&self, remove_pins: BOOL) -> HRESULT;
}

#[interface("507101CD-F6AD-46C8-8E20-EEB9E6BAC47F")]
pub unsafe trait IInternalCustomDestinationList: IUnknown {
    fn SetMinItems(&self, min_items: u32) -> HRESULT;
    fn SetApplicationID(&self, app_id: PCWSTR) -> HRESULT;
    fn GetSlotCount(&self, slot_count: *mut u32) -> HRESULT;
    fn GetCategoryCount(&self, category_count: *mut u32) -> HRESULT;
    fn GetCategory(&self, index: u32, flags: u32, category: *mut APPDESTCATEGORY) -> HRESULT;
    fn DeleteCategory(&self, index: u32, flags: i32) -> HRESULT;
    fn EnumerateCategoryDestinations(
        &self,
        index: u32,
        riid: *const GUID,
        ppv: *mut *mut c_void,
    ) -> HRESULT;
    fn RemoveDestination(&self, punk: *mut c_void) -> HRESULT;
    fn HasListEx(&self, a1: *mut i32, a2: *mut i32) -> HRESULT;
    fn ClearRemovedDestinations(&self) -> HRESULT;
}

/// `APPDESTCATEGORYTYPE`
pub const APPDESTCATEGORY_CUSTOM: u32 = 0;
pub const APPDESTCATEGORY_KNOWN: u32 = 1;
pub const APPDESTCATEGORY_TASKS: u32 = 2;

#[repr(C)]
#[derive(Clone, Copy)]
pub union APPDESTCATEGORY_0 {
    pub Name: PWSTR,
    pub SubType: i32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct APPDESTCATEGORY {
    pub Type: u32,
    pub Anonymous: APPDESTCATEGORY_0,
    pub Count: i32,
    pub Padding: [i32; 10],
}

impl Default for APPDESTCATEGORY {
    fn default() -> Self {
        Self {
            Type: APPDESTCATEGORY_CUSTOM,
            Anonymous: APPDESTCATEGORY_0 {
                Name: PWSTR::null(),
            },
            Count: 0,
            Padding: [0; 10],
        }
    }
}
