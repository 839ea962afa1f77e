//! In-process shell store
//!
//! Implements the container traits over plain Rust data so the manager can be
//! exercised without a Windows shell. The store models the behaviour the manager
//! relies on:
//!
//! - Per-application pinned, recent and frequent lists, keyed case-insensitively
//! - Custom, Known and Tasks categories, with indirect category names
//! - Pin append and unpin sentinels, destination removal, clearing
//! - Failure injection at every call the manager makes
//! - Live-handle accounting: every container and object handed out counts as one
//!   native reference until it is dropped
//! - A count of thumbnail requests made through handed-out references
//!
//! Cloning a [`MemoryShell`] shares the same store.

use super::{
    AutomaticDestinationList, Category, CategoryFlags, CategoryKind, CustomDestinationList,
    Destination, DestinationListKind, DestinationOf, FileReference, GetListFlags,
    InternalCustomDestinationList, PinIndex, ShellObject, ShellProvider, ShellResult,
    ShortcutReference,
};
use crate::error::{ContainerKind, E_FAIL, E_INVALIDARG, E_NOT_FOUND, ShellError};
use crate::thumbnail::DeviceBitmap;
use parking_lot::Mutex;
use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// A file or shell item stored in a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full path, compared case-insensitively
    pub path: String,
    /// Display name; `None` makes name resolution fail
    pub display_name: Option<String>,
    /// Image returned by the image factory, rows in device order
    pub image: Option<DeviceBitmap>,
}

impl FileEntry {
    /// A file whose display name is the last path component
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let display_name = path
            .rsplit(['\\', '/'])
            .next()
            .map(ToString::to_string);
        Self {
            path,
            display_name,
            image: None,
        }
    }

    /// Override the display name
    #[must_use]
    pub fn with_display_name(mut self, display_name: Option<&str>) -> Self {
        self.display_name = display_name.map(ToString::to_string);
        self
    }

    /// Attach an image
    #[must_use]
    pub fn with_image(mut self, image: DeviceBitmap) -> Self {
        self.image = Some(image);
        self
    }

    fn same_item(&self, other: &Self) -> bool {
        self.path.eq_ignore_ascii_case(&other.path)
    }
}

/// A shortcut stored in a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutEntry {
    /// Unexpanded target path
    pub target_path: String,
    /// Command line arguments
    pub arguments: String,
    /// Title property; `None` makes the property read fail
    pub title: Option<String>,
    /// Icon drawn on a canvas, rows top-down
    pub icon: Option<DeviceBitmap>,
}

impl ShortcutEntry {
    /// A shortcut with a title and no icon
    pub fn new(
        target_path: impl Into<String>,
        arguments: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            target_path: target_path.into(),
            arguments: arguments.into(),
            title: Some(title.into()),
            icon: None,
        }
    }

    /// Drop the title property
    #[must_use]
    pub fn without_title(mut self) -> Self {
        self.title = None;
        self
    }

    /// Attach an icon
    #[must_use]
    pub fn with_icon(mut self, icon: DeviceBitmap) -> Self {
        self.icon = Some(icon);
        self
    }

    fn same_item(&self, other: &Self) -> bool {
        self.target_path == other.target_path
            && self.arguments == other.arguments
            && self.title == other.title
    }
}

/// An object stored in a list or category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredObject {
    /// Answers the file reference query
    File(FileEntry),
    /// Answers the shortcut reference query
    Shortcut(ShortcutEntry),
    /// Answers neither query
    Opaque,
}

impl StoredObject {
    fn same_item(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::File(a), Self::File(b)) => a.same_item(b),
            (Self::Shortcut(a), Self::Shortcut(b)) => a.same_item(b),
            _ => false,
        }
    }

    fn from_destination(destination: &DestinationOf<MemoryObject>) -> Self {
        match destination {
            Destination::FileReference(file) => Self::File(file.entry.clone()),
            Destination::ShortcutReference(link) => Self::Shortcut(link.entry.clone()),
        }
    }
}

impl From<FileEntry> for StoredObject {
    fn from(entry: FileEntry) -> Self {
        Self::File(entry)
    }
}

impl From<ShortcutEntry> for StoredObject {
    fn from(entry: ShortcutEntry) -> Self {
        Self::Shortcut(entry)
    }
}

/// A custom destinations category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCategory {
    /// Category kind
    pub kind: CategoryKind,
    /// Destinations in enumeration order
    pub destinations: Vec<StoredObject>,
    /// Make `EnumerateCategoryDestinations` fail for this category
    pub fail_enumeration: bool,
}

impl StoredCategory {
    /// A developer-declared category
    pub fn custom(name: impl Into<String>, destinations: Vec<StoredObject>) -> Self {
        Self {
            kind: CategoryKind::Custom { name: name.into() },
            destinations,
            fail_enumeration: false,
        }
    }

    /// A reserved category
    pub fn known(subtype: i32) -> Self {
        Self {
            kind: CategoryKind::Known { subtype },
            destinations: Vec::new(),
            fail_enumeration: false,
        }
    }

    /// The tasks category
    pub fn tasks(destinations: Vec<StoredObject>) -> Self {
        Self {
            kind: CategoryKind::Tasks,
            destinations,
            fail_enumeration: false,
        }
    }

    /// Make enumeration of this category fail
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }
}

/// Everything the shell stores for one application
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppDestinations {
    /// Pinned list
    pub pinned: Vec<StoredObject>,
    /// Recent list, newest first
    pub recent: Vec<StoredObject>,
    /// Frequent list
    pub frequent: Vec<StoredObject>,
    /// Custom destinations categories
    pub categories: Vec<StoredCategory>,
}

impl AppDestinations {
    fn list(&self, kind: DestinationListKind) -> &[StoredObject] {
        match kind {
            DestinationListKind::Pinned => &self.pinned,
            DestinationListKind::Recent => &self.recent,
            DestinationListKind::Frequent => &self.frequent,
        }
    }

    fn has_automatic(&self) -> bool {
        !(self.pinned.is_empty() && self.recent.is_empty() && self.frequent.is_empty())
    }
}

/// A call that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    /// Container activation
    Create(ContainerKind),
    /// Binding a container to an application identifier
    Initialize(ContainerKind),
    /// `HasList`
    HasList,
    /// `GetList` for one list
    GetList(DestinationListKind),
    /// `GetCategoryCount`
    CategoryCount,
    /// `GetCategory` for one index
    Category(u32),
    /// `PinItem`
    PinItem,
    /// `RemoveDestination` on either container
    RemoveDestination,
    /// `ClearList`
    ClearList,
    /// `SHLoadIndirectString`
    LoadIndirectString,
}

#[derive(Debug, Default)]
struct StoreState {
    apps: HashMap<String, AppDestinations>,
    indirect_strings: HashMap<String, String>,
    failures: HashSet<FailurePoint>,
    pin_requests: Vec<PinIndex>,
}

impl StoreState {
    fn check(&self, point: FailurePoint, operation: &'static str) -> ShellResult<()> {
        if self.failures.contains(&point) {
            debug!("Injected failure for {operation}");
            Err(ShellError::new(operation, E_FAIL))
        } else {
            Ok(())
        }
    }
}

fn app_key(app_id: &str) -> String {
    app_id.to_uppercase()
}

/// Observable activity of a store's native references
#[derive(Debug, Default)]
struct Counters {
    live: AtomicUsize,
    image_requests: AtomicUsize,
}

/// One native reference, counted while alive
#[derive(Debug)]
struct HandleToken(Arc<Counters>);

impl HandleToken {
    fn issue(counters: &Arc<Counters>) -> Self {
        counters.live.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counters))
    }

    fn record_image_request(&self) {
        self.0.image_requests.fetch_add(1, Ordering::SeqCst);
    }
}

impl Clone for HandleToken {
    fn clone(&self) -> Self {
        Self::issue(&self.0)
    }
}

impl Drop for HandleToken {
    fn drop(&mut self) {
        self.0.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Shared in-process shell store
#[derive(Debug, Clone, Default)]
pub struct MemoryShell {
    state: Arc<Mutex<StoreState>>,
    counters: Arc<Counters>,
}

impl MemoryShell {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything stored for an application
    pub fn set_destinations(&self, app_id: &str, destinations: AppDestinations) {
        self.state.lock().apps.insert(app_key(app_id), destinations);
    }

    /// Snapshot of what is stored for an application
    pub fn destinations(&self, app_id: &str) -> AppDestinations {
        self.state
            .lock()
            .apps
            .get(&app_key(app_id))
            .cloned()
            .unwrap_or_default()
    }

    /// Register the resolution of an indirect string
    pub fn register_indirect_string(&self, source: impl Into<String>, resolved: impl Into<String>) {
        self.state
            .lock()
            .indirect_strings
            .insert(source.into(), resolved.into());
    }

    /// Make a call fail until [`MemoryShell::clear_failures`]
    pub fn fail(&self, point: FailurePoint) {
        self.state.lock().failures.insert(point);
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) {
        self.state.lock().failures.clear();
    }

    /// Raw indices passed to `PinItem`, in call order
    pub fn pin_requests(&self) -> Vec<i32> {
        self.state
            .lock()
            .pin_requests
            .iter()
            .map(|index| index.raw())
            .collect()
    }

    /// Number of containers and objects currently alive
    pub fn live_handles(&self) -> usize {
        self.counters.live.load(Ordering::SeqCst)
    }

    /// Number of thumbnail requests (file images and shortcut icons) made so far
    pub fn image_requests(&self) -> usize {
        self.counters.image_requests.load(Ordering::SeqCst)
    }

    /// Hand out a standalone object, counted like any listed object
    pub fn object(&self, stored: impl Into<StoredObject>) -> MemoryObject {
        MemoryObject {
            object: stored.into(),
            handle: self.token(),
        }
    }

    fn token(&self) -> HandleToken {
        HandleToken::issue(&self.counters)
    }

    fn objects(&self, stored: &[StoredObject], max_count: usize) -> Vec<MemoryObject> {
        stored
            .iter()
            .take(max_count)
            .map(|object| MemoryObject {
                object: object.clone(),
                handle: self.token(),
            })
            .collect()
    }
}

impl ShellProvider for MemoryShell {
    type Object = MemoryObject;
    type AutomaticList = MemoryAutomaticList;
    type CustomList = MemoryCustomList;
    type InternalList = MemoryInternalList;

    fn create_automatic_list(&self) -> ShellResult<MemoryAutomaticList> {
        self.state.lock().check(
            FailurePoint::Create(ContainerKind::AutomaticDestinations),
            "CoCreateInstance",
        )?;
        Ok(MemoryAutomaticList {
            binding: Binding::new(self.clone()),
            _handle: self.token(),
        })
    }

    fn create_custom_list(&self) -> ShellResult<MemoryCustomList> {
        self.state.lock().check(
            FailurePoint::Create(ContainerKind::CustomDestinations),
            "CoCreateInstance",
        )?;
        Ok(MemoryCustomList {
            binding: Binding::new(self.clone()),
            _handle: self.token(),
        })
    }

    fn create_internal_list(&self) -> ShellResult<MemoryInternalList> {
        self.state.lock().check(
            FailurePoint::Create(ContainerKind::InternalCustomDestinations),
            "CoCreateInstance",
        )?;
        Ok(MemoryInternalList {
            binding: Binding::new(self.clone()),
            _handle: self.token(),
        })
    }

    fn load_indirect_string(&self, source: &str) -> ShellResult<String> {
        let state = self.state.lock();
        state.check(FailurePoint::LoadIndirectString, "SHLoadIndirectString")?;
        if !source.starts_with('@') {
            return Ok(source.to_string());
        }
        state
            .indirect_strings
            .get(source)
            .cloned()
            .ok_or(ShellError::new("SHLoadIndirectString", E_NOT_FOUND))
    }
}

/// Application binding shared by the three containers
#[derive(Debug)]
struct Binding {
    shell: MemoryShell,
    app_key: OnceCell<String>,
}

impl Binding {
    fn new(shell: MemoryShell) -> Self {
        Self {
            shell,
            app_key: OnceCell::new(),
        }
    }

    fn bind(&self, container: ContainerKind, app_id: &str, operation: &'static str) -> ShellResult<()> {
        self.shell
            .state
            .lock()
            .check(FailurePoint::Initialize(container), operation)?;
        if app_id.is_empty() {
            return Err(ShellError::new(operation, E_INVALIDARG));
        }
        self.app_key
            .set(app_key(app_id))
            .map_err(|_| ShellError::new(operation, E_FAIL))
    }

    fn key(&self, operation: &'static str) -> ShellResult<&str> {
        self.app_key
            .get()
            .map(String::as_str)
            .ok_or(ShellError::new(operation, E_FAIL))
    }
}

/// In-memory Automatic Destinations container
#[derive(Debug)]
pub struct MemoryAutomaticList {
    binding: Binding,
    _handle: HandleToken,
}

impl AutomaticDestinationList for MemoryAutomaticList {
    type Object = MemoryObject;

    fn initialize(
        &self,
        app_id: &str,
        _app_path: Option<&str>,
        _custom_file: Option<&str>,
    ) -> ShellResult<()> {
        self.binding
            .bind(ContainerKind::AutomaticDestinations, app_id, "Initialize")
    }

    fn has_list(&self) -> ShellResult<bool> {
        let key = self.binding.key("HasList")?;
        let state = self.binding.shell.state.lock();
        state.check(FailurePoint::HasList, "HasList")?;
        Ok(state.apps.get(key).is_some_and(AppDestinations::has_automatic))
    }

    fn get_list(
        &self,
        kind: DestinationListKind,
        max_count: u32,
        _flags: GetListFlags,
    ) -> ShellResult<Vec<MemoryObject>> {
        let key = self.binding.key("GetList")?;
        let state = self.binding.shell.state.lock();
        state.check(FailurePoint::GetList(kind), "GetList")?;
        let Some(app) = state.apps.get(key) else {
            return Ok(Vec::new());
        };
        Ok(self.binding.shell.objects(app.list(kind), max_count as usize))
    }

    fn pin_or_unpin(&self, destination: &DestinationOf<MemoryObject>, index: PinIndex) -> ShellResult<()> {
        let key = self.binding.key("PinItem")?;
        let mut state = self.binding.shell.state.lock();
        state.check(FailurePoint::PinItem, "PinItem")?;
        state.pin_requests.push(index);

        let target = StoredObject::from_destination(destination);
        let app = state.apps.entry(key.to_string()).or_default();
        match index {
            PinIndex::Append => {
                if !app.pinned.iter().any(|pinned| pinned.same_item(&target)) {
                    app.pinned.push(target);
                }
                Ok(())
            }
            PinIndex::Unpin => {
                let before = app.pinned.len();
                app.pinned.retain(|pinned| !pinned.same_item(&target));
                if app.pinned.len() == before {
                    Err(ShellError::new("PinItem", E_NOT_FOUND))
                } else {
                    Ok(())
                }
            }
        }
    }

    fn remove_destination(&self, destination: &DestinationOf<MemoryObject>) -> ShellResult<()> {
        let key = self.binding.key("RemoveDestination")?;
        let mut state = self.binding.shell.state.lock();
        state.check(FailurePoint::RemoveDestination, "RemoveDestination")?;

        let target = StoredObject::from_destination(destination);
        let Some(app) = state.apps.get_mut(key) else {
            return Err(ShellError::new("RemoveDestination", E_NOT_FOUND));
        };
        let before = app.pinned.len() + app.recent.len() + app.frequent.len();
        for list in [&mut app.pinned, &mut app.recent, &mut app.frequent] {
            list.retain(|object| !object.same_item(&target));
        }
        if app.pinned.len() + app.recent.len() + app.frequent.len() == before {
            return Err(ShellError::new("RemoveDestination", E_NOT_FOUND));
        }
        Ok(())
    }

    fn clear_list(&self, remove_pins: bool) -> ShellResult<()> {
        let key = self.binding.key("ClearList")?;
        let mut state = self.binding.shell.state.lock();
        state.check(FailurePoint::ClearList, "ClearList")?;
        if let Some(app) = state.apps.get_mut(key) {
            app.recent.clear();
            app.frequent.clear();
            if remove_pins {
                app.pinned.clear();
            }
        }
        Ok(())
    }
}

/// In-memory public Custom Destinations container
#[derive(Debug)]
pub struct MemoryCustomList {
    binding: Binding,
    _handle: HandleToken,
}

impl CustomDestinationList for MemoryCustomList {
    fn set_app_id(&self, app_id: &str) -> ShellResult<()> {
        self.binding
            .bind(ContainerKind::CustomDestinations, app_id, "SetAppID")
    }
}

/// In-memory internal Custom Destinations container
#[derive(Debug)]
pub struct MemoryInternalList {
    binding: Binding,
    _handle: HandleToken,
}

impl MemoryInternalList {
    fn with_category<T>(
        &self,
        index: u32,
        operation: &'static str,
        read: impl FnOnce(&StoredCategory) -> ShellResult<T>,
    ) -> ShellResult<T> {
        let key = self.binding.key(operation)?;
        let state = self.binding.shell.state.lock();
        state
            .apps
            .get(key)
            .and_then(|app| app.categories.get(index as usize))
            .ok_or(ShellError::new(operation, E_INVALIDARG))
            .and_then(read)
    }
}

impl InternalCustomDestinationList for MemoryInternalList {
    type Object = MemoryObject;

    fn set_application_id(&self, app_id: &str) -> ShellResult<()> {
        self.binding.bind(
            ContainerKind::InternalCustomDestinations,
            app_id,
            "SetApplicationID",
        )
    }

    fn category_count(&self) -> ShellResult<u32> {
        let key = self.binding.key("GetCategoryCount")?;
        let state = self.binding.shell.state.lock();
        state.check(FailurePoint::CategoryCount, "GetCategoryCount")?;
        let count = state.apps.get(key).map_or(0, |app| app.categories.len());
        u32::try_from(count).map_err(|_| ShellError::new("GetCategoryCount", E_FAIL))
    }

    fn category(&self, index: u32, _flags: CategoryFlags) -> ShellResult<Category> {
        self.binding
            .shell
            .state
            .lock()
            .check(FailurePoint::Category(index), "GetCategory")?;
        self.with_category(index, "GetCategory", |category| {
            Ok(Category {
                kind: category.kind.clone(),
                count: i32::try_from(category.destinations.len()).unwrap_or(i32::MAX),
            })
        })
    }

    fn enumerate_category_destinations(&self, index: u32) -> ShellResult<Vec<MemoryObject>> {
        let stored = self.with_category(index, "EnumerateCategoryDestinations", |category| {
            if category.fail_enumeration {
                Err(ShellError::new("EnumerateCategoryDestinations", E_FAIL))
            } else {
                Ok(category.destinations.clone())
            }
        })?;
        Ok(self.binding.shell.objects(&stored, usize::MAX))
    }

    fn remove_destination(&self, destination: &DestinationOf<MemoryObject>) -> ShellResult<()> {
        let key = self.binding.key("RemoveDestination")?;
        let mut state = self.binding.shell.state.lock();
        state.check(FailurePoint::RemoveDestination, "RemoveDestination")?;

        let target = StoredObject::from_destination(destination);
        let mut removed = false;
        if let Some(app) = state.apps.get_mut(key) {
            for category in &mut app.categories {
                if !matches!(category.kind, CategoryKind::Custom { .. }) {
                    continue;
                }
                let before = category.destinations.len();
                category
                    .destinations
                    .retain(|object| !object.same_item(&target));
                removed |= category.destinations.len() != before;
            }
        }
        if removed {
            Ok(())
        } else {
            Err(ShellError::new("RemoveDestination", E_NOT_FOUND))
        }
    }
}

/// Object handed out by an in-memory container
#[derive(Debug, Clone)]
pub struct MemoryObject {
    object: StoredObject,
    handle: HandleToken,
}

impl MemoryObject {
    /// The stored object this handle refers to
    pub fn stored(&self) -> &StoredObject {
        &self.object
    }
}

impl ShellObject for MemoryObject {
    type File = MemoryFile;
    type Shortcut = MemoryShortcut;

    fn as_file_reference(&self) -> Option<MemoryFile> {
        match &self.object {
            StoredObject::File(entry) => Some(MemoryFile {
                entry: entry.clone(),
                handle: self.handle.clone(),
            }),
            _ => None,
        }
    }

    fn as_shortcut_reference(&self) -> Option<MemoryShortcut> {
        match &self.object {
            StoredObject::Shortcut(entry) => Some(MemoryShortcut {
                entry: entry.clone(),
                handle: self.handle.clone(),
            }),
            _ => None,
        }
    }
}

/// File reference capability of an in-memory object
#[derive(Debug, Clone)]
pub struct MemoryFile {
    entry: FileEntry,
    handle: HandleToken,
}

impl MemoryFile {
    /// Stored entry
    pub fn entry(&self) -> &FileEntry {
        &self.entry
    }
}

impl FileReference for MemoryFile {
    fn display_name(&self) -> ShellResult<String> {
        self.entry
            .display_name
            .clone()
            .ok_or(ShellError::new("GetDisplayName", E_FAIL))
    }

    fn compare_canonical(&self, other: &Self) -> ShellResult<i32> {
        let ordering = self
            .entry
            .path
            .to_ascii_lowercase()
            .cmp(&other.entry.path.to_ascii_lowercase());
        Ok(ordering as i32)
    }

    fn device_bitmap(&self, _size: u32) -> Option<DeviceBitmap> {
        self.handle.record_image_request();
        self.entry.image.clone()
    }
}

/// Shortcut reference capability of an in-memory object
#[derive(Debug, Clone)]
pub struct MemoryShortcut {
    entry: ShortcutEntry,
    handle: HandleToken,
}

impl MemoryShortcut {
    /// Stored entry
    pub fn entry(&self) -> &ShortcutEntry {
        &self.entry
    }
}

impl ShortcutReference for MemoryShortcut {
    fn raw_target_path(&self) -> ShellResult<String> {
        Ok(self.entry.target_path.clone())
    }

    fn arguments(&self) -> ShellResult<String> {
        Ok(self.entry.arguments.clone())
    }

    fn title(&self) -> ShellResult<String> {
        self.entry
            .title
            .clone()
            .ok_or(ShellError::new("GetValue", E_FAIL))
    }

    fn icon_canvas(&self, _size: u32) -> Option<DeviceBitmap> {
        self.handle.record_image_request();
        self.entry.icon.clone()
    }
}
