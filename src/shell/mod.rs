//! Typed access to the shell's jump list containers
//!
//! The shell exposes jump lists through three COM objects:
//!
//! - **Automatic Destinations**: the pinned, recent and frequent lists the shell
//!   curates from actual usage
//! - **Custom Destinations**: the public interface applications use to declare
//!   their own categories and tasks
//! - **Internal Custom Destinations**: an undocumented interface on the same object
//!   that enumerates categories and their destinations
//!
//! This module describes the subset of those contracts the manager uses as traits,
//! so the manager never touches raw vtables. Two backends implement them:
//!
//! - [`windows`] (Windows only): COM bindings via the `windows` crate
//! - [`memory`]: an in-process shell store with the same observable behaviour,
//!   used by tests and on hosts without a Windows shell
//!
//! Every native reference is an owned Rust value. Dropping it releases the
//! reference exactly once.

pub mod memory;

#[cfg(windows)]
pub mod com;

#[cfg(windows)]
pub mod windows;

use crate::error::ShellError;
use crate::thumbnail::DeviceBitmap;

pub use memory::MemoryShell;

#[cfg(windows)]
pub use self::windows::ComShellProvider;

/// Result of a single shell call
pub type ShellResult<T> = std::result::Result<T, ShellError>;

/// Lists maintained by the Automatic Destinations container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DestinationListKind {
    /// Items the user pinned
    Pinned = 0,
    /// Most recently used items, newest first
    Recent = 1,
    /// Most frequently used items
    Frequent = 2,
}

impl DestinationListKind {
    /// Label used for the group holding this list
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pinned => "Pinned",
            Self::Recent => "Recent",
            Self::Frequent => "Frequent",
        }
    }
}

/// Flags accepted by `GetList`
///
/// Only the value the manager passes is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum GetListFlags {
    /// Return every destination
    #[default]
    None = 0,
}

/// Position argument of the pin primitive
///
/// The native call takes a raw index where `-1` appends to the pinned list and `-2`
/// removes from it. Other values are not part of the contract and cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinIndex {
    /// Append to the end of the pinned list (`-1`)
    Append,
    /// Remove from the pinned list (`-2`)
    Unpin,
}

impl PinIndex {
    /// Raw index passed to the native call
    pub const fn raw(self) -> i32 {
        match self {
            Self::Append => -1,
            Self::Unpin => -2,
        }
    }
}

/// Flags accepted by `GetCategory`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum CategoryFlags {
    /// The only value the shell is known to accept
    #[default]
    Default = 1,
}

/// Kind of a custom destinations category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryKind {
    /// Developer-declared category; the name may be an indirect string (`@...`)
    Custom {
        /// Raw category name as stored by the shell
        name: String,
    },
    /// Reserved category (recent/frequent placeholders)
    Known {
        /// Known category subtype
        subtype: i32,
    },
    /// Static task entries
    Tasks,
}

/// A category as reported by `GetCategory`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category kind, with its name or subtype
    pub kind: CategoryKind,
    /// Number of destinations the shell reports for the category
    pub count: i32,
}

/// Native object that may be a file reference or a shortcut reference
pub trait ShellObject {
    /// File reference capability
    type File: FileReference;
    /// Shortcut reference capability
    type Shortcut: ShortcutReference;

    /// Query the object as a file reference
    fn as_file_reference(&self) -> Option<Self::File>;

    /// Query the object as a shortcut reference
    fn as_shortcut_reference(&self) -> Option<Self::Shortcut>;
}

/// A direct reference to a file or shell item
pub trait FileReference {
    /// Normal display name of the item
    fn display_name(&self) -> ShellResult<String>;

    /// Canonical comparison, falling back to file system paths when not already equal
    ///
    /// Returns the ordering reported by the shell; `0` means same item.
    fn compare_canonical(&self, other: &Self) -> ShellResult<i32>;

    /// Device bitmap of the item's image at the given logical size
    ///
    /// Rows are returned in the order the device stores them.
    fn device_bitmap(&self, size: u32) -> Option<DeviceBitmap>;
}

/// A reference to a shortcut (target path, arguments and title)
pub trait ShortcutReference {
    /// Target path without environment variable expansion
    fn raw_target_path(&self) -> ShellResult<String>;

    /// Command line arguments
    fn arguments(&self) -> ShellResult<String>;

    /// Title property
    fn title(&self) -> ShellResult<String>;

    /// The shortcut's large icon drawn on a transparent square canvas
    ///
    /// Rows are top-down.
    fn icon_canvas(&self, size: u32) -> Option<DeviceBitmap>;
}

/// Closed variant over the two object shapes a destination can take
#[derive(Debug)]
pub enum Destination<F, L> {
    /// Direct reference to a file or shell item
    FileReference(F),
    /// Reference to a shortcut
    ShortcutReference(L),
}

/// Destination type produced by a shell object type
pub type DestinationOf<O> = Destination<<O as ShellObject>::File, <O as ShellObject>::Shortcut>;

/// Classify a native object, trying the file reference capability first
pub fn classify<O: ShellObject>(object: &O) -> Option<DestinationOf<O>> {
    if let Some(file) = object.as_file_reference() {
        return Some(Destination::FileReference(file));
    }
    object
        .as_shortcut_reference()
        .map(Destination::ShortcutReference)
}

/// The Automatic Destinations container
pub trait AutomaticDestinationList {
    /// Native objects stored in the lists
    type Object: ShellObject;

    /// Bind the container to an application identifier
    fn initialize(
        &self,
        app_id: &str,
        app_path: Option<&str>,
        custom_file: Option<&str>,
    ) -> ShellResult<()>;

    /// Whether any automatic destinations exist for the application
    fn has_list(&self) -> ShellResult<bool>;

    /// Fetch up to `max_count` objects of a list
    fn get_list(
        &self,
        kind: DestinationListKind,
        max_count: u32,
        flags: GetListFlags,
    ) -> ShellResult<Vec<Self::Object>>;

    /// Pin or unpin a destination
    fn pin_or_unpin(&self, destination: &DestinationOf<Self::Object>, index: PinIndex)
    -> ShellResult<()>;

    /// Remove a destination from every automatic list
    fn remove_destination(&self, destination: &DestinationOf<Self::Object>) -> ShellResult<()>;

    /// Clear the recent and frequent lists, and the pinned list when `remove_pins` is set
    fn clear_list(&self, remove_pins: bool) -> ShellResult<()>;
}

/// The public Custom Destinations interface
pub trait CustomDestinationList {
    /// Bind the container to an application identifier
    fn set_app_id(&self, app_id: &str) -> ShellResult<()>;
}

/// The internal Custom Destinations interface
pub trait InternalCustomDestinationList {
    /// Native objects stored in the categories
    type Object: ShellObject;

    /// Bind the container to an application identifier
    fn set_application_id(&self, app_id: &str) -> ShellResult<()>;

    /// Number of categories, including Known and Tasks categories
    fn category_count(&self) -> ShellResult<u32>;

    /// Describe the category at `index`
    fn category(&self, index: u32, flags: CategoryFlags) -> ShellResult<Category>;

    /// Fetch the destinations of the category at `index`
    fn enumerate_category_destinations(&self, index: u32) -> ShellResult<Vec<Self::Object>>;

    /// Remove a destination from the custom categories
    fn remove_destination(&self, destination: &DestinationOf<Self::Object>) -> ShellResult<()>;
}

/// Activates the three containers and resolves shell strings
pub trait ShellProvider {
    /// Native object type shared by the containers
    type Object: ShellObject;
    /// Automatic Destinations container
    type AutomaticList: AutomaticDestinationList<Object = Self::Object>;
    /// Public Custom Destinations container
    type CustomList: CustomDestinationList;
    /// Internal Custom Destinations container
    type InternalList: InternalCustomDestinationList<Object = Self::Object>;

    /// Instantiate the Automatic Destinations container
    fn create_automatic_list(&self) -> ShellResult<Self::AutomaticList>;

    /// Instantiate the public Custom Destinations container
    fn create_custom_list(&self) -> ShellResult<Self::CustomList>;

    /// Instantiate the internal Custom Destinations container
    fn create_internal_list(&self) -> ShellResult<Self::InternalList>;

    /// Resolve an indirect string (`@dll,-id` or `@{package?ms-resource://...}`)
    ///
    /// Strings that do not start with `@` are returned unchanged.
    fn load_indirect_string(&self, source: &str) -> ShellResult<String>;
}
