//! Jump list items and groups

use crate::shell::{Destination, DestinationOf, ShellObject};
use std::fmt;

/// Which part of the jump list an item came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemCategory {
    /// Pinned, recent or frequent list
    Automatic,
    /// A developer-declared custom category
    Custom,
    /// The tasks category
    Task,
}

/// Native shape of an item's destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Direct reference to a file or shell item
    FileReference,
    /// Reference to a shortcut
    ShortcutReference,
}

impl<F, L> Destination<F, L> {
    /// Native shape of this destination
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::FileReference(_) => ItemKind::FileReference,
            Self::ShortcutReference(_) => ItemKind::ShortcutReference,
        }
    }
}

/// Command offered for an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemAction {
    /// Launch the destination
    Open,
    /// Show the file in its folder
    OpenFileLocation,
    /// Pin to the list
    Pin,
    /// Unpin from the list
    Unpin,
    /// Remove from the list
    Remove,
    /// Show the shell property sheet
    Properties,
}

/// One entry of a jump list
///
/// The item owns one reference to its native object, released when the item is
/// dropped. Items are rebuilt on every enumeration and never cloned.
pub struct JumpListItem<O: ShellObject> {
    category: ItemCategory,
    destination: DestinationOf<O>,
    text: String,
    icon: Option<Vec<u8>>,
    is_pinned: bool,
}

impl<O: ShellObject> JumpListItem<O> {
    pub(crate) fn new(
        category: ItemCategory,
        destination: DestinationOf<O>,
        text: String,
        icon: Option<Vec<u8>>,
        is_pinned: bool,
    ) -> Self {
        Self {
            category,
            destination,
            text,
            icon,
            is_pinned,
        }
    }

    /// Where the item came from
    pub const fn category(&self) -> ItemCategory {
        self.category
    }

    /// Native shape of the destination
    pub const fn kind(&self) -> ItemKind {
        self.destination.kind()
    }

    /// The native destination
    pub const fn destination(&self) -> &DestinationOf<O> {
        &self.destination
    }

    /// Display name of a file reference, or title of a shortcut
    pub fn text(&self) -> &str {
        &self.text
    }

    /// PNG (or other encoded) thumbnail bytes
    pub fn icon(&self) -> Option<&[u8]> {
        self.icon.as_deref()
    }

    /// Whether the item was found in the pinned list
    pub const fn is_pinned(&self) -> bool {
        self.is_pinned
    }

    pub(crate) const fn set_pinned(&mut self, pinned: bool) {
        self.is_pinned = pinned;
    }

    /// Commands that apply to this item, in menu order
    pub fn available_actions(&self) -> Vec<ItemAction> {
        let mut actions = vec![ItemAction::Open];
        if self.category == ItemCategory::Task {
            return actions;
        }

        if self.category == ItemCategory::Automatic && self.kind() == ItemKind::FileReference {
            actions.push(ItemAction::OpenFileLocation);
        }

        if self.is_pinned {
            actions.push(ItemAction::Unpin);
        } else {
            actions.extend([ItemAction::Pin, ItemAction::Remove]);
        }

        if self.category == ItemCategory::Automatic {
            actions.push(ItemAction::Properties);
        }
        actions
    }
}

impl<O: ShellObject> fmt::Debug for JumpListItem<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JumpListItem")
            .field("category", &self.category)
            .field("kind", &self.kind())
            .field("text", &self.text)
            .field("icon_bytes", &self.icon.as_ref().map(Vec::len))
            .field("is_pinned", &self.is_pinned)
            .finish_non_exhaustive()
    }
}

/// Items sharing a heading, in native enumeration order
pub struct JumpListGroup<O: ShellObject> {
    /// Group heading ("Pinned", "Recent", "Frequent", "Tasks" or a category name)
    pub key: String,
    /// Items of the group
    pub items: Vec<JumpListItem<O>>,
}

impl<O: ShellObject> JumpListGroup<O> {
    /// An empty group
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            items: Vec::new(),
        }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the group has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<O: ShellObject> fmt::Debug for JumpListGroup<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JumpListGroup")
            .field("key", &self.key)
            .field("items", &self.items)
            .finish()
    }
}
