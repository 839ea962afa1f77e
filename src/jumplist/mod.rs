//! Jump list enumeration and mutation
//!
//! [`JumpList`] is the session type: it owns the shell containers of one
//! application and produces [`JumpListGroup`]s of [`JumpListItem`]s. Items carry
//! their thumbnail, their pinned state and the native reference mutations need.
//!
//! ```no_run
//! # #[cfg(windows)]
//! # fn main() -> jumplist_manager::Result<()> {
//! use jumplist_manager::jumplist::{DEFAULT_ENUMERATION_COUNT, JumpList};
//!
//! let mut list = JumpList::open("Microsoft.Windows.Explorer")?;
//! if let Some(mut recent) = list.enumerate_recent_items(DEFAULT_ENUMERATION_COUNT) {
//!     if let Some(item) = recent.items.first_mut() {
//!         list.pin_item(item);
//!     }
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(windows))]
//! # fn main() {}
//! ```

pub mod identity;
pub mod item;
pub mod manager;

pub use identity::is_same_destination;
pub use item::{ItemAction, ItemCategory, ItemKind, JumpListGroup, JumpListItem};
pub use manager::{
    DEFAULT_ENUMERATION_COUNT, DEFAULT_PINNED_LOOKUP_LIMIT, GroupOf, ItemOf, JumpList,
    TASKS_GROUP_KEY,
};
