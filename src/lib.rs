//! `JumpListManager` - Windows Jump List inspection and editing
//!
//! Enumerates, pins, unpins and removes the Jump List entries of any installed
//! application, identified by its application identifier (AUMID).
//!
//! - [`jumplist::JumpList`] holds the shell containers of one application and
//!   turns them into groups of items with thumbnails and pinned state
//! - [`shell`] describes the containers as traits, with a COM backend on Windows
//!   and an in-memory backend everywhere
//! - [`hash::AppIdHash`] computes the CRC-64 the shell names its per-application
//!   destination files after
//! - [`apps`] lists installed applications and their identifiers
//!
//! # Requirements
//!
//! The shell-backed API needs Windows 10 or later and a thread inside a COM
//! apartment ([`utils::ComApartment`]).

pub mod apps;
pub mod config;
pub mod error;
pub mod hash;
pub mod jumplist;
pub mod shell;
pub mod thumbnail;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types
pub use error::{JumpListError, Result};
pub use hash::AppIdHash;
pub use jumplist::{ItemCategory, JumpList, JumpListGroup, JumpListItem};
