//! Installed application discovery
//!
//! Lists the applications shown in the shell's Apps folder together with the
//! application identifier each one registers its jump list under.
//!
//! # Example
//!
//! ```no_run
//! # fn example() -> jumplist_manager::Result<()> {
//! for app in jumplist_manager::apps::enumerate_applications()? {
//!     println!("{}: {}", app.display_name, app.app_id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod enumerator;

pub use enumerator::{APP_ICON_SIZE, ApplicationEntry, enumerate_applications};
