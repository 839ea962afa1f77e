//! Structural identity of destinations
//!
//! Two handles to the same jump list entry are never pointer-equal, so identity
//! is decided by content:
//!
//! - File references: the shell's canonical comparison reports order 0
//! - Shortcut references: raw target path, arguments and title all match ordinally
//! - A file reference never equals a shortcut reference
//!
//! Any failed read makes the pair unequal.

use crate::shell::{Destination, FileReference, ShortcutReference};
use tracing::debug;

/// Whether two destinations refer to the same item
pub fn is_same_destination<F, L>(a: &Destination<F, L>, b: &Destination<F, L>) -> bool
where
    F: FileReference,
    L: ShortcutReference,
{
    match (a, b) {
        (Destination::FileReference(a), Destination::FileReference(b)) => same_file(a, b),
        (Destination::ShortcutReference(a), Destination::ShortcutReference(b)) => {
            same_shortcut(a, b)
        }
        _ => false,
    }
}

fn same_file<F: FileReference>(a: &F, b: &F) -> bool {
    match a.compare_canonical(b) {
        Ok(order) => order == 0,
        Err(e) => {
            debug!("Canonical comparison failed: {e}");
            false
        }
    }
}

fn same_shortcut<L: ShortcutReference>(a: &L, b: &L) -> bool {
    same_property(a, b, L::raw_target_path)
        && same_property(a, b, L::arguments)
        && same_property(a, b, L::title)
}

fn same_property<L, R>(a: &L, b: &L, read: R) -> bool
where
    R: Fn(&L) -> crate::shell::ShellResult<String>,
{
    match (read(a), read(b)) {
        (Ok(left), Ok(right)) => left == right,
        (Err(e), _) | (_, Err(e)) => {
            debug!("Shortcut property read failed: {e}");
            false
        }
    }
}
