//! Shell-backed subcommands

use crate::{Command, ItemRef};
use anyhow::{Context, Result, anyhow, bail};
use jumplist_manager::apps::enumerate_applications;
use jumplist_manager::config::AppConfig;
use jumplist_manager::error::get_user_friendly_error;
use jumplist_manager::jumplist::{GroupOf, ItemKind};
use jumplist_manager::shell::{ComShellProvider, ShellProvider};
use jumplist_manager::utils::ComApartment;
use jumplist_manager::{ItemCategory, JumpList, JumpListItem};
use tracing::info;

type Session = JumpList<ComShellProvider>;

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Pin,
    Unpin,
    Remove,
}

impl Mutation {
    const fn verb(self) -> &'static str {
        match self {
            Self::Pin => "pin",
            Self::Unpin => "unpin",
            Self::Remove => "remove",
        }
    }
}

pub fn run(command: Command, config: &AppConfig) -> Result<()> {
    let _apartment = ComApartment::enter().context("Failed to enter a COM apartment")?;

    match command {
        Command::Hash { app_id } => {
            crate::print_hash(&app_id);
            Ok(())
        }
        Command::Apps => {
            for app in enumerate_applications().context("Failed to enumerate applications")? {
                println!("{}\t{}", app.display_name, app.app_id);
            }
            Ok(())
        }
        Command::List { app_id, thumbnails } => {
            let mut session = open(&app_id, config)?;
            let groups = session.enumerate_all(config.include_frequent);
            if groups.is_empty() {
                println!("{app_id} has no jump list entries");
            }
            print_groups(&groups, thumbnails);
            Ok(())
        }
        Command::Pin(item) => mutate(&item, config, Mutation::Pin),
        Command::Unpin(item) => mutate(&item, config, Mutation::Unpin),
        Command::Remove(item) => mutate(&item, config, Mutation::Remove),
        Command::Clear { app_id } => {
            let mut session = open(&app_id, config)?;
            if !session.clear_automatic_destinations() {
                bail!("Nothing was cleared for {app_id}");
            }
            println!("Cleared the automatic destinations of {app_id}");
            Ok(())
        }
    }
}

fn open(app_id: &str, config: &AppConfig) -> Result<Session> {
    JumpList::open(app_id)
        .map(|session| session.with_config(config))
        .map_err(|e| anyhow!(get_user_friendly_error(&e)))
}

fn describe<O: jumplist_manager::shell::ShellObject>(item: &JumpListItem<O>) -> String {
    let kind = match item.kind() {
        ItemKind::FileReference => "file",
        ItemKind::ShortcutReference => "shortcut",
    };
    let category = match item.category() {
        ItemCategory::Automatic => "automatic",
        ItemCategory::Custom => "custom",
        ItemCategory::Task => "task",
    };
    let pinned = if item.is_pinned() { ", pinned" } else { "" };
    format!("{} ({kind}, {category}{pinned})", item.text())
}

fn print_groups(groups: &[GroupOf<ComShellProvider>], thumbnails: bool) {
    for group in groups {
        println!("{}", group.key);
        for (index, item) in group.items.iter().enumerate() {
            let line = describe(item);
            if thumbnails {
                let size = item.icon().map_or(0, <[u8]>::len);
                println!("  [{index}] {line} [{size} bytes]");
            } else {
                println!("  [{index}] {line}");
            }
        }
    }
}

fn mutate(target: &ItemRef, config: &AppConfig, mutation: Mutation) -> Result<()> {
    let mut session = open(&target.app_id, config)?;
    let mut groups = session.enumerate_all(true);

    let group = groups
        .iter_mut()
        .find(|group| group.key.eq_ignore_ascii_case(&target.group))
        .with_context(|| format!("{} has no group '{}'", target.app_id, target.group))?;
    let len = group.len();
    let item = group.items.get_mut(target.index).with_context(|| {
        format!(
            "Group '{}' has {len} items; index {} is out of range",
            target.group, target.index
        )
    })?;

    let done = apply(&mut session, item, mutation);
    if !done {
        bail!("Could not {} '{}'", mutation.verb(), item.text());
    }
    info!("{} '{}' succeeded", mutation.verb(), item.text());
    println!("{}", describe(item));
    Ok(())
}

fn apply<P: ShellProvider>(
    session: &mut JumpList<P>,
    item: &mut JumpListItem<P::Object>,
    mutation: Mutation,
) -> bool {
    match mutation {
        Mutation::Pin => session.pin_item(item),
        Mutation::Unpin => session.unpin_item(item),
        Mutation::Remove => session.remove_item(item),
    }
}
