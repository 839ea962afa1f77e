//! Integration tests for jump list sessions
//!
//! Drives the public `JumpList` API against the in-memory shell: enumeration,
//! pinned state, mutations and the release of every native reference.

use jumplist_manager::config::{AppConfig, EnumerationLimits};
use jumplist_manager::error::{ContainerKind, JumpListError};
use jumplist_manager::jumplist::{ItemAction, ItemKind, JumpList, TASKS_GROUP_KEY};
use jumplist_manager::shell::memory::{
    AppDestinations, FailurePoint, FileEntry, MemoryShell, ShortcutEntry, StoredCategory,
    StoredObject,
};
use jumplist_manager::shell::{DestinationListKind, classify};
use jumplist_manager::thumbnail::DeviceBitmap;
use jumplist_manager::ItemCategory;

const APP_ID: &str = "Fabrikam.Paint";

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn opaque_bitmap(size: u32) -> DeviceBitmap {
    let side = size as usize;
    DeviceBitmap::from_bgra(size, size, vec![0xFF; side * side * 4]).unwrap()
}

fn paint_destinations() -> AppDestinations {
    let canvas = FileEntry::new(r"D:\Art\Canvas.png").with_image(opaque_bitmap(32));
    AppDestinations {
        pinned: vec![canvas.clone().into()],
        recent: vec![
            canvas.into(),
            FileEntry::new(r"D:\Art\Sketch.bmp").into(),
            StoredObject::Opaque,
        ],
        frequent: vec![FileEntry::new(r"D:\Art\Logo.svg").into()],
        categories: vec![
            StoredCategory::custom(
                "@paint.dll,-101",
                vec![ShortcutEntry::new(r"C:\Paint\paint.exe", "/brush", "Brushes").into()],
            ),
            StoredCategory::known(2),
            StoredCategory::tasks(vec![
                ShortcutEntry::new(r"C:\Paint\paint.exe", "/new", "New canvas").into(),
                ShortcutEntry::new(r"C:\Paint\paint.exe", "/open", "Open").into(),
            ]),
        ],
    }
}

fn paint_shell() -> MemoryShell {
    let shell = MemoryShell::new();
    shell.set_destinations(APP_ID, paint_destinations());
    shell.register_indirect_string("@paint.dll,-101", "Brush presets");
    shell
}

#[test]
fn test_full_listing_in_display_order() {
    let shell = paint_shell();
    let mut list = JumpList::create(shell.clone(), APP_ID).unwrap();

    let groups = list.enumerate_all(true);
    let keys: Vec<&str> = groups.iter().map(|group| group.key.as_str()).collect();
    assert_eq!(keys, ["Pinned", "Recent", "Frequent", "Brush presets", TASKS_GROUP_KEY]);

    // The opaque recent object produces no item
    assert_eq!(groups[1].len(), 2);
    assert_eq!(groups[1].items[0].text(), "Canvas.png");
    assert!(groups[1].items[0].is_pinned());
    assert!(!groups[1].items[1].is_pinned());

    let tasks = &groups[4];
    assert!(tasks.items.iter().all(|item| item.category() == ItemCategory::Task));
    assert!(tasks.items.iter().all(|item| item.kind() == ItemKind::ShortcutReference));
}

#[test]
fn test_frequent_group_is_optional() {
    let mut list = JumpList::create(paint_shell(), APP_ID).unwrap();
    let groups = list.enumerate_all(false);
    assert!(groups.iter().all(|group| group.key != "Frequent"));
}

#[test]
fn test_file_items_carry_png_thumbnails() {
    let mut list = JumpList::create(paint_shell(), APP_ID).unwrap();
    let pinned = list.enumerate_pinned_items(10).unwrap();
    let icon = pinned.items[0].icon().expect("thumbnail");
    assert_eq!(&icon[1..4], b"PNG");
}

#[test]
fn test_item_actions_follow_category_and_state() {
    let mut list = JumpList::create(paint_shell(), APP_ID).unwrap();

    let recent = list.enumerate_recent_items(10).unwrap();
    assert_eq!(
        recent.items[0].available_actions(),
        [
            ItemAction::Open,
            ItemAction::OpenFileLocation,
            ItemAction::Unpin,
            ItemAction::Properties
        ]
    );

    let tasks = list.enumerate_tasks(10).unwrap();
    assert_eq!(tasks.items[0].available_actions(), [ItemAction::Open]);
}

#[test]
fn test_pin_then_unpin_updates_store_and_item() {
    let shell = paint_shell();
    let mut list = JumpList::create(shell.clone(), APP_ID).unwrap();

    let mut recent = list.enumerate_recent_items(10).unwrap();
    let sketch = &mut recent.items[1];
    assert!(list.pin_item(sketch));
    assert!(sketch.is_pinned());
    assert_eq!(shell.destinations(APP_ID).pinned.len(), 2);

    // Pinning twice is refused without reaching the shell
    assert!(!list.pin_item(sketch));
    assert_eq!(shell.pin_requests(), [-1]);

    assert!(list.unpin_item(sketch));
    assert!(!sketch.is_pinned());
    assert_eq!(shell.pin_requests(), [-1, -2]);
    assert_eq!(shell.destinations(APP_ID).pinned.len(), 1);
}

#[test]
fn test_failed_pin_leaves_item_unpinned() {
    let shell = paint_shell();
    let mut list = JumpList::create(shell.clone(), APP_ID).unwrap();
    let mut recent = list.enumerate_recent_items(10).unwrap();

    shell.fail(FailurePoint::PinItem);
    assert!(!list.pin_item(&mut recent.items[1]));
    assert!(!recent.items[1].is_pinned());
}

#[test]
fn test_remove_custom_item_from_its_category() {
    let shell = paint_shell();
    let mut list = JumpList::create(shell.clone(), APP_ID).unwrap();

    let brushes = list.enumerate_custom_destinations_at(0, 10).unwrap();
    assert_eq!(brushes.key, "Brush presets");
    assert!(list.remove_item(&brushes.items[0]));
    assert!(shell.destinations(APP_ID).categories[0].destinations.is_empty());

    let tasks = list.enumerate_tasks(10).unwrap();
    assert!(!list.remove_item(&tasks.items[0]));
}

#[test]
fn test_clear_keeps_categories() {
    let shell = paint_shell();
    let mut list = JumpList::create(shell.clone(), APP_ID).unwrap();

    assert!(list.has_automatic_destinations_of(DestinationListKind::Recent));
    assert!(list.clear_automatic_destinations());
    assert!(!list.has_automatic_destinations_of(DestinationListKind::Pinned));
    assert_eq!(shell.destinations(APP_ID).categories.len(), 3);

    // Nothing left to clear
    assert!(!list.clear_automatic_destinations());
}

#[test]
fn test_identity_across_enumerations() {
    let mut list = JumpList::create(paint_shell(), APP_ID).unwrap();
    let pinned = list.enumerate_pinned_items(10).unwrap();
    let recent = list.enumerate_recent_items(10).unwrap();

    assert!(JumpList::<MemoryShell>::is_same_object(
        pinned.items[0].destination(),
        recent.items[0].destination()
    ));
    assert!(!JumpList::<MemoryShell>::is_same_object(
        pinned.items[0].destination(),
        recent.items[1].destination()
    ));
}

#[test]
fn test_is_pinned_for_standalone_destination() {
    let shell = paint_shell();
    let mut list = JumpList::create(shell.clone(), APP_ID).unwrap();

    let canvas = shell.object(FileEntry::new(r"d:\art\CANVAS.PNG"));
    let destination = classify(&canvas).unwrap();
    assert!(list.is_pinned(&destination));
}

#[test]
fn test_identifier_is_case_insensitive() {
    let mut list = JumpList::create(paint_shell(), &APP_ID.to_lowercase()).unwrap();
    assert_eq!(list.enumerate_recent_items(10).unwrap().len(), 2);
}

#[test]
fn test_unknown_application_has_no_items() {
    let mut list = JumpList::create(paint_shell(), "Fabrikam.Unknown").unwrap();
    assert!(list.enumerate_all(true).is_empty());
}

#[test]
fn test_empty_identifier_is_rejected() {
    let Err(error) = JumpList::create(MemoryShell::new(), "") else {
        panic!("empty identifier accepted");
    };
    assert!(matches!(error, JumpListError::EmptyAppId));
}

#[test]
fn test_partial_acquisition_releases_everything() {
    let shell = paint_shell();
    shell.fail(FailurePoint::Initialize(ContainerKind::InternalCustomDestinations));

    let Err(error) = JumpList::create(shell.clone(), APP_ID) else {
        panic!("initialization failure ignored");
    };
    assert!(matches!(
        error,
        JumpListError::ContainerInitialization {
            container: ContainerKind::InternalCustomDestinations,
            ..
        }
    ));
    assert_eq!(shell.live_handles(), 0);
}

#[test]
fn test_session_and_items_release_on_drop() {
    let shell = paint_shell();
    let mut list = JumpList::create(shell.clone(), APP_ID).unwrap();
    let groups = list.enumerate_all(true);
    assert!(shell.live_handles() > 0);

    drop(groups);
    drop(list);
    assert_eq!(shell.live_handles(), 0);
}

#[test]
fn test_configured_limits_apply_to_full_listing() {
    let config = AppConfig {
        limits: EnumerationLimits {
            recent: 1,
            tasks: 1,
            ..EnumerationLimits::default()
        },
        ..AppConfig::default()
    };
    let mut list = JumpList::create(paint_shell(), APP_ID)
        .unwrap()
        .with_config(&config);

    let groups = list.enumerate_all(false);
    let recent = groups.iter().find(|group| group.key == "Recent").unwrap();
    let tasks = groups.iter().find(|group| group.key == TASKS_GROUP_KEY).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(tasks.len(), 1);
}

#[test]
fn test_pin_recent_document_into_empty_pinned_list() {
    let shell = MemoryShell::new();
    shell.set_destinations(
        APP_ID,
        AppDestinations {
            recent: vec![FileEntry::new(r"C:\Report.docx").into()],
            ..AppDestinations::default()
        },
    );
    let mut list = JumpList::create(shell, APP_ID).unwrap();

    let pinned = list.enumerate_pinned_items(10);
    assert!(pinned.is_none_or(|group| group.is_empty()));

    let mut recent = list.enumerate_recent_items(10).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent.items[0].text(), "Report.docx");
    assert!(!recent.items[0].is_pinned());

    assert!(list.pin_item(&mut recent.items[0]));
    assert!(recent.items[0].is_pinned());

    let pinned = list.enumerate_pinned_items(10).unwrap();
    assert_eq!(pinned.len(), 1);
    assert_eq!(pinned.items[0].text(), "Report.docx");
    assert!(pinned.items[0].is_pinned());
}

#[test]
fn test_file_thumbnail_is_flipped_from_device_order() {
    // Device row 0 is red, row 1 white
    let mut bits = vec![0xFF; 2 * 2 * 4];
    bits[..8].copy_from_slice(&[0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0xFF, 0xFF]);
    let bitmap = DeviceBitmap::from_bgra(2, 2, bits).unwrap();

    let shell = MemoryShell::new();
    shell.set_destinations(
        APP_ID,
        AppDestinations {
            recent: vec![FileEntry::new(r"D:\Art\Flag.png").with_image(bitmap).into()],
            ..AppDestinations::default()
        },
    );
    let mut list = JumpList::create(shell, APP_ID).unwrap();
    let recent = list.enumerate_recent_items(10).unwrap();

    let icon = recent.items[0].icon().expect("thumbnail");
    let decoded = image::load_from_memory(icon).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(decoded.get_pixel(0, 1).0, [0xFF, 0x00, 0x00, 0xFF]);
}

#[test]
fn test_shortcut_icon_is_encoded_as_png() {
    let canvas = DeviceBitmap::transparent_canvas(32).unwrap();
    let shell = MemoryShell::new();
    shell.set_destinations(
        APP_ID,
        AppDestinations {
            categories: vec![StoredCategory::tasks(vec![
                ShortcutEntry::new(r"C:\Paint\paint.exe", "/new", "New canvas")
                    .with_icon(canvas)
                    .into(),
            ])],
            ..AppDestinations::default()
        },
    );
    let mut list = JumpList::create(shell, APP_ID).unwrap();
    let tasks = list.enumerate_tasks(10).unwrap();

    let icon = tasks.items[0].icon().expect("shortcut icon");
    assert_eq!(icon[..8], PNG_SIGNATURE);
    let decoded = image::load_from_memory(icon).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (32, 32));
}

#[test]
fn test_unnamed_destination_skips_thumbnail_extraction() {
    let shell = MemoryShell::new();
    shell.set_destinations(
        APP_ID,
        AppDestinations {
            recent: vec![
                FileEntry::new(r"D:\Art\Untitled.png")
                    .with_display_name(None)
                    .with_image(opaque_bitmap(16))
                    .into(),
                ShortcutEntry::new(r"C:\Paint\paint.exe", "/last", "Last canvas")
                    .without_title()
                    .into(),
                FileEntry::new(r"D:\Art\Named.png").into(),
            ],
            ..AppDestinations::default()
        },
    );
    let mut list = JumpList::create(shell.clone(), APP_ID).unwrap();
    let recent = list.enumerate_recent_items(10).unwrap();

    assert_eq!(recent.len(), 1);
    assert_eq!(recent.items[0].text(), "Named.png");
    assert_eq!(shell.image_requests(), 1);
}
