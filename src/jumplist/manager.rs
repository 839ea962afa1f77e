//! Jump list session
//!
//! A [`JumpList`] binds the three shell containers to one application identifier
//! and turns their contents into [`JumpListGroup`]s. Acquisition is all or
//! nothing; after that every failure is reported as `None` or `false` and logged.

use super::identity::is_same_destination;
use super::item::{ItemCategory, JumpListGroup, JumpListItem};
use crate::config::{AppConfig, EnumerationLimits};
use crate::error::{ContainerKind, JumpListError, Result, ShellError};
use crate::shell::{
    AutomaticDestinationList, CategoryFlags, CategoryKind, CustomDestinationList, Destination,
    DestinationListKind, DestinationOf, FileReference, GetListFlags,
    InternalCustomDestinationList, PinIndex, ShellProvider, ShortcutReference, classify,
};
use crate::thumbnail::{
    DEFAULT_THUMBNAIL_SIZE, extract_from_file_reference, extract_from_shortcut_reference,
};
use tracing::{debug, info, warn};

/// Number of items fetched per list when no limit is configured
pub const DEFAULT_ENUMERATION_COUNT: u32 = 20;

/// Number of pinned objects cached for pinned-state lookups when none is configured
pub const DEFAULT_PINNED_LOOKUP_LIMIT: u32 = 100;

/// Group heading of the tasks category
pub const TASKS_GROUP_KEY: &str = "Tasks";

/// Item type produced by a provider
pub type ItemOf<P> = JumpListItem<<P as ShellProvider>::Object>;

/// Group type produced by a provider
pub type GroupOf<P> = JumpListGroup<<P as ShellProvider>::Object>;

/// Jump list session for one application
pub struct JumpList<P: ShellProvider> {
    provider: P,
    app_id: String,
    automatic: P::AutomaticList,
    // Held so the public container stays bound for the session
    _custom: P::CustomList,
    internal: P::InternalList,
    /// Pinned objects, fetched on first need and replaced by pinned enumeration
    pinned_cache: Option<Vec<P::Object>>,
    limits: EnumerationLimits,
    thumbnail_size: u32,
}

#[cfg(windows)]
impl JumpList<crate::shell::ComShellProvider> {
    /// Open the jump list of an application through the shell
    ///
    /// The calling thread must be inside a COM apartment.
    pub fn open(app_id: &str) -> Result<Self> {
        Self::create(crate::shell::ComShellProvider, app_id)
    }
}

impl<P: ShellProvider> JumpList<P> {
    /// Create a session for `app_id`
    ///
    /// Instantiates the Automatic Destinations, Custom Destinations and internal
    /// Custom Destinations containers and binds each to the identifier. If any step
    /// fails, every container acquired so far is released and the failure returned.
    pub fn create(provider: P, app_id: &str) -> Result<Self> {
        if app_id.is_empty() {
            return Err(JumpListError::EmptyAppId);
        }

        let automatic = provider
            .create_automatic_list()
            .map_err(creation(ContainerKind::AutomaticDestinations))?;
        let custom = provider
            .create_custom_list()
            .map_err(creation(ContainerKind::CustomDestinations))?;
        let internal = provider
            .create_internal_list()
            .map_err(creation(ContainerKind::InternalCustomDestinations))?;

        automatic
            .initialize(app_id, None, None)
            .map_err(initialization(ContainerKind::AutomaticDestinations, app_id))?;
        custom
            .set_app_id(app_id)
            .map_err(initialization(ContainerKind::CustomDestinations, app_id))?;
        internal
            .set_application_id(app_id)
            .map_err(initialization(ContainerKind::InternalCustomDestinations, app_id))?;

        info!("Opened jump list for {app_id}");
        Ok(Self {
            provider,
            app_id: app_id.to_string(),
            automatic,
            _custom: custom,
            internal,
            pinned_cache: None,
            limits: EnumerationLimits::default(),
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
        })
    }

    /// Apply enumeration limits and thumbnail size from configuration
    #[must_use]
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        self.limits = config.limits.clamped();
        self.thumbnail_size = config.effective_thumbnail_size();
        self
    }

    /// Application identifier the session is bound to
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Limits used by [`JumpList::enumerate_all`] and pinned-state lookups
    pub const fn limits(&self) -> &EnumerationLimits {
        &self.limits
    }

    /// Logical size of item thumbnails
    pub const fn thumbnail_size(&self) -> u32 {
        self.thumbnail_size
    }

    /// Whether a list of the given kind has at least one destination
    pub fn has_automatic_destinations_of(&self, kind: DestinationListKind) -> bool {
        match self.automatic.has_list() {
            Ok(true) => {}
            Ok(false) => return false,
            Err(e) => {
                debug!("HasList failed for {}: {e}", self.app_id);
                return false;
            }
        }

        match self.automatic.get_list(kind, 1, GetListFlags::None) {
            Ok(objects) => !objects.is_empty(),
            Err(e) => {
                debug!("GetList({}) failed for {}: {e}", kind.label(), self.app_id);
                false
            }
        }
    }

    /// Enumerate the pinned list
    ///
    /// The fetched objects replace the session's pinned cache, so every item of the
    /// returned group reports itself as pinned.
    pub fn enumerate_pinned_items(&mut self, count: u32) -> Option<GroupOf<P>> {
        let objects = self.fetch_list(DestinationListKind::Pinned, count)?;
        self.pinned_cache = Some(objects);

        let pinned = self.pinned_cache.as_deref().unwrap_or_default();
        let mut group = JumpListGroup::new(DestinationListKind::Pinned.label());
        group.items = self.materialize_all(ItemCategory::Automatic, pinned, count);
        Some(group)
    }

    /// Enumerate the recent list, newest first
    pub fn enumerate_recent_items(&mut self, count: u32) -> Option<GroupOf<P>> {
        self.enumerate_automatic(DestinationListKind::Recent, count)
    }

    /// Enumerate the frequent list
    pub fn enumerate_frequent_items(&mut self, count: u32) -> Option<GroupOf<P>> {
        self.enumerate_automatic(DestinationListKind::Frequent, count)
    }

    /// Number of custom destinations categories, Known and Tasks categories included
    pub fn custom_destinations_count(&self) -> Option<u32> {
        match self.internal.category_count() {
            Ok(count) => Some(count),
            Err(e) => {
                warn!("Failed to count categories for {}: {e}", self.app_id);
                None
            }
        }
    }

    /// Enumerate the custom category at `index`
    ///
    /// Known and Tasks categories are rejected. The group is keyed by the category
    /// name with indirect strings resolved.
    pub fn enumerate_custom_destinations_at(
        &mut self,
        index: u32,
        count: u32,
    ) -> Option<GroupOf<P>> {
        match self.try_enumerate_custom(index, count) {
            Ok(group) => Some(group),
            Err(JumpListError::CategoryNotCustom(index)) => {
                debug!("Category {index} of {} is not a custom category", self.app_id);
                None
            }
            Err(e) => {
                warn!("Failed to enumerate category {index} of {}: {e}", self.app_id);
                None
            }
        }
    }

    /// Enumerate the tasks category
    ///
    /// Only the first Tasks category is used. Categories that cannot be described
    /// are skipped; failure to enumerate the Tasks category itself yields `None`.
    pub fn enumerate_tasks(&mut self, count: u32) -> Option<GroupOf<P>> {
        let categories = self.custom_destinations_count()?;

        for index in 0..categories {
            match self.internal.category(index, CategoryFlags::Default) {
                Ok(category) if category.kind == CategoryKind::Tasks => {}
                Ok(_) => continue,
                Err(e) => {
                    debug!("Skipping category {index} of {}: {e}", self.app_id);
                    continue;
                }
            }

            let objects = match self.internal.enumerate_category_destinations(index) {
                Ok(objects) => objects,
                Err(e) => {
                    warn!("Failed to enumerate tasks of {}: {e}", self.app_id);
                    return None;
                }
            };
            self.ensure_pinned_cache();
            let mut group = JumpListGroup::new(TASKS_GROUP_KEY);
            group.items = self.materialize_all(ItemCategory::Task, &objects, count);
            return Some(group);
        }

        debug!("{} declares no tasks", self.app_id);
        None
    }

    /// Every non-empty group in display order
    ///
    /// Pinned, Recent, Frequent (when `include_frequent`), each custom category that
    /// enumerates, then Tasks. Per-group limits come from the session's configuration.
    pub fn enumerate_all(&mut self, include_frequent: bool) -> Vec<GroupOf<P>> {
        let limits = self.limits;
        let mut groups = Vec::new();

        groups.extend(
            self.enumerate_pinned_items(limits.pinned)
                .filter(|group| !group.is_empty()),
        );
        groups.extend(
            self.enumerate_recent_items(limits.recent)
                .filter(|group| !group.is_empty()),
        );
        if include_frequent {
            groups.extend(
                self.enumerate_frequent_items(limits.frequent)
                    .filter(|group| !group.is_empty()),
            );
        }

        if let Some(categories) = self.custom_destinations_count() {
            for index in 0..categories {
                groups.extend(self.enumerate_custom_destinations_at(index, limits.custom));
            }
        }

        groups.extend(
            self.enumerate_tasks(limits.tasks)
                .filter(|group| !group.is_empty()),
        );
        groups
    }

    /// Whether two destinations refer to the same item
    pub fn is_same_object(a: &DestinationOf<P::Object>, b: &DestinationOf<P::Object>) -> bool {
        is_same_destination(a, b)
    }

    /// Whether a destination is in the pinned list
    ///
    /// Fetches the pinned list into the session cache on first use.
    pub fn is_pinned(&mut self, destination: &DestinationOf<P::Object>) -> bool {
        self.ensure_pinned_cache();
        self.is_pinned_cached(destination)
    }

    /// Append an item to the pinned list
    ///
    /// Returns `false` without calling the shell when the item is already pinned or
    /// is a task.
    pub fn pin_item(&mut self, item: &mut ItemOf<P>) -> bool {
        if item.is_pinned() || item.category() == ItemCategory::Task {
            return false;
        }
        if let Err(e) = self.automatic.pin_or_unpin(item.destination(), PinIndex::Append) {
            warn!("Failed to pin '{}': {e}", item.text());
            return false;
        }
        item.set_pinned(true);
        info!("Pinned '{}' for {}", item.text(), self.app_id);
        true
    }

    /// Remove an item from the pinned list
    ///
    /// Returns `false` without calling the shell when the item is not pinned or is
    /// a task.
    pub fn unpin_item(&mut self, item: &mut ItemOf<P>) -> bool {
        if !item.is_pinned() || item.category() == ItemCategory::Task {
            return false;
        }
        if let Err(e) = self.automatic.pin_or_unpin(item.destination(), PinIndex::Unpin) {
            warn!("Failed to unpin '{}': {e}", item.text());
            return false;
        }
        item.set_pinned(false);
        info!("Unpinned '{}' for {}", item.text(), self.app_id);
        true
    }

    /// Remove an item from the list it came from
    ///
    /// Automatic items are removed from the automatic lists, custom items from the
    /// custom categories. Tasks cannot be removed.
    pub fn remove_item(&mut self, item: &ItemOf<P>) -> bool {
        let result = match item.category() {
            ItemCategory::Task => return false,
            ItemCategory::Automatic => self.automatic.remove_destination(item.destination()),
            ItemCategory::Custom => self.internal.remove_destination(item.destination()),
        };
        match result {
            Ok(()) => {
                info!("Removed '{}' from {}", item.text(), self.app_id);
                true
            }
            Err(e) => {
                warn!("Failed to remove '{}': {e}", item.text());
                false
            }
        }
    }

    /// Clear the pinned, recent and frequent lists
    ///
    /// Returns `false` when there is nothing to clear or the shell refuses.
    pub fn clear_automatic_destinations(&mut self) -> bool {
        match self.automatic.has_list() {
            Ok(true) => {}
            Ok(false) => {
                debug!("{} has no automatic destinations to clear", self.app_id);
                return false;
            }
            Err(e) => {
                warn!("HasList failed for {}: {e}", self.app_id);
                return false;
            }
        }

        match self.automatic.clear_list(true) {
            Ok(()) => {
                info!("Cleared automatic destinations of {}", self.app_id);
                true
            }
            Err(e) => {
                warn!("Failed to clear automatic destinations of {}: {e}", self.app_id);
                false
            }
        }
    }

    fn fetch_list(&self, kind: DestinationListKind, count: u32) -> Option<Vec<P::Object>> {
        match self.automatic.get_list(kind, count, GetListFlags::None) {
            Ok(objects) => Some(objects),
            Err(e) => {
                warn!("Failed to get {} list of {}: {e}", kind.label(), self.app_id);
                None
            }
        }
    }

    fn enumerate_automatic(&mut self, kind: DestinationListKind, count: u32) -> Option<GroupOf<P>> {
        let objects = self.fetch_list(kind, count)?;
        self.ensure_pinned_cache();
        let mut group = JumpListGroup::new(kind.label());
        group.items = self.materialize_all(ItemCategory::Automatic, &objects, count);
        Some(group)
    }

    fn try_enumerate_custom(&mut self, index: u32, count: u32) -> Result<GroupOf<P>> {
        let category = self.internal.category(index, CategoryFlags::Default)?;
        let CategoryKind::Custom { name } = category.kind else {
            return Err(JumpListError::CategoryNotCustom(index));
        };

        let key = self.provider.load_indirect_string(&name)?;
        let objects = self.internal.enumerate_category_destinations(index)?;

        self.ensure_pinned_cache();
        let mut group = JumpListGroup::new(key);
        group.items = self.materialize_all(ItemCategory::Custom, &objects, count);
        Ok(group)
    }

    fn ensure_pinned_cache(&mut self) {
        if self.pinned_cache.is_some() {
            return;
        }
        match self.automatic.get_list(
            DestinationListKind::Pinned,
            self.limits.pinned_lookup,
            GetListFlags::None,
        ) {
            Ok(objects) => {
                debug!("Cached {} pinned objects for {}", objects.len(), self.app_id);
                self.pinned_cache = Some(objects);
            }
            Err(e) => debug!("Pinned list unavailable for {}: {e}", self.app_id),
        }
    }

    fn is_pinned_cached(&self, destination: &DestinationOf<P::Object>) -> bool {
        self.pinned_cache.as_deref().is_some_and(|pinned| {
            pinned
                .iter()
                .filter_map(classify)
                .any(|candidate| is_same_destination(&candidate, destination))
        })
    }

    fn materialize_all(
        &self,
        category: ItemCategory,
        objects: &[P::Object],
        count: u32,
    ) -> Vec<ItemOf<P>> {
        objects
            .iter()
            .take(count as usize)
            .filter_map(|object| self.materialize(category, object))
            .collect()
    }

    /// Build an item from a native object
    ///
    /// Objects that are neither a file nor a shortcut reference, or whose name
    /// cannot be read, produce no item. A missing thumbnail does not drop the item.
    fn materialize(&self, category: ItemCategory, object: &P::Object) -> Option<ItemOf<P>> {
        let Some(destination) = classify(object) else {
            debug!("Skipping object that is neither a file nor a shortcut reference");
            return None;
        };

        let text = match &destination {
            Destination::FileReference(file) => file.display_name(),
            Destination::ShortcutReference(link) => link.title(),
        };
        let text = match text {
            Ok(text) => text,
            Err(e) => {
                debug!("Skipping destination without a name: {e}");
                return None;
            }
        };

        let icon = match &destination {
            Destination::FileReference(file) => {
                extract_from_file_reference(file, self.thumbnail_size)
            }
            Destination::ShortcutReference(link) => {
                extract_from_shortcut_reference(link, self.thumbnail_size)
            }
        };

        let is_pinned = self.is_pinned_cached(&destination);
        Some(JumpListItem::new(category, destination, text, icon, is_pinned))
    }
}

impl<P: ShellProvider> Drop for JumpList<P> {
    fn drop(&mut self) {
        debug!(
            "Releasing jump list session for {} ({} cached pinned objects)",
            self.app_id,
            self.pinned_cache.as_ref().map_or(0, Vec::len)
        );
    }
}

fn creation(container: ContainerKind) -> impl FnOnce(ShellError) -> JumpListError {
    move |source| {
        warn!("Failed to create {container}: {source}");
        JumpListError::ContainerCreation { container, source }
    }
}

fn initialization(
    container: ContainerKind,
    app_id: &str,
) -> impl FnOnce(ShellError) -> JumpListError {
    let app_id = app_id.to_string();
    move |source| {
        warn!("Failed to initialize {container} for {app_id}: {source}");
        JumpListError::ContainerInitialization {
            container,
            app_id,
            source,
        }
    }
}
