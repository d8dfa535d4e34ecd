//! Single funnel for navigation signals.
//!
//! Every trigger (widget flips, hash changes, arrow keys, the initial mount)
//! goes through [`FlipEventAdapter::handle`], which updates the current page,
//! mirrors it into the location hash and reconciles the page window with the
//! policy's resident set. The store is always asked to load before it is asked
//! to unload.

use crate::deep_link::{format_hash, parse_hash};
use crate::options::ViewerOptions;
use crate::policy::{ResidentSet, WindowPolicy};
use crate::types::*;
use crate::window::SlotStore;

/// Receiver of location-hash updates
pub trait HistorySink {
    /// Replace the current hash without adding a history entry
    fn replace_hash(&mut self, hash: &str);
}

/// Discards hash updates
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl HistorySink for NoHistory {
    fn replace_hash(&mut self, _hash: &str) {}
}

/// Keeps every hash written, newest last
#[derive(Debug, Clone, Default)]
pub struct RecordingHistory {
    pub hashes: Vec<String>,
}

impl RecordingHistory {
    pub fn current(&self) -> Option<&str> {
        self.hashes.last().map(String::as_str)
    }
}

impl HistorySink for RecordingHistory {
    fn replace_hash(&mut self, hash: &str) {
        self.hashes.push(hash.to_string());
    }
}

/// Navigation signal, page numbers are 1-based
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTrigger {
    /// View mounted, optionally with the hash it was opened at
    Mount { deep_link: Option<String> },
    /// Widget started turning towards `page`
    FlipStart { page: usize },
    /// Widget settled on `page`
    FlipEnd { page: usize },
    /// Location hash changed (deep link, back/forward)
    HashChange { hash: String },
    Key(ArrowKey),
}

impl NavigationTrigger {
    fn is_hash_driven(&self) -> bool {
        matches!(self, NavigationTrigger::HashChange { .. })
    }
}

/// What one trigger did to the window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub previous_page: usize,
    pub page: usize,
    pub resident: ResidentSet,
    pub loaded: usize,
    pub unloaded: usize,
}

impl Reconciliation {
    pub fn page_changed(&self) -> bool {
        self.previous_page != self.page
    }
}

pub struct FlipEventAdapter<S, H> {
    store: S,
    history: H,
    policy: WindowPolicy,
    device: DeviceClass,
    deep_linking: bool,
    /// When false, pages are only ever added to the window
    eviction: bool,
    current_page: usize,
    last_hash: Option<String>,
}

impl<S: SlotStore, H: HistorySink> FlipEventAdapter<S, H> {
    pub fn new(store: S, history: H, policy: WindowPolicy, device: DeviceClass) -> Self {
        Self {
            store,
            history,
            policy,
            device,
            deep_linking: true,
            eviction: true,
            current_page: 1,
            last_hash: None,
        }
    }

    pub fn from_options(store: S, history: H, options: &ViewerOptions) -> Self {
        Self::new(
            store,
            history,
            WindowPolicy::new(options.strategy),
            options.device_class,
        )
        .with_deep_linking(options.deep_linking)
        .with_eviction(options.evict_pages)
    }

    /// Whether the current page is mirrored into the location hash
    pub fn with_deep_linking(mut self, enabled: bool) -> Self {
        self.deep_linking = enabled;
        self
    }

    /// Whether pages outside the resident set are unloaded on navigation
    pub fn with_eviction(mut self, enabled: bool) -> Self {
        self.eviction = enabled;
        self
    }

    pub fn eviction_enabled(&self) -> bool {
        self.eviction
    }

    /// Takes effect on the next trigger
    pub fn set_eviction(&mut self, enabled: bool) {
        self.eviction = enabled;
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.store.len()
    }

    pub fn device_class(&self) -> DeviceClass {
        self.device
    }

    /// Takes effect on the next trigger
    pub fn set_device_class(&mut self, device: DeviceClass) {
        self.device = device;
    }

    pub fn policy(&self) -> &WindowPolicy {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access for draining change records; reconciliation itself
    /// must only run through [`FlipEventAdapter::handle`].
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn into_parts(self) -> (S, H) {
        (self.store, self.history)
    }

    /// Resident set for the current state, without touching the store
    pub fn resident_set(&self) -> ResidentSet {
        self.policy
            .resident_set(self.current_page, self.total_pages(), self.device)
    }

    /// Run the navigation protocol for one trigger. Returns `None` when the
    /// trigger was a no-op.
    pub fn handle(&mut self, trigger: NavigationTrigger) -> Option<Reconciliation> {
        let total = self.total_pages();
        if total == 0 {
            log::debug!("Ignoring {:?}: no pages", trigger);
            return None;
        }

        let target = match &trigger {
            NavigationTrigger::Mount { deep_link } => deep_link
                .as_deref()
                .and_then(parse_hash)
                .unwrap_or(self.current_page),
            NavigationTrigger::FlipStart { page } | NavigationTrigger::FlipEnd { page } => *page,
            NavigationTrigger::HashChange { hash } => match parse_hash(hash) {
                Some(page) => page,
                None => {
                    log::debug!("Ignoring unparseable hash '{}'", hash);
                    return None;
                }
            },
            NavigationTrigger::Key(ArrowKey::Left) => self.current_page.saturating_sub(1),
            NavigationTrigger::Key(ArrowKey::Right) => self.current_page.saturating_add(1),
        };
        let target = target.clamp(1, total);

        if target == self.current_page && trigger.is_hash_driven() {
            return None;
        }

        let previous_page = self.current_page;
        self.current_page = target;
        if let NavigationTrigger::HashChange { hash } = &trigger {
            // The location already shows this hash
            self.last_hash = Some(hash.trim().to_string());
        }
        self.reflect_hash();

        let resident = self.resident_set();
        let loaded = self.store.load_range(&resident);
        let unloaded = if self.eviction {
            self.store.unload_except(&resident)
        } else {
            0
        };

        log::debug!(
            "{:?}: page {} -> {} (resident {:?}..={:?}, +{} -{})",
            trigger,
            previous_page,
            target,
            resident.first(),
            resident.last(),
            loaded,
            unloaded
        );

        Some(Reconciliation {
            previous_page,
            page: target,
            resident,
            loaded,
            unloaded,
        })
    }

    /// Load the policy's preload set for the current page. Pages outside the
    /// resident set are evicted again by the next trigger.
    pub fn apply_deferred_preload(&mut self) -> usize {
        let preload = self.policy.preload_set(self.current_page, self.total_pages());
        if preload.is_empty() {
            return 0;
        }
        self.store.load_range(&preload)
    }

    /// Give up on eviction and load every page. Eviction stays off until
    /// re-enabled with [`FlipEventAdapter::set_eviction`].
    pub fn load_everything(&mut self) -> usize {
        if self.total_pages() == 0 {
            return 0;
        }
        self.eviction = false;
        self.store.load_all()
    }

    fn reflect_hash(&mut self) {
        if !self.deep_linking {
            return;
        }
        let hash = format_hash(self.current_page);
        if self.last_hash.as_deref() == Some(hash.as_str()) {
            return;
        }
        self.history.replace_hash(&hash);
        self.last_hash = Some(hash);
    }
}
