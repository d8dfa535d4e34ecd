//! The page window: one slot per catalog page, loaded or placeholder.
//!
//! Slots are only ever replaced in place, so a renderer bound to slot `i`
//! keeps pointing at page `i` across every mutation. Each replacement is
//! recorded as a [`SlotChange`] that the renderer drains with
//! [`PageWindow::take_changes`].

use crate::catalog::PageCatalog;
use crate::policy::ResidentSet;
use crate::types::*;
use std::collections::BTreeSet;

/// Load/unload operations the navigation adapter drives
pub trait SlotStore {
    /// Number of slots (equal to the catalog length)
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load every unloaded, in-bounds index of `resident`.
    /// Returns the number of slots that changed.
    fn load_range(&mut self, resident: &ResidentSet) -> usize;

    /// Unload every loaded index outside `resident`.
    /// Returns the number of slots that changed.
    fn unload_except(&mut self, resident: &ResidentSet) -> usize;

    /// Load every remaining slot
    fn load_all(&mut self) -> usize;
}

/// One in-place slot replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotChange {
    Loaded { index: usize, page: PageId },
    Unloaded { index: usize },
}

impl SlotChange {
    pub fn index(&self) -> usize {
        match self {
            SlotChange::Loaded { index, .. } | SlotChange::Unloaded { index } => *index,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageWindow {
    catalog: PageCatalog,
    slots: Vec<PageSlot>,
    /// Indices currently loaded, so eviction never scans the whole book
    loaded: BTreeSet<usize>,
    changes: Vec<SlotChange>,
}

impl PageWindow {
    /// All slots start unloaded
    pub fn new(catalog: PageCatalog) -> Self {
        let slots = vec![PageSlot::Unloaded; catalog.len()];
        Self {
            catalog,
            slots,
            loaded: BTreeSet::new(),
            changes: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &PageCatalog {
        &self.catalog
    }

    pub fn slots(&self) -> &[PageSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&PageSlot> {
        self.slots.get(index)
    }

    pub fn is_loaded(&self, index: usize) -> bool {
        self.loaded.contains(&index)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    pub fn loaded_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.loaded.iter().copied()
    }

    /// Drain the replacements recorded since the last call, oldest first
    pub fn take_changes(&mut self) -> Vec<SlotChange> {
        std::mem::take(&mut self.changes)
    }

    fn load(&mut self, index: usize) -> bool {
        let Some(page) = self.catalog.get(index) else {
            return false;
        };
        if !self.loaded.insert(index) {
            return false;
        }
        self.slots[index] = PageSlot::Loaded(page.clone());
        self.changes.push(SlotChange::Loaded {
            index,
            page: page.clone(),
        });
        true
    }

    fn unload(&mut self, index: usize) -> bool {
        if !self.loaded.remove(&index) {
            return false;
        }
        self.slots[index] = PageSlot::Unloaded;
        self.changes.push(SlotChange::Unloaded { index });
        true
    }
}

impl SlotStore for PageWindow {
    fn len(&self) -> usize {
        self.slots.len()
    }

    fn load_range(&mut self, resident: &ResidentSet) -> usize {
        let loaded = resident.iter().filter(|&index| self.load(index)).count();
        log::debug!(
            "load_range: {} newly loaded ({} resident, {} loaded in total)",
            loaded,
            resident.len(),
            self.loaded.len()
        );
        loaded
    }

    fn unload_except(&mut self, resident: &ResidentSet) -> usize {
        let evict: Vec<usize> = self
            .loaded
            .iter()
            .copied()
            .filter(|index| !resident.contains(*index))
            .collect();
        let unloaded = evict.into_iter().filter(|&index| self.unload(index)).count();
        log::debug!(
            "unload_except: {} newly unloaded ({} loaded in total)",
            unloaded,
            self.loaded.len()
        );
        unloaded
    }

    fn load_all(&mut self) -> usize {
        let loaded = (0..self.slots.len())
            .filter(|&index| self.load(index))
            .count();
        log::debug!("load_all: {} newly loaded", loaded);
        loaded
    }
}
