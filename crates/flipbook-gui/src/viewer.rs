use flipbook_async_runtime::SessionId;
use flipbook_core::{AnyResolver, PageId};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

/// Maximum number of encoded pages kept for quick re-loads
const MAX_CACHED_PAGES: usize = 64;

/// Worker-side state: one resolver per open session plus a small cache of
/// encoded page bytes, so pages evicted from the window come back without
/// another transfer.
pub struct ViewerState {
    sessions: HashMap<SessionId, AnyResolver>,
    page_cache: HashMap<PageId, Vec<u8>>,
    cache_order: VecDeque<PageId>,
    next_session_id: AtomicU64,
}

impl ViewerState {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            page_cache: HashMap::new(),
            cache_order: VecDeque::new(),
            next_session_id: AtomicU64::new(0),
        }
    }

    pub fn next_id(&self) -> SessionId {
        SessionId(self.next_session_id.fetch_add(1, Ordering::SeqCst))
    }

    pub fn add_session(&mut self, session: SessionId, resolver: AnyResolver) {
        self.sessions.insert(session, resolver);
    }

    pub fn get_resolver(&self, session: &SessionId) -> Option<&AnyResolver> {
        self.sessions.get(session)
    }

    pub fn add_to_cache(&mut self, page: PageId, bytes: Vec<u8>) {
        // Remove if already exists (update LRU)
        if self.page_cache.contains_key(&page) {
            self.cache_order.retain(|k| k != &page);
        }

        // Evict LRU if full
        while self.cache_order.len() >= MAX_CACHED_PAGES {
            if let Some(old_page) = self.cache_order.pop_front() {
                self.page_cache.remove(&old_page);
            }
        }

        self.page_cache.insert(page.clone(), bytes);
        self.cache_order.push_back(page);
    }

    pub fn get_from_cache(&mut self, page: &PageId) -> Option<&Vec<u8>> {
        if self.page_cache.contains_key(page) {
            // Update LRU order
            self.cache_order.retain(|k| k != page);
            self.cache_order.push_back(page.clone());
            self.page_cache.get(page)
        } else {
            None
        }
    }

    /// Forget the session; cached bytes are keyed by page and may be shared
    pub fn remove_session(&mut self, session: SessionId) {
        self.sessions.remove(&session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_evicts_least_recently_used() {
        let mut state = ViewerState::new();
        for i in 0..MAX_CACHED_PAGES {
            state.add_to_cache(PageId::from(format!("page_{i}")), vec![i as u8]);
        }

        // Touch the oldest entry so the second oldest goes first
        assert!(state.get_from_cache(&PageId::from("page_0")).is_some());
        state.add_to_cache(PageId::from("extra"), vec![0]);

        assert!(state.get_from_cache(&PageId::from("page_0")).is_some());
        assert!(state.get_from_cache(&PageId::from("page_1")).is_none());
        assert!(state.get_from_cache(&PageId::from("extra")).is_some());
    }

    #[test]
    fn session_ids_are_unique() {
        let state = ViewerState::new();
        assert_ne!(state.next_id(), state.next_id());
    }
}
