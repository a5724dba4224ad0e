/// Per-user browse sessions
///
/// A session holds one bounded, shuffled result page and a cyclic cursor.
/// Sessions are replaced wholesale on refresh; only the cursor mutates in
/// place. A session older than the TTL is treated as absent by display
/// paths, which refetch with the same parameters.
use crate::models::{CatalogItem, ContentType, SourceKind};
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

/// Upper bound on items held per session
pub const SESSION_CAPACITY: usize = 20;

/// A session older than this is discarded and refetched on display
pub const SESSION_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug)]
pub struct BrowseSession {
    items: Vec<CatalogItem>,
    pub content_type: ContentType,
    pub genre_id: Option<i64>,
    pub source: SourceKind,
    current_index: usize,
    created_at: Instant,
}

impl BrowseSession {
    /// Builds a session from fetched candidates: shuffle, truncate to
    /// capacity, cursor at 0. Returns None when there is nothing to show,
    /// so an empty session can never become active.
    pub fn new(
        mut items: Vec<CatalogItem>,
        content_type: ContentType,
        genre_id: Option<i64>,
        source: SourceKind,
    ) -> Option<Self> {
        if items.is_empty() {
            return None;
        }

        items.shuffle(&mut rand::thread_rng());
        items.truncate(SESSION_CAPACITY);

        Some(Self {
            items,
            content_type,
            genre_id,
            source,
            current_index: 0,
            created_at: Instant::now(),
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> &CatalogItem {
        &self.items[self.current_index]
    }

    /// Moves the cursor to the item after `index`, wrapping past the end
    pub fn next_from(&mut self, index: usize) -> &CatalogItem {
        self.current_index = (index + 1) % self.items.len();
        self.current()
    }

    /// Moves the cursor to the item before `index`, wrapping below zero
    pub fn prev_from(&mut self, index: usize) -> &CatalogItem {
        let len = self.items.len();
        self.current_index = (index % len + len - 1) % len;
        self.current()
    }

    /// Repositions the cursor at `index` (modulo length, for stale buttons)
    pub fn seek(&mut self, index: usize) -> &CatalogItem {
        self.current_index = index % self.items.len();
        self.current()
    }

    pub fn is_stale(&self) -> bool {
        self.created_at.elapsed() > SESSION_TTL
    }

    #[cfg(test)]
    pub(crate) fn backdate(&mut self, by: Duration) {
        self.created_at -= by;
    }
}

/// Map of user id to browse session.
///
/// Entries are guarded independently: handlers lock one user's entry for
/// the whole fetch-store-render sequence without blocking other users.
/// The outer lock is held only long enough to find or insert an entry.
#[derive(Clone, Default)]
pub struct SessionMap {
    inner: Arc<RwLock<HashMap<i64, Arc<Mutex<Option<BrowseSession>>>>>>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this user's session slot, creating an empty one if absent
    pub async fn entry(&self, user_id: i64) -> Arc<Mutex<Option<BrowseSession>>> {
        {
            let map = self.inner.read().await;
            if let Some(slot) = map.get(&user_id) {
                return Arc::clone(slot);
            }
        }

        let mut map = self.inner.write().await;
        Arc::clone(map.entry(user_id).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(count: usize) -> Vec<CatalogItem> {
        (0..count as i64)
            .map(|id| CatalogItem {
                id,
                content_type: ContentType::Movie,
                title: format!("Item {}", id),
                poster_path: None,
                release_date: None,
                vote_average: 7.0,
                vote_count: 100,
                popularity: 1.0,
                genre_ids: vec![],
            })
            .collect()
    }

    fn session(count: usize) -> BrowseSession {
        BrowseSession::new(items(count), ContentType::Movie, None, SourceKind::Random).unwrap()
    }

    #[test]
    fn test_empty_candidates_yield_no_session() {
        assert!(BrowseSession::new(vec![], ContentType::Movie, None, SourceKind::Random).is_none());
    }

    #[test]
    fn test_truncates_to_capacity() {
        let session = session(50);
        assert_eq!(session.len(), SESSION_CAPACITY);
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_next_wraps_forward() {
        let mut session = session(5);
        assert_eq!(session.current_index(), 0);
        session.next_from(4);
        assert_eq!(session.current_index(), 0);
        session.next_from(0);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_three_previous_presses_from_zero() {
        // 5 items, start at 0: 0 -> 4 -> 3 -> 2
        let mut session = session(5);
        session.prev_from(0);
        assert_eq!(session.current_index(), 4);
        session.prev_from(4);
        assert_eq!(session.current_index(), 3);
        session.prev_from(3);
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn test_cursor_always_in_bounds() {
        let mut session = session(7);
        let mut index = 0;
        for step in 0..50 {
            let id = if step % 3 == 0 {
                session.prev_from(index).id
            } else {
                session.next_from(index).id
            };
            index = session.current_index();
            assert!(index < session.len());
            assert_eq!(id, session.current().id);
        }
    }

    #[test]
    fn test_seek_wraps_modulo_len() {
        let mut session = session(5);
        session.seek(12);
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn test_staleness_after_ttl() {
        let mut session = session(3);
        assert!(!session.is_stale());
        session.backdate(SESSION_TTL + Duration::from_secs(60));
        assert!(session.is_stale());
    }

    #[tokio::test]
    async fn test_session_map_entries_are_per_user() {
        let map = SessionMap::new();
        let a = map.entry(1).await;
        let b = map.entry(2).await;
        let a_again = map.entry(1).await;

        *a.lock().await = Some(session(3));
        assert!(a_again.lock().await.is_some());
        assert!(b.lock().await.is_none());
    }
}
