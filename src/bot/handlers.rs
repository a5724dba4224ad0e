/// Action dispatch
///
/// One entry point, `dispatch`, maps a parsed action to store/catalog
/// calls and a rendered view. Every failure is contained to the action
/// being handled: collection statuses become toasts, remote failures
/// become fallback views, and nothing here can take down the update loop.
use crate::{
    bot::payload::Action,
    bot::view::{self, View},
    db::{CollectionStore, PreferenceStore},
    error::AppResult,
    models::{
        genre_name, AddOutcome, CatalogItem, CollectionKind, ContentType, NotificationPreference,
        RemoveOutcome, SourceKind,
    },
    services::{
        providers::CatalogProvider, selector::RecommendationSelector, session::BrowseSession,
        SessionMap,
    },
};
use std::sync::Arc;

/// Collection pages show five entries, matching the deployed keyboards
const COLLECTION_PAGE_SIZE: i64 = 5;

/// Everything dispatch needs; constructed once at startup and shared
pub struct Deps {
    pub provider: Arc<dyn CatalogProvider>,
    pub selector: RecommendationSelector,
    pub collections: Arc<dyn CollectionStore>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub sessions: SessionMap,
}

/// What the transport layer should do after an action
#[derive(Debug, Default)]
pub struct Outcome {
    /// Replacement view, if the screen should change
    pub view: Option<View>,
    /// Short acknowledgement for the button press
    pub toast: Option<String>,
}

impl Outcome {
    fn show(view: View) -> Self {
        Self {
            view: Some(view),
            toast: None,
        }
    }

    fn with_toast(mut self, toast: impl Into<String>) -> Self {
        self.toast = Some(toast.into());
        self
    }
}

/// A bot command, resolved to either an action or a direct view
pub enum CommandReply {
    Act(Action),
    Show(View),
}

/// Maps a slash command to its reply. Commands may carry a `@botname`
/// suffix in group chats.
pub fn handle_command(text: &str, first_name: &str) -> Option<CommandReply> {
    let command = text
        .split_whitespace()
        .next()?
        .split('@')
        .next()
        .unwrap_or_default();

    let reply = match command {
        "/start" => CommandReply::Show(view::welcome(first_name)),
        "/random_movie" => CommandReply::Act(Action::Random {
            content_type: ContentType::Movie,
        }),
        "/random_tv" => CommandReply::Act(Action::Random {
            content_type: ContentType::Tv,
        }),
        "/genres" => CommandReply::Act(Action::BrowseGenres),
        "/watchlist" => CommandReply::Act(Action::MyWatchlist { page: 1 }),
        "/favorites" => CommandReply::Act(Action::MyFavorites { page: 1 }),
        "/remove" => CommandReply::Show(view::remove_menu()),
        "/trending" => CommandReply::Show(view::trending_menu()),
        _ => return None,
    };

    Some(reply)
}

/// Handles one parsed action for one user
pub async fn dispatch(deps: &Deps, user_id: i64, action: Action) -> AppResult<Outcome> {
    match action {
        Action::Random { content_type } => {
            start_session(deps, user_id, content_type, None, SourceKind::Random).await
        }
        Action::Genre {
            content_type,
            genre_id,
        } => start_session(deps, user_id, content_type, Some(genre_id), SourceKind::Genre).await,
        Action::Trending { content_type } => {
            start_session(deps, user_id, content_type, None, SourceKind::Trending).await
        }
        Action::TrendingMenu => Ok(Outcome::show(view::trending_menu())),

        Action::RandomNext { index } => navigate(deps, user_id, Nav::Next(index)).await,
        Action::RandomPrev { index } => navigate(deps, user_id, Nav::Prev(index)).await,
        Action::RandomBack { index } => navigate(deps, user_id, Nav::Seek(index)).await,

        Action::Details {
            content_type,
            item_id,
            source,
        } => show_details(deps, user_id, content_type, item_id, source).await,

        Action::AddToCollection {
            kind,
            content_type,
            item_id,
        } => add_to_collection(deps, user_id, kind, content_type, item_id).await,
        Action::RemoveFromCollection {
            kind,
            content_type,
            item_id,
        } => remove_from_collection(deps, user_id, kind, content_type, item_id).await,

        Action::MyWatchlist { page } => {
            show_collection(deps, user_id, CollectionKind::Watchlist, page).await
        }
        Action::MyFavorites { page } => {
            show_collection(deps, user_id, CollectionKind::Favorites, page).await
        }

        Action::ConfirmRemove {
            kind,
            content_type,
            item_id,
        } => Ok(Outcome::show(view::remove_confirmation(
            kind,
            content_type,
            item_id,
        ))),
        Action::ExecuteRemove {
            kind,
            content_type,
            item_id,
        } => execute_remove(deps, user_id, kind, content_type, item_id).await,

        Action::MainMenu => Ok(Outcome::show(view::main_menu())),
        Action::BrowseGenres => Ok(Outcome::show(view::genre_type_menu())),
        Action::GenreType { content_type } => Ok(Outcome::show(view::genre_menu(content_type))),

        Action::NotificationSettings => notification_settings(deps, user_id).await,
        Action::ToggleNotifications => {
            mutate_preference(deps, user_id, |pref| pref.enabled = !pref.enabled).await
        }
        Action::ChangeFrequency => Ok(Outcome::show(view::frequency_menu())),
        Action::SetFrequency { frequency } => {
            mutate_preference(deps, user_id, |pref| pref.frequency = frequency).await
        }
        Action::ChangeContentType => Ok(Outcome::show(view::content_type_menu())),
        Action::SetContentFilter { filter } => {
            mutate_preference(deps, user_id, |pref| pref.content_filter = filter).await
        }

        Action::Noop => Ok(Outcome::default()),
    }
}

// ---------------------------------------------------------------------------
// Browse sessions
// ---------------------------------------------------------------------------

enum Nav {
    Next(usize),
    Prev(usize),
    Seek(usize),
}

async fn fetch_candidates(
    deps: &Deps,
    content_type: ContentType,
    genre_id: Option<i64>,
    source: SourceKind,
) -> AppResult<Vec<CatalogItem>> {
    match source {
        SourceKind::Trending => deps.provider.trending(content_type).await,
        SourceKind::Random | SourceKind::Genre => {
            deps.selector.select_page(content_type, genre_id).await
        }
    }
}

/// Fetches a fresh result page and replaces the user's session wholesale.
/// The session slot stays locked across fetch, store, and render so a
/// second action from the same user cannot interleave.
async fn start_session(
    deps: &Deps,
    user_id: i64,
    content_type: ContentType,
    genre_id: Option<i64>,
    source: SourceKind,
) -> AppResult<Outcome> {
    let slot = deps.sessions.entry(user_id).await;
    let mut guard = slot.lock().await;

    let candidates = fetch_candidates(deps, content_type, genre_id, source).await?;

    match BrowseSession::new(candidates, content_type, genre_id, source) {
        Some(session) => {
            tracing::info!(
                user_id,
                content_type = %content_type,
                genre_id = ?genre_id,
                items = session.len(),
                "Browse session created"
            );
            let card = render_card(deps, user_id, &session).await?;
            *guard = Some(session);
            Ok(Outcome::show(card))
        }
        None => {
            *guard = None;
            let genre = genre_id.and_then(|g| genre_name(content_type, g));
            Ok(Outcome::show(view::no_results(content_type, genre)))
        }
    }
}

async fn navigate(deps: &Deps, user_id: i64, nav: Nav) -> AppResult<Outcome> {
    let slot = deps.sessions.entry(user_id).await;
    let mut guard = slot.lock().await;

    let Some(session) = guard.as_mut() else {
        return Ok(Outcome::show(view::session_expired()));
    };

    if session.is_stale() || session.is_empty() {
        // Refetch with the same parameters, cursor back at the start
        let (content_type, genre_id, source) =
            (session.content_type, session.genre_id, session.source);
        tracing::debug!(user_id, "Session stale, refreshing");

        let candidates = fetch_candidates(deps, content_type, genre_id, source).await?;
        return match BrowseSession::new(candidates, content_type, genre_id, source) {
            Some(fresh) => {
                let card = render_card(deps, user_id, &fresh).await?;
                *guard = Some(fresh);
                Ok(Outcome::show(card))
            }
            None => {
                *guard = None;
                let genre = genre_id.and_then(|g| genre_name(content_type, g));
                Ok(Outcome::show(view::no_results(content_type, genre)))
            }
        };
    }

    match nav {
        Nav::Next(index) => session.next_from(index),
        Nav::Prev(index) => session.prev_from(index),
        Nav::Seek(index) => session.seek(index),
    };

    let card = render_card(deps, user_id, session).await?;
    Ok(Outcome::show(card))
}

/// Renders the session's current item. Collection membership is looked up
/// at display time: it can change between two displays of the same item.
async fn render_card(deps: &Deps, user_id: i64, session: &BrowseSession) -> AppResult<View> {
    let item = session.current();
    let (in_watchlist, in_favorites) = membership(deps, user_id, item).await?;
    Ok(view::browse_card(
        item,
        session.current_index(),
        session.len(),
        in_watchlist,
        in_favorites,
    ))
}

async fn membership(deps: &Deps, user_id: i64, item: &CatalogItem) -> AppResult<(bool, bool)> {
    let in_watchlist = deps
        .collections
        .contains(
            CollectionKind::Watchlist,
            user_id,
            item.content_type,
            item.id,
        )
        .await?;
    let in_favorites = deps
        .collections
        .contains(
            CollectionKind::Favorites,
            user_id,
            item.content_type,
            item.id,
        )
        .await?;
    Ok((in_watchlist, in_favorites))
}

// ---------------------------------------------------------------------------
// Details
// ---------------------------------------------------------------------------

async fn show_details(
    deps: &Deps,
    user_id: i64,
    content_type: ContentType,
    item_id: i64,
    source: Option<(CollectionKind, i64)>,
) -> AppResult<Outcome> {
    let details = match deps.provider.details(content_type, item_id).await {
        Ok(details) => details,
        Err(e) => {
            tracing::warn!(user_id, item_id, error = %e, "Details lookup failed");
            return Ok(Outcome::show(view::error_view()).with_toast("Failed to load details"));
        }
    };

    let back = match source {
        Some((CollectionKind::Watchlist, page)) => Action::MyWatchlist { page },
        Some((CollectionKind::Favorites, page)) => Action::MyFavorites { page },
        None => {
            // Back to the browse card the user came from, if the session
            // is still around
            let slot = deps.sessions.entry(user_id).await;
            let guard = slot.lock().await;
            match guard.as_ref() {
                Some(session) => Action::RandomBack {
                    index: session.current_index(),
                },
                None => Action::Random { content_type },
            }
        }
    };

    Ok(Outcome::show(view::details_view(&details, back)))
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

fn list_noun(kind: CollectionKind) -> &'static str {
    match kind {
        CollectionKind::Watchlist => "watchlist",
        CollectionKind::Favorites => "favorites",
    }
}

async fn add_to_collection(
    deps: &Deps,
    user_id: i64,
    kind: CollectionKind,
    content_type: ContentType,
    item_id: i64,
) -> AppResult<Outcome> {
    // The card only carries the item id; fetch title and poster to store
    let details = match deps.provider.details(content_type, item_id).await {
        Ok(details) => details,
        Err(e) => {
            tracing::warn!(user_id, item_id, error = %e, "Add lookup failed");
            return Ok(Outcome::default().with_toast(format!(
                "Failed to add to {}",
                list_noun(kind)
            )));
        }
    };

    let outcome = deps
        .collections
        .add(
            kind,
            user_id,
            content_type,
            item_id,
            &details.item.title,
            details.item.poster_path.clone(),
        )
        .await?;

    let toast = match (outcome, kind) {
        (AddOutcome::Inserted, CollectionKind::Watchlist) => "Added to watchlist!".to_string(),
        (AddOutcome::Inserted, CollectionKind::Favorites) => "Added to favorites! ❤️".to_string(),
        (AddOutcome::AlreadyExists, _) => format!("Already in {}", list_noun(kind)),
    };

    let view = redisplay_item(deps, user_id, &details.item).await?;
    Ok(Outcome::show(view).with_toast(toast))
}

async fn remove_from_collection(
    deps: &Deps,
    user_id: i64,
    kind: CollectionKind,
    content_type: ContentType,
    item_id: i64,
) -> AppResult<Outcome> {
    let outcome = deps
        .collections
        .remove(kind, user_id, content_type, item_id)
        .await?;

    let toast = match outcome {
        RemoveOutcome::Removed => format!("Removed from {}!", list_noun(kind)),
        RemoveOutcome::NotFound => format!("Item not in {}", list_noun(kind)),
    };

    // Refresh the card so the bookmark button flips state
    let slot = deps.sessions.entry(user_id).await;
    let guard = slot.lock().await;
    if let Some(session) = guard.as_ref() {
        if session.current().id == item_id {
            let card = render_card(deps, user_id, session).await?;
            return Ok(Outcome::show(card).with_toast(toast));
        }
    }
    drop(guard);

    Ok(Outcome::default().with_toast(toast))
}

/// Re-renders the item the user just bookmarked: the current session card
/// when it matches, otherwise a standalone card for the item
async fn redisplay_item(deps: &Deps, user_id: i64, item: &CatalogItem) -> AppResult<View> {
    let slot = deps.sessions.entry(user_id).await;
    let guard = slot.lock().await;
    if let Some(session) = guard.as_ref() {
        if session.current().id == item.id {
            return render_card(deps, user_id, session).await;
        }
    }
    drop(guard);

    let (in_watchlist, in_favorites) = membership(deps, user_id, item).await?;
    Ok(view::browse_card(item, 0, 1, in_watchlist, in_favorites))
}

async fn show_collection(
    deps: &Deps,
    user_id: i64,
    kind: CollectionKind,
    page: i64,
) -> AppResult<Outcome> {
    let total = deps.collections.count(kind, user_id).await?;
    if total == 0 {
        return Ok(Outcome::show(view::collection_empty(kind)));
    }

    let total_pages = (total + COLLECTION_PAGE_SIZE - 1) / COLLECTION_PAGE_SIZE;
    let page = page.clamp(1, total_pages);
    let entries = deps
        .collections
        .list(
            kind,
            user_id,
            (page - 1) * COLLECTION_PAGE_SIZE,
            COLLECTION_PAGE_SIZE,
        )
        .await?;

    Ok(Outcome::show(view::collection_page(
        kind,
        &entries,
        page,
        total_pages,
    )))
}

async fn execute_remove(
    deps: &Deps,
    user_id: i64,
    kind: CollectionKind,
    content_type: ContentType,
    item_id: i64,
) -> AppResult<Outcome> {
    let outcome = deps
        .collections
        .remove(kind, user_id, content_type, item_id)
        .await?;

    let toast = match outcome {
        RemoveOutcome::Removed => format!("Removed from {}!", list_noun(kind)),
        RemoveOutcome::NotFound => format!("Item not in {}", list_noun(kind)),
    };

    let listing = show_collection(deps, user_id, kind, 1).await?;
    Ok(Outcome {
        view: listing.view,
        toast: Some(toast),
    })
}

// ---------------------------------------------------------------------------
// Notification preferences
// ---------------------------------------------------------------------------

async fn notification_settings(deps: &Deps, user_id: i64) -> AppResult<Outcome> {
    let pref = deps
        .preferences
        .get(user_id)
        .await?
        .unwrap_or_default();
    Ok(Outcome::show(view::notification_settings(&pref)))
}

/// All preference changes are upserts over the defaults when no prior
/// record exists
async fn mutate_preference<F>(deps: &Deps, user_id: i64, mutate: F) -> AppResult<Outcome>
where
    F: FnOnce(&mut NotificationPreference),
{
    let mut pref = deps
        .preferences
        .get(user_id)
        .await?
        .unwrap_or_default();
    mutate(&mut pref);
    deps.preferences.upsert(user_id, pref).await?;

    tracing::info!(
        user_id,
        enabled = pref.enabled,
        frequency = pref.frequency.as_str(),
        content = pref.content_filter.as_str(),
        "Notification preference updated"
    );

    Ok(Outcome::show(view::notification_settings(&pref)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MockCollectionStore, MockPreferenceStore};
    use crate::models::Frequency;
    use crate::services::providers::MockCatalogProvider;
    use chrono::NaiveDate;

    fn item(id: i64) -> CatalogItem {
        CatalogItem {
            id,
            content_type: ContentType::Movie,
            title: format!("Item {}", id),
            poster_path: Some(format!("/poster{}.jpg", id)),
            release_date: NaiveDate::from_ymd_opt(2015, 1, 1),
            vote_average: 7.5,
            vote_count: 500,
            popularity: 10.0,
            genre_ids: vec![28],
        }
    }

    fn deps(
        provider: MockCatalogProvider,
        collections: MockCollectionStore,
        preferences: MockPreferenceStore,
    ) -> Deps {
        let provider: Arc<dyn CatalogProvider> = Arc::new(provider);
        Deps {
            selector: RecommendationSelector::new(Arc::clone(&provider)),
            provider,
            collections: Arc::new(collections),
            preferences: Arc::new(preferences),
            sessions: SessionMap::new(),
        }
    }

    #[tokio::test]
    async fn test_random_movie_creates_session_with_add_state_buttons() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_top_rated()
            .returning(|_, _| Ok((0..30).map(item).collect()));

        let mut collections = MockCollectionStore::new();
        collections.expect_contains().returning(|_, _, _, _| Ok(false));

        let deps = deps(provider, collections, MockPreferenceStore::new());
        let outcome = dispatch(
            &deps,
            1,
            Action::Random {
                content_type: ContentType::Movie,
            },
        )
        .await
        .unwrap();

        let view = outcome.view.unwrap();
        assert!(view.text.contains("1/20"));
        assert!(view
            .keyboard
            .iter()
            .flatten()
            .any(|b| b.payload.starts_with("add_watchlist:movie:")));
        assert!(view
            .keyboard
            .iter()
            .flatten()
            .any(|b| b.payload.starts_with("add_favorite:movie:")));
    }

    #[tokio::test]
    async fn test_rare_genre_with_no_results_shows_fallback_message() {
        let mut provider = MockCatalogProvider::new();
        // Strict query and the single relaxed fallback both come back empty
        provider
            .expect_discover()
            .times(2)
            .returning(|_, _, _, _, _| Ok(vec![]));

        let deps = deps(
            provider,
            MockCollectionStore::new(),
            MockPreferenceStore::new(),
        );
        let outcome = dispatch(
            &deps,
            1,
            Action::Genre {
                content_type: ContentType::Movie,
                genre_id: 99,
            },
        )
        .await
        .unwrap();

        let view = outcome.view.unwrap();
        assert_eq!(
            view.text,
            "No movies found in Documentary. Try another genre!"
        );
        assert!(view.button_payload("🔍 Browse").is_some());
        assert!(view.button_payload("🏠 Main Menu").is_some());
    }

    #[tokio::test]
    async fn test_stale_session_refetches_and_resets_cursor() {
        use crate::services::session::SESSION_TTL;
        use std::time::Duration;

        let mut provider = MockCatalogProvider::new();
        provider
            .expect_top_rated()
            .returning(|_, _| Ok((0..10).map(item).collect()));
        let mut collections = MockCollectionStore::new();
        collections.expect_contains().returning(|_, _, _, _| Ok(false));

        let deps = deps(provider, collections, MockPreferenceStore::new());
        dispatch(
            &deps,
            1,
            Action::Random {
                content_type: ContentType::Movie,
            },
        )
        .await
        .unwrap();
        dispatch(&deps, 1, Action::RandomNext { index: 0 })
            .await
            .unwrap();

        {
            let slot = deps.sessions.entry(1).await;
            let mut guard = slot.lock().await;
            guard
                .as_mut()
                .unwrap()
                .backdate(SESSION_TTL + Duration::from_secs(60));
        }

        // Navigation on an expired session refetches with the same
        // parameters and shows the first card again
        let outcome = dispatch(&deps, 1, Action::RandomNext { index: 1 })
            .await
            .unwrap();
        assert!(outcome.view.unwrap().text.contains("1/10"));

        let slot = deps.sessions.entry(1).await;
        let guard = slot.lock().await;
        let session = guard.as_ref().unwrap();
        assert_eq!(session.current_index(), 0);
        assert!(!session.is_stale());
    }

    #[tokio::test]
    async fn test_navigation_without_session_shows_expired_view() {
        let deps = deps(
            MockCatalogProvider::new(),
            MockCollectionStore::new(),
            MockPreferenceStore::new(),
        );
        let outcome = dispatch(&deps, 1, Action::RandomNext { index: 3 })
            .await
            .unwrap();
        assert!(outcome.view.unwrap().text.contains("expired"));
    }

    #[tokio::test]
    async fn test_add_duplicate_reports_already_exists() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_details().returning(|_, id| {
            Ok(crate::models::ItemDetails {
                item: item(id),
                overview: None,
                trailer_url: None,
            })
        });

        let mut collections = MockCollectionStore::new();
        collections
            .expect_add()
            .returning(|_, _, _, _, _, _| Ok(AddOutcome::AlreadyExists));
        collections.expect_contains().returning(|_, _, _, _| Ok(true));

        let deps = deps(provider, collections, MockPreferenceStore::new());
        let outcome = dispatch(
            &deps,
            1,
            Action::AddToCollection {
                kind: CollectionKind::Watchlist,
                content_type: ContentType::Movie,
                item_id: 603,
            },
        )
        .await
        .unwrap();

        assert_eq!(outcome.toast.as_deref(), Some("Already in watchlist"));
        // Membership true: redisplayed card is in remove state
        let view = outcome.view.unwrap();
        assert!(view
            .keyboard
            .iter()
            .flatten()
            .any(|b| b.payload == "remove_watchlist:movie:603"));
    }

    #[tokio::test]
    async fn test_remove_missing_reports_not_found() {
        let mut collections = MockCollectionStore::new();
        collections
            .expect_remove()
            .returning(|_, _, _, _| Ok(RemoveOutcome::NotFound));

        let deps = deps(
            MockCatalogProvider::new(),
            collections,
            MockPreferenceStore::new(),
        );
        let outcome = dispatch(
            &deps,
            1,
            Action::RemoveFromCollection {
                kind: CollectionKind::Favorites,
                content_type: ContentType::Movie,
                item_id: 42,
            },
        )
        .await
        .unwrap();

        assert_eq!(outcome.toast.as_deref(), Some("Item not in favorites"));
    }

    #[tokio::test]
    async fn test_empty_watchlist_shows_empty_view() {
        let mut collections = MockCollectionStore::new();
        collections.expect_count().returning(|_, _| Ok(0));

        let deps = deps(
            MockCatalogProvider::new(),
            collections,
            MockPreferenceStore::new(),
        );
        let outcome = dispatch(&deps, 1, Action::MyWatchlist { page: 1 })
            .await
            .unwrap();
        assert!(outcome.view.unwrap().text.contains("watchlist is empty"));
    }

    #[tokio::test]
    async fn test_collection_page_clamps_out_of_range_page() {
        let mut collections = MockCollectionStore::new();
        collections.expect_count().returning(|_, _| Ok(7));
        collections
            .expect_list()
            .withf(|_, _, offset, limit| *offset == 5 && *limit == 5)
            .returning(|_, _, _, _| Ok(vec![]));

        let deps = deps(
            MockCatalogProvider::new(),
            collections,
            MockPreferenceStore::new(),
        );
        // 7 entries = 2 pages; page 99 clamps to 2 (offset 5)
        let outcome = dispatch(&deps, 1, Action::MyWatchlist { page: 99 })
            .await
            .unwrap();
        assert!(outcome.view.unwrap().text.contains("Page 2/2"));
    }

    #[tokio::test]
    async fn test_toggle_creates_enabled_preference_from_defaults() {
        let mut preferences = MockPreferenceStore::new();
        preferences.expect_get().returning(|_| Ok(None));
        preferences
            .expect_upsert()
            .withf(|_, pref| {
                pref.enabled
                    && pref.frequency == Frequency::Weekly
                    && pref.content_filter == crate::models::ContentFilter::Both
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let deps = deps(
            MockCatalogProvider::new(),
            MockCollectionStore::new(),
            preferences,
        );
        let outcome = dispatch(&deps, 1, Action::ToggleNotifications)
            .await
            .unwrap();
        assert!(outcome.view.unwrap().text.contains("✅ Enabled"));
    }

    #[tokio::test]
    async fn test_set_frequency_preserves_other_fields() {
        let mut preferences = MockPreferenceStore::new();
        preferences.expect_get().returning(|_| {
            Ok(Some(NotificationPreference {
                enabled: true,
                frequency: Frequency::Weekly,
                content_filter: crate::models::ContentFilter::Movies,
            }))
        });
        preferences
            .expect_upsert()
            .withf(|_, pref| {
                pref.enabled
                    && pref.frequency == Frequency::Monthly
                    && pref.content_filter == crate::models::ContentFilter::Movies
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let deps = deps(
            MockCatalogProvider::new(),
            MockCollectionStore::new(),
            preferences,
        );
        dispatch(
            &deps,
            1,
            Action::SetFrequency {
                frequency: Frequency::Monthly,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_noop_does_nothing() {
        let deps = deps(
            MockCatalogProvider::new(),
            MockCollectionStore::new(),
            MockPreferenceStore::new(),
        );
        let outcome = dispatch(&deps, 1, Action::Noop).await.unwrap();
        assert!(outcome.view.is_none());
        assert!(outcome.toast.is_none());
    }

    #[test]
    fn test_command_mapping() {
        assert!(matches!(
            handle_command("/random_movie", "Ada"),
            Some(CommandReply::Act(Action::Random {
                content_type: ContentType::Movie
            }))
        ));
        assert!(matches!(
            handle_command("/watchlist@wiseflix_bot", "Ada"),
            Some(CommandReply::Act(Action::MyWatchlist { page: 1 }))
        ));
        assert!(matches!(
            handle_command("/start", "Ada"),
            Some(CommandReply::Show(_))
        ));
        assert!(handle_command("hello there", "Ada").is_none());
    }
}
