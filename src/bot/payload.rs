/// Callback payload grammar
///
/// Button presses carry an opaque colon-delimited `action:arg1:arg2:...`
/// string. The grammar is a compatibility surface: encodings must match
/// what deployed keyboards already carry, byte for byte. Parsing is a
/// tagged-variant step with exhaustive matching so the dispatch table can
/// be reviewed and tested in isolation.
use crate::{
    error::{AppError, AppResult},
    models::{CollectionKind, ContentFilter, ContentType, Frequency},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Random { content_type: ContentType },
    RandomNext { index: usize },
    RandomPrev { index: usize },
    RandomBack { index: usize },
    GenreType { content_type: ContentType },
    Genre { content_type: ContentType, genre_id: i64 },
    Details {
        content_type: ContentType,
        item_id: i64,
        /// Present when the details view was reached from a collection
        /// page; back navigation returns to that page
        source: Option<(CollectionKind, i64)>,
    },
    AddToCollection {
        kind: CollectionKind,
        content_type: ContentType,
        item_id: i64,
    },
    RemoveFromCollection {
        kind: CollectionKind,
        content_type: ContentType,
        item_id: i64,
    },
    MyWatchlist { page: i64 },
    MyFavorites { page: i64 },
    Trending { content_type: ContentType },
    TrendingMenu,
    ConfirmRemove {
        kind: CollectionKind,
        content_type: ContentType,
        item_id: i64,
    },
    ExecuteRemove {
        kind: CollectionKind,
        content_type: ContentType,
        item_id: i64,
    },
    MainMenu,
    BrowseGenres,
    NotificationSettings,
    ToggleNotifications,
    ChangeFrequency,
    SetFrequency { frequency: Frequency },
    ChangeContentType,
    SetContentFilter { filter: ContentFilter },
    Noop,
}

fn bad(payload: &str) -> AppError {
    AppError::InvalidPayload(format!("Unrecognized payload: {}", payload))
}

fn parse_type(s: &str, payload: &str) -> AppResult<ContentType> {
    ContentType::parse(s).ok_or_else(|| bad(payload))
}

fn parse_kind(s: &str, payload: &str) -> AppResult<CollectionKind> {
    CollectionKind::parse(s).ok_or_else(|| bad(payload))
}

fn parse_num<T: std::str::FromStr>(s: &str, payload: &str) -> AppResult<T> {
    s.parse().map_err(|_| bad(payload))
}

impl Action {
    /// Parses a raw callback payload into an action
    pub fn parse(payload: &str) -> AppResult<Action> {
        let parts: Vec<&str> = payload.split(':').collect();

        let action = match parts.as_slice() {
            ["random", t] => Action::Random {
                content_type: parse_type(t, payload)?,
            },
            ["random_next", i] => Action::RandomNext {
                index: parse_num(i, payload)?,
            },
            ["random_prev", i] => Action::RandomPrev {
                index: parse_num(i, payload)?,
            },
            ["random_back", i] => Action::RandomBack {
                index: parse_num(i, payload)?,
            },
            ["genre_type", t] => Action::GenreType {
                content_type: parse_type(t, payload)?,
            },
            ["genre", t, g] => Action::Genre {
                content_type: parse_type(t, payload)?,
                genre_id: parse_num(g, payload)?,
            },
            ["details", t, id] => Action::Details {
                content_type: parse_type(t, payload)?,
                item_id: parse_num(id, payload)?,
                source: None,
            },
            ["details", t, id, src, page] => Action::Details {
                content_type: parse_type(t, payload)?,
                item_id: parse_num(id, payload)?,
                source: Some((parse_kind(src, payload)?, parse_num(page, payload)?)),
            },
            ["add_watchlist", t, id] => Action::AddToCollection {
                kind: CollectionKind::Watchlist,
                content_type: parse_type(t, payload)?,
                item_id: parse_num(id, payload)?,
            },
            ["remove_watchlist", t, id] => Action::RemoveFromCollection {
                kind: CollectionKind::Watchlist,
                content_type: parse_type(t, payload)?,
                item_id: parse_num(id, payload)?,
            },
            ["add_favorite", t, id] => Action::AddToCollection {
                kind: CollectionKind::Favorites,
                content_type: parse_type(t, payload)?,
                item_id: parse_num(id, payload)?,
            },
            ["remove_favorite", t, id] => Action::RemoveFromCollection {
                kind: CollectionKind::Favorites,
                content_type: parse_type(t, payload)?,
                item_id: parse_num(id, payload)?,
            },
            ["my_watchlist", p] => Action::MyWatchlist {
                page: parse_num(p, payload)?,
            },
            ["my_favorites", p] => Action::MyFavorites {
                page: parse_num(p, payload)?,
            },
            ["trending", t] => Action::Trending {
                content_type: parse_type(t, payload)?,
            },
            ["trending_menu"] => Action::TrendingMenu,
            ["confirm_remove", list, t, id] => Action::ConfirmRemove {
                kind: parse_kind(list, payload)?,
                content_type: parse_type(t, payload)?,
                item_id: parse_num(id, payload)?,
            },
            ["execute_remove", list, t, id] => Action::ExecuteRemove {
                kind: parse_kind(list, payload)?,
                content_type: parse_type(t, payload)?,
                item_id: parse_num(id, payload)?,
            },
            ["main_menu"] => Action::MainMenu,
            ["browse_genres"] => Action::BrowseGenres,
            ["notification_settings"] => Action::NotificationSettings,
            ["toggle_notifications"] => Action::ToggleNotifications,
            ["change_frequency"] => Action::ChangeFrequency,
            ["set_frequency", f] => Action::SetFrequency {
                frequency: Frequency::parse(f).ok_or_else(|| bad(payload))?,
            },
            ["change_content_type"] => Action::ChangeContentType,
            ["set_content_type", f] => Action::SetContentFilter {
                filter: ContentFilter::parse(f).ok_or_else(|| bad(payload))?,
            },
            ["noop"] => Action::Noop,
            _ => return Err(bad(payload)),
        };

        Ok(action)
    }

    /// Encodes an action back to its payload string. `parse(encode(a)) == a`
    /// for every action.
    pub fn encode(&self) -> String {
        match self {
            Action::Random { content_type } => format!("random:{}", content_type),
            Action::RandomNext { index } => format!("random_next:{}", index),
            Action::RandomPrev { index } => format!("random_prev:{}", index),
            Action::RandomBack { index } => format!("random_back:{}", index),
            Action::GenreType { content_type } => format!("genre_type:{}", content_type),
            Action::Genre {
                content_type,
                genre_id,
            } => format!("genre:{}:{}", content_type, genre_id),
            Action::Details {
                content_type,
                item_id,
                source: None,
            } => format!("details:{}:{}", content_type, item_id),
            Action::Details {
                content_type,
                item_id,
                source: Some((kind, page)),
            } => format!(
                "details:{}:{}:{}:{}",
                content_type,
                item_id,
                kind.as_str(),
                page
            ),
            Action::AddToCollection {
                kind: CollectionKind::Watchlist,
                content_type,
                item_id,
            } => format!("add_watchlist:{}:{}", content_type, item_id),
            Action::AddToCollection {
                kind: CollectionKind::Favorites,
                content_type,
                item_id,
            } => format!("add_favorite:{}:{}", content_type, item_id),
            Action::RemoveFromCollection {
                kind: CollectionKind::Watchlist,
                content_type,
                item_id,
            } => format!("remove_watchlist:{}:{}", content_type, item_id),
            Action::RemoveFromCollection {
                kind: CollectionKind::Favorites,
                content_type,
                item_id,
            } => format!("remove_favorite:{}:{}", content_type, item_id),
            Action::MyWatchlist { page } => format!("my_watchlist:{}", page),
            Action::MyFavorites { page } => format!("my_favorites:{}", page),
            Action::Trending { content_type } => format!("trending:{}", content_type),
            Action::TrendingMenu => "trending_menu".to_string(),
            Action::ConfirmRemove {
                kind,
                content_type,
                item_id,
            } => format!(
                "confirm_remove:{}:{}:{}",
                kind.as_str(),
                content_type,
                item_id
            ),
            Action::ExecuteRemove {
                kind,
                content_type,
                item_id,
            } => format!(
                "execute_remove:{}:{}:{}",
                kind.as_str(),
                content_type,
                item_id
            ),
            Action::MainMenu => "main_menu".to_string(),
            Action::BrowseGenres => "browse_genres".to_string(),
            Action::NotificationSettings => "notification_settings".to_string(),
            Action::ToggleNotifications => "toggle_notifications".to_string(),
            Action::ChangeFrequency => "change_frequency".to_string(),
            Action::SetFrequency { frequency } => {
                format!("set_frequency:{}", frequency.as_str())
            }
            Action::ChangeContentType => "change_content_type".to_string(),
            Action::SetContentFilter { filter } => {
                format!("set_content_type:{}", filter.as_str())
            }
            Action::Noop => "noop".to_string(),
        }
    }
}
