/// Rendered views: text or photo+caption plus an inline button grid.
///
/// Rendering is pure; the transport layer decides whether a view becomes a
/// fresh message or an in-place edit.
use crate::{
    bot::payload::Action,
    models::{
        genres_for, CatalogItem, CollectionEntry, CollectionKind, ContentFilter, ContentType,
        Frequency, ItemDetails, NotificationPreference,
    },
};

pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub payload: String,
}

impl Button {
    pub fn new(label: impl Into<String>, action: &Action) -> Self {
        Self {
            label: label.into(),
            payload: action.encode(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub text: String,
    pub photo_url: Option<String>,
    pub keyboard: Vec<Vec<Button>>,
}

impl View {
    fn text_view(text: impl Into<String>, keyboard: Vec<Vec<Button>>) -> Self {
        Self {
            text: text.into(),
            photo_url: None,
            keyboard,
        }
    }

    /// Inline keyboard in Bot API shape
    pub fn reply_markup(&self) -> serde_json::Value {
        let rows: Vec<Vec<serde_json::Value>> = self
            .keyboard
            .iter()
            .map(|row| {
                row.iter()
                    .map(|b| {
                        serde_json::json!({
                            "text": b.label,
                            "callback_data": b.payload,
                        })
                    })
                    .collect()
            })
            .collect();
        serde_json::json!({ "inline_keyboard": rows })
    }

    /// Finds a button payload by label, for assertions in tests
    pub fn button_payload(&self, label: &str) -> Option<&str> {
        self.keyboard
            .iter()
            .flatten()
            .find(|b| b.label == label)
            .map(|b| b.payload.as_str())
    }
}

fn content_noun(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Movie => "movies",
        ContentType::Tv => "TV shows",
    }
}

fn type_icon(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Movie => "🎬",
        ContentType::Tv => "📺",
    }
}

fn menu_rows() -> Vec<Vec<Button>> {
    vec![
        vec![
            Button::new(
                "🎬 Random Movie",
                &Action::Random {
                    content_type: ContentType::Movie,
                },
            ),
            Button::new(
                "📺 Random TV Show",
                &Action::Random {
                    content_type: ContentType::Tv,
                },
            ),
        ],
        vec![
            Button::new("🔍 Browse Genres", &Action::BrowseGenres),
            Button::new("🔥 Trending", &Action::TrendingMenu),
        ],
        vec![
            Button::new("➕ My Watchlist", &Action::MyWatchlist { page: 1 }),
            Button::new("❤️ My Favorites", &Action::MyFavorites { page: 1 }),
        ],
        vec![Button::new("🔔 Notifications", &Action::NotificationSettings)],
    ]
}

pub fn welcome(first_name: &str) -> View {
    View::text_view(
        format!(
            "🎉 Welcome {}!\n\nDiscover movies and TV shows with these options:",
            first_name
        ),
        menu_rows(),
    )
}

pub fn main_menu() -> View {
    View::text_view(
        "🏠 Main Menu\n\nWhat would you like to do?".to_string(),
        menu_rows(),
    )
}

/// One browse-session card: poster, title, year, position, and bookmark
/// buttons whose state reflects current collection membership
pub fn browse_card(
    item: &CatalogItem,
    index: usize,
    total: usize,
    in_watchlist: bool,
    in_favorites: bool,
) -> View {
    let year = item
        .release_year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let text = format!(
        "{} ({})\n⭐ {:.1}/10  ·  {}/{}",
        item.title,
        year,
        item.vote_average,
        index + 1,
        total
    );

    let watchlist_button = if in_watchlist {
        Button::new(
            "✅ In Watchlist",
            &Action::RemoveFromCollection {
                kind: CollectionKind::Watchlist,
                content_type: item.content_type,
                item_id: item.id,
            },
        )
    } else {
        Button::new(
            "➕ Add to Watchlist",
            &Action::AddToCollection {
                kind: CollectionKind::Watchlist,
                content_type: item.content_type,
                item_id: item.id,
            },
        )
    };
    let favorite_button = if in_favorites {
        Button::new(
            "❤️ In Favorites",
            &Action::RemoveFromCollection {
                kind: CollectionKind::Favorites,
                content_type: item.content_type,
                item_id: item.id,
            },
        )
    } else {
        Button::new(
            "⭐ Add to Favorites",
            &Action::AddToCollection {
                kind: CollectionKind::Favorites,
                content_type: item.content_type,
                item_id: item.id,
            },
        )
    };

    View {
        text,
        photo_url: item
            .poster_path
            .as_ref()
            .map(|p| format!("{}{}", POSTER_BASE_URL, p)),
        keyboard: vec![
            vec![
                Button::new("⬅️ Previous", &Action::RandomPrev { index }),
                Button::new("Next ➡️", &Action::RandomNext { index }),
            ],
            vec![
                Button::new(
                    "🎬 More Info",
                    &Action::Details {
                        content_type: item.content_type,
                        item_id: item.id,
                        source: None,
                    },
                ),
                Button::new(
                    "🔀 New Batch",
                    &Action::Random {
                        content_type: item.content_type,
                    },
                ),
            ],
            vec![watchlist_button, favorite_button],
            vec![Button::new("🏠 Main Menu", &Action::MainMenu)],
        ],
    }
}

/// Details screen; `back` returns to wherever the user came from
pub fn details_view(details: &ItemDetails, back: Action) -> View {
    let item = &details.item;
    let year = item
        .release_year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let mut text = format!(
        "🎬 {} ({})\n⭐ Rating: {:.1}/10\n\n{}",
        item.title,
        year,
        item.vote_average,
        details
            .overview
            .as_deref()
            .unwrap_or("No overview available.")
    );
    if let Some(trailer) = &details.trailer_url {
        text.push_str(&format!("\n\n🎥 Watch Trailer: {}", trailer));
    }

    View::text_view(
        text,
        vec![vec![
            Button::new("⬅️ Back", &back),
            Button::new("🏠 Main Menu", &Action::MainMenu),
        ]],
    )
}

pub fn genre_type_menu() -> View {
    View::text_view(
        "Browse by genre. First, select the type of content:",
        vec![vec![
            Button::new(
                "Movies",
                &Action::GenreType {
                    content_type: ContentType::Movie,
                },
            ),
            Button::new(
                "TV Shows",
                &Action::GenreType {
                    content_type: ContentType::Tv,
                },
            ),
        ]],
    )
}

/// Genre picker for one content type, two buttons per row
pub fn genre_menu(content_type: ContentType) -> View {
    let mut keyboard: Vec<Vec<Button>> = Vec::new();
    let mut row: Vec<Button> = Vec::new();

    for (genre_id, name) in genres_for(content_type) {
        row.push(Button::new(
            *name,
            &Action::Genre {
                content_type,
                genre_id: *genre_id,
            },
        ));
        if row.len() == 2 {
            keyboard.push(std::mem::take(&mut row));
        }
    }
    if !row.is_empty() {
        keyboard.push(row);
    }
    keyboard.push(vec![Button::new("⬅️ Back", &Action::BrowseGenres)]);

    View::text_view(
        format!("Select a {} genre:", content_type),
        keyboard,
    )
}

pub fn trending_menu() -> View {
    View::text_view(
        "What's trending this week?",
        vec![vec![
            Button::new(
                "🎬 Movies",
                &Action::Trending {
                    content_type: ContentType::Movie,
                },
            ),
            Button::new(
                "📺 TV Shows",
                &Action::Trending {
                    content_type: ContentType::Tv,
                },
            ),
        ]],
    )
}

/// "No results" fallback after the relaxed query also came back empty
pub fn no_results(content_type: ContentType, genre_name: Option<&str>) -> View {
    let text = match genre_name {
        Some(genre) => format!(
            "No {} found in {}. Try another genre!",
            content_noun(content_type),
            genre
        ),
        None => format!(
            "No {} found. Please try again.",
            content_noun(content_type)
        ),
    };

    View::text_view(
        text,
        vec![vec![
            Button::new("🔍 Browse", &Action::BrowseGenres),
            Button::new("🏠 Main Menu", &Action::MainMenu),
        ]],
    )
}

/// Shown when a navigation button arrives but no session exists (e.g.
/// after a restart)
pub fn session_expired() -> View {
    View::text_view(
        "That browsing session has expired. Start a new one!",
        vec![vec![
            Button::new("🔍 Browse", &Action::BrowseGenres),
            Button::new("🏠 Main Menu", &Action::MainMenu),
        ]],
    )
}

pub fn error_view() -> View {
    View::text_view(
        "Sorry, something went wrong. Please try again.",
        vec![vec![Button::new("🏠 Main Menu", &Action::MainMenu)]],
    )
}

fn collection_title(kind: CollectionKind) -> &'static str {
    match kind {
        CollectionKind::Watchlist => "📝 Your Watchlist",
        CollectionKind::Favorites => "❤️ Your Favorites",
    }
}

fn collection_page_action(kind: CollectionKind, page: i64) -> Action {
    match kind {
        CollectionKind::Watchlist => Action::MyWatchlist { page },
        CollectionKind::Favorites => Action::MyFavorites { page },
    }
}

pub fn collection_empty(kind: CollectionKind) -> View {
    let text = match kind {
        CollectionKind::Watchlist => "Your watchlist is empty. Add items to watch later!",
        CollectionKind::Favorites => "You haven't added any favorites yet. ❤️",
    };
    View::text_view(
        text,
        vec![vec![
            Button::new("🔍 Browse", &Action::BrowseGenres),
            Button::new("🏠 Main Menu", &Action::MainMenu),
        ]],
    )
}

/// One page of a collection: a details button and a delete button per
/// entry, pagination row, main menu row
pub fn collection_page(
    kind: CollectionKind,
    entries: &[CollectionEntry],
    page: i64,
    total_pages: i64,
) -> View {
    let mut keyboard: Vec<Vec<Button>> = Vec::new();

    for entry in entries {
        let Some(content_type) = ContentType::parse(&entry.content_type) else {
            continue;
        };
        keyboard.push(vec![
            Button::new(
                format!("{} ({})", entry.title, type_icon(content_type)),
                &Action::Details {
                    content_type,
                    item_id: entry.item_id,
                    source: Some((kind, page)),
                },
            ),
            Button::new(
                "🗑",
                &Action::ConfirmRemove {
                    kind,
                    content_type,
                    item_id: entry.item_id,
                },
            ),
        ]);
    }

    let mut pagination = Vec::new();
    if page > 1 {
        pagination.push(Button::new(
            "⬅️ Previous",
            &collection_page_action(kind, page - 1),
        ));
    }
    if page < total_pages {
        pagination.push(Button::new(
            "Next ➡️",
            &collection_page_action(kind, page + 1),
        ));
    }
    if !pagination.is_empty() {
        keyboard.push(pagination);
    }
    keyboard.push(vec![Button::new("🏠 Main Menu", &Action::MainMenu)]);

    View::text_view(
        format!("{} (Page {}/{}):", collection_title(kind), page, total_pages),
        keyboard,
    )
}

/// Asks the user to confirm a removal before executing it
pub fn remove_confirmation(kind: CollectionKind, content_type: ContentType, item_id: i64) -> View {
    let list = match kind {
        CollectionKind::Watchlist => "your watchlist",
        CollectionKind::Favorites => "your favorites",
    };
    View::text_view(
        format!("Remove this item from {}?", list),
        vec![vec![
            Button::new(
                "✅ Yes, remove",
                &Action::ExecuteRemove {
                    kind,
                    content_type,
                    item_id,
                },
            ),
            Button::new("❌ Cancel", &collection_page_action(kind, 1)),
        ]],
    )
}

pub fn remove_menu() -> View {
    View::text_view(
        "Which list do you want to remove items from?",
        vec![vec![
            Button::new("📝 Watchlist", &Action::MyWatchlist { page: 1 }),
            Button::new("❤️ Favorites", &Action::MyFavorites { page: 1 }),
        ]],
    )
}

pub fn notification_settings(pref: &NotificationPreference) -> View {
    let status = if pref.enabled {
        "✅ Enabled"
    } else {
        "❌ Disabled"
    };
    let frequency = match pref.frequency {
        Frequency::Daily => "Daily",
        Frequency::Weekly => "Weekly",
        Frequency::Monthly => "Monthly",
    };
    let content = match pref.content_filter {
        ContentFilter::Movies => "Movies",
        ContentFilter::Tv => "TV Shows",
        ContentFilter::Both => "Movies & TV",
    };

    let toggle_label = if pref.enabled {
        "❌ Disable"
    } else {
        "✅ Enable"
    };

    View::text_view(
        format!(
            "🔔 Notification Settings:\n\nStatus: {}\nFrequency: {}\nContent: {}\n\nChoose an option to change:",
            status, frequency, content
        ),
        vec![
            vec![Button::new(toggle_label, &Action::ToggleNotifications)],
            vec![
                Button::new("Frequency", &Action::ChangeFrequency),
                Button::new("Content Type", &Action::ChangeContentType),
            ],
            vec![Button::new("🏠 Main Menu", &Action::MainMenu)],
        ],
    )
}

pub fn frequency_menu() -> View {
    View::text_view(
        "Select notification frequency:",
        vec![
            vec![
                Button::new(
                    "Daily",
                    &Action::SetFrequency {
                        frequency: Frequency::Daily,
                    },
                ),
                Button::new(
                    "Weekly",
                    &Action::SetFrequency {
                        frequency: Frequency::Weekly,
                    },
                ),
                Button::new(
                    "Monthly",
                    &Action::SetFrequency {
                        frequency: Frequency::Monthly,
                    },
                ),
            ],
            vec![Button::new("⬅️ Back", &Action::NotificationSettings)],
        ],
    )
}

pub fn content_type_menu() -> View {
    View::text_view(
        "Select what type of content to receive notifications about:",
        vec![
            vec![
                Button::new(
                    "Movies",
                    &Action::SetContentFilter {
                        filter: ContentFilter::Movies,
                    },
                ),
                Button::new(
                    "TV Shows",
                    &Action::SetContentFilter {
                        filter: ContentFilter::Tv,
                    },
                ),
            ],
            vec![Button::new(
                "Both",
                &Action::SetContentFilter {
                    filter: ContentFilter::Both,
                },
            )],
            vec![Button::new("⬅️ Back", &Action::NotificationSettings)],
        ],
    )
}

/// The periodic pick delivered by the notification fan-out
pub fn notification_card(item: &CatalogItem) -> View {
    let year = item
        .release_year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "Coming soon".to_string());
    View {
        text: format!(
            "🎬 A pick for you:\n\n{} {} ({})\n⭐ {:.1}/10",
            type_icon(item.content_type),
            item.title,
            year,
            item.vote_average
        ),
        photo_url: item
            .poster_path
            .as_ref()
            .map(|p| format!("{}{}", POSTER_BASE_URL, p)),
        keyboard: vec![vec![
            Button::new(
                "🎬 More Info",
                &Action::Details {
                    content_type: item.content_type,
                    item_id: item.id,
                    source: None,
                },
            ),
            Button::new("🏠 Main Menu", &Action::MainMenu),
        ]],
    }
}
