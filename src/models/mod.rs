use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod genres;

pub use genres::{genre_name, genres_for, RARE_GENRES};

/// Content type as carried in callback payloads ("movie" / "tv")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Tv,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Tv => "tv",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(ContentType::Movie),
            "tv" => Some(ContentType::Tv),
            _ => None,
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a browse session's items came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Random,
    Genre,
    Trending,
}

/// A catalog snapshot item as shown in a browse session.
///
/// Ephemeral: fetched per request and never persisted beyond the session.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub id: i64,
    pub content_type: ContentType,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub vote_average: f64,
    pub vote_count: u32,
    pub popularity: f64,
    pub genre_ids: Vec<i64>,
}

impl CatalogItem {
    /// Release year for display, or None when the date is unknown
    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_date.map(|d| d.year())
    }
}

/// Detailed view of one item (details endpoint, with trailer)
#[derive(Debug, Clone)]
pub struct ItemDetails {
    pub item: CatalogItem,
    pub overview: Option<String>,
    pub trailer_url: Option<String>,
}

/// Which bookmark list a collection operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Watchlist,
    Favorites,
}

impl CollectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Watchlist => "watchlist",
            CollectionKind::Favorites => "favorites",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "watchlist" => Some(CollectionKind::Watchlist),
            "favorites" => Some(CollectionKind::Favorites),
            _ => None,
        }
    }
}

/// A persisted watchlist/favorites row
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CollectionEntry {
    pub user_id: i64,
    pub content_type: String,
    pub item_id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    pub date_added: DateTime<Utc>,
}

/// Result of an add: duplicate keys are a status, not an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Inserted,
    AlreadyExists,
}

/// Result of a remove: missing keys are a status, not an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

/// Notification cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(Frequency::Daily),
            "weekly" => Some(Frequency::Weekly),
            "monthly" => Some(Frequency::Monthly),
            _ => None,
        }
    }
}

/// Which content types a user wants notifications about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFilter {
    Movies,
    Tv,
    Both,
}

impl ContentFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentFilter::Movies => "movie",
            ContentFilter::Tv => "tv",
            ContentFilter::Both => "both",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(ContentFilter::Movies),
            "tv" => Some(ContentFilter::Tv),
            "both" => Some(ContentFilter::Both),
            _ => None,
        }
    }

    /// Content types allowed by this filter
    pub fn allowed_types(&self) -> &'static [ContentType] {
        match self {
            ContentFilter::Movies => &[ContentType::Movie],
            ContentFilter::Tv => &[ContentType::Tv],
            ContentFilter::Both => &[ContentType::Movie, ContentType::Tv],
        }
    }
}

/// Per-user notification preference row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationPreference {
    pub enabled: bool,
    pub frequency: Frequency,
    pub content_filter: ContentFilter,
}

impl Default for NotificationPreference {
    fn default() -> Self {
        Self {
            enabled: false,
            frequency: Frequency::Weekly,
            content_filter: ContentFilter::Both,
        }
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// One entry of a TMDB list response (discover / top_rated / trending)
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbItem {
    pub id: i64,
    /// Movie responses carry `title`, TV responses carry `name`
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub adult: bool,
}

impl TmdbItem {
    /// Converts a wire item into a domain item for the given content type.
    ///
    /// Empty or unparseable dates become None rather than an error; TMDB
    /// returns `""` for unscheduled releases.
    pub fn into_item(self, content_type: ContentType) -> CatalogItem {
        let title = match content_type {
            ContentType::Movie => self.title.clone().or(self.name.clone()),
            ContentType::Tv => self.name.clone().or(self.title.clone()),
        }
        .unwrap_or_else(|| "Unknown".to_string());

        let raw_date = match content_type {
            ContentType::Movie => self.release_date,
            ContentType::Tv => self.first_air_date,
        };
        let release_date = raw_date
            .filter(|d| !d.is_empty())
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok());

        CatalogItem {
            id: self.id,
            content_type,
            title,
            poster_path: self.poster_path,
            release_date,
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            popularity: self.popularity,
            genre_ids: self.genre_ids,
        }
    }
}

/// Paged TMDB list response
#[derive(Debug, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Vec<TmdbItem>,
}

/// TMDB details response with appended videos
#[derive(Debug, Deserialize)]
pub struct TmdbDetails {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub videos: Option<TmdbVideos>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct TmdbVideos {
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

impl TmdbDetails {
    /// Converts the details response into the domain type, picking the
    /// first YouTube video of type "Trailer" as the trailer link.
    pub fn into_details(self, content_type: ContentType) -> ItemDetails {
        let trailer_url = self
            .videos
            .as_ref()
            .and_then(|v| {
                v.results
                    .iter()
                    .find(|video| video.video_type == "Trailer" && video.site == "YouTube")
            })
            .map(|video| format!("https://www.youtube.com/watch?v={}", video.key));

        let genre_ids = self.genres.iter().map(|g| g.id).collect();
        let item = TmdbItem {
            id: self.id,
            title: self.title,
            name: self.name,
            poster_path: self.poster_path,
            release_date: self.release_date,
            first_air_date: self.first_air_date,
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            popularity: self.popularity,
            genre_ids: vec![],
            adult: self.adult,
        };
        let mut item = item.into_item(content_type);
        item.genre_ids = genre_ids;

        ItemDetails {
            item,
            overview: self.overview.filter(|o| !o.is_empty()),
            trailer_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_round_trip() {
        assert_eq!(ContentType::parse("movie"), Some(ContentType::Movie));
        assert_eq!(ContentType::parse("tv"), Some(ContentType::Tv));
        assert_eq!(ContentType::parse("series"), None);
        assert_eq!(ContentType::Movie.as_str(), "movie");
        assert_eq!(ContentType::Tv.as_str(), "tv");
    }

    #[test]
    fn test_tmdb_item_deserialization() {
        let json = r#"{
            "id": 603,
            "title": "The Matrix",
            "poster_path": "/matrix.jpg",
            "release_date": "1999-03-30",
            "vote_average": 8.2,
            "vote_count": 24000,
            "popularity": 85.3,
            "genre_ids": [28, 878],
            "adult": false
        }"#;

        let item: TmdbItem = serde_json::from_str(json).unwrap();
        let item = item.into_item(ContentType::Movie);
        assert_eq!(item.id, 603);
        assert_eq!(item.title, "The Matrix");
        assert_eq!(item.release_year(), Some(1999));
        assert_eq!(item.genre_ids, vec![28, 878]);
    }

    #[test]
    fn test_tmdb_item_tv_uses_name_and_first_air_date() {
        let json = r#"{
            "id": 1396,
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20",
            "vote_average": 8.9,
            "vote_count": 12000
        }"#;

        let item: TmdbItem = serde_json::from_str(json).unwrap();
        let item = item.into_item(ContentType::Tv);
        assert_eq!(item.title, "Breaking Bad");
        assert_eq!(item.release_year(), Some(2008));
    }

    #[test]
    fn test_tmdb_item_empty_date_is_none() {
        let json = r#"{"id": 1, "title": "No Date Yet", "release_date": ""}"#;
        let item: TmdbItem = serde_json::from_str(json).unwrap();
        let item = item.into_item(ContentType::Movie);
        assert_eq!(item.release_date, None);
        assert_eq!(item.release_year(), None);
    }

    #[test]
    fn test_tmdb_details_picks_youtube_trailer() {
        let json = r#"{
            "id": 603,
            "title": "The Matrix",
            "overview": "A hacker learns the truth.",
            "videos": {
                "results": [
                    {"key": "abc", "site": "Vimeo", "type": "Trailer"},
                    {"key": "def", "site": "YouTube", "type": "Clip"},
                    {"key": "vKQi3bBA1y8", "site": "YouTube", "type": "Trailer"}
                ]
            }
        }"#;

        let details: TmdbDetails = serde_json::from_str(json).unwrap();
        let details = details.into_details(ContentType::Movie);
        assert_eq!(
            details.trailer_url.as_deref(),
            Some("https://www.youtube.com/watch?v=vKQi3bBA1y8")
        );
        assert_eq!(details.overview.as_deref(), Some("A hacker learns the truth."));
    }

    #[test]
    fn test_tmdb_details_no_trailer() {
        let json = r#"{"id": 603, "title": "The Matrix"}"#;
        let details: TmdbDetails = serde_json::from_str(json).unwrap();
        let details = details.into_details(ContentType::Movie);
        assert_eq!(details.trailer_url, None);
        assert_eq!(details.overview, None);
    }

    #[test]
    fn test_notification_preference_defaults() {
        let pref = NotificationPreference::default();
        assert!(!pref.enabled);
        assert_eq!(pref.frequency, Frequency::Weekly);
        assert_eq!(pref.content_filter, ContentFilter::Both);
    }

    #[test]
    fn test_content_filter_allowed_types() {
        assert_eq!(ContentFilter::Movies.allowed_types(), &[ContentType::Movie]);
        assert_eq!(
            ContentFilter::Both.allowed_types(),
            &[ContentType::Movie, ContentType::Tv]
        );
    }
}
