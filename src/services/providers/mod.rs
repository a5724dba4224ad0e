/// Catalog data provider abstraction
///
/// Wraps the remote catalog queries the browse engine needs: discover by
/// genre, top-rated, trending, and per-item details. The trait seam keeps
/// the selector and the dispatch pipeline testable without network access.
use crate::{
    error::AppResult,
    models::{CatalogItem, ContentType, ItemDetails},
};
use chrono::NaiveDate;

pub mod tmdb;

/// Quality thresholds applied to a catalog query.
///
/// On the discover route these are passed to the API as query parameters;
/// on the top-rated route (no genre) they are applied client-side, since
/// that endpoint accepts no filter parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityFilter {
    pub min_votes: u32,
    pub min_rating: f64,
    pub language: &'static str,
    pub earliest_release: NaiveDate,
}

impl QualityFilter {
    /// Client-side check against the numeric thresholds. Items with an
    /// unknown release date are kept; the date gate only excludes items
    /// known to be too old.
    pub fn accepts(&self, item: &CatalogItem) -> bool {
        if item.vote_count < self.min_votes {
            return false;
        }
        if item.vote_average < self.min_rating {
            return false;
        }
        match item.release_date {
            Some(date) => date >= self.earliest_release,
            None => true,
        }
    }
}

/// Sort strategy for a discovery query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStrategy {
    Rating,
    Popularity,
    Recency,
}

impl SortStrategy {
    /// TMDB `sort_by` parameter value for this strategy
    pub fn api_param(&self, content_type: ContentType) -> &'static str {
        match (self, content_type) {
            (SortStrategy::Rating, _) => "vote_average.desc",
            (SortStrategy::Popularity, _) => "popularity.desc",
            (SortStrategy::Recency, ContentType::Movie) => "primary_release_date.desc",
            (SortStrategy::Recency, ContentType::Tv) => "first_air_date.desc",
        }
    }
}

/// Trait for catalog providers
///
/// List operations return an empty list on remote failure: a non-success
/// response or timeout is logged and treated as "no results" by callers,
/// never as fatal. Details lookups propagate the error so callers can show
/// a status message. Restricted (adult-flagged) items never appear in any
/// returned set.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Discover items, optionally restricted to one genre, with quality
    /// filters and sort applied server-side
    async fn discover(
        &self,
        content_type: ContentType,
        genre_id: Option<i64>,
        filter: &QualityFilter,
        sort: SortStrategy,
        page: u32,
    ) -> AppResult<Vec<CatalogItem>>;

    /// One page of the top-rated chart (unfiltered by the API)
    async fn top_rated(&self, content_type: ContentType, page: u32) -> AppResult<Vec<CatalogItem>>;

    /// This week's trending items
    async fn trending(&self, content_type: ContentType) -> AppResult<Vec<CatalogItem>>;

    /// Full details for one item, including overview and trailer link
    async fn details(&self, content_type: ContentType, item_id: i64) -> AppResult<ItemDetails>;
}
