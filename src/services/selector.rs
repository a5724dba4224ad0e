/// Recommendation selection policy
///
/// Produces a diverse, quality-biased page of catalog results for a content
/// type and optional genre. Strict filters first; if the result is sparse,
/// exactly one relaxed fallback query runs and its results are returned
/// even if still sparse. Rare genres (small or low-rated catalog
/// populations) get looser base thresholds and a lower sparsity bar, since
/// they otherwise return zero or near-zero results.
use crate::{
    error::AppResult,
    models::{genres::RARE_GENRES, CatalogItem, ContentType},
    services::providers::{CatalogProvider, QualityFilter, SortStrategy},
};
use chrono::NaiveDate;
use rand::Rng;
use std::sync::Arc;

/// Minimum acceptable result count before the relaxed fallback fires
const MIN_RESULTS_RARE: usize = 3;
const MIN_RESULTS_DEFAULT: usize = 8;

/// Pages are drawn uniformly from this window so repeated requests do not
/// always land on page 1
const PAGE_WINDOW: u32 = 10;

/// Relaxation caps: vote floor never drops below 30, rating floor never
/// below 5.0
const RELAX_VOTE_STEP: u32 = 20;
const MIN_VOTE_FLOOR: u32 = 30;
const RELAX_RATING_STEP: f64 = 0.5;
const MIN_RATING_FLOOR: f64 = 5.0;

/// Looser thresholds for genres with thin catalog populations:
/// (genre_id, min_votes, min_rating)
const GENRE_ADJUSTMENTS: &[(i64, u32, f64)] = &[
    (99, 20, 5.5),    // Documentary
    (16, 30, 5.5),    // Animation
    (10770, 30, 5.5), // TV Movie
    (10763, 20, 5.5), // News
    (10764, 30, 5.5), // Reality
    (10767, 20, 5.5), // Talk
];

/// Maps a uniform roll in 0..100 to a sort strategy: rating-descending
/// 60%, popularity-descending 30%, recency-descending 10%
pub fn strategy_for_roll(roll: u32) -> SortStrategy {
    match roll {
        0..=59 => SortStrategy::Rating,
        60..=89 => SortStrategy::Popularity,
        _ => SortStrategy::Recency,
    }
}

fn choose_strategy<R: Rng>(rng: &mut R) -> SortStrategy {
    strategy_for_roll(rng.gen_range(0..100))
}

fn choose_page<R: Rng>(rng: &mut R) -> u32 {
    rng.gen_range(1..=PAGE_WINDOW)
}

/// Base quality filter for a content type, before genre adjustments
pub fn base_filter(content_type: ContentType) -> QualityFilter {
    match content_type {
        ContentType::Movie => QualityFilter {
            min_votes: 100,
            min_rating: 6.0,
            language: "en",
            earliest_release: NaiveDate::from_ymd_opt(2000, 1, 1)
                .unwrap_or(NaiveDate::MIN),
        },
        ContentType::Tv => QualityFilter {
            min_votes: 50,
            min_rating: 6.0,
            language: "en",
            earliest_release: NaiveDate::from_ymd_opt(2010, 1, 1)
                .unwrap_or(NaiveDate::MIN),
        },
    }
}

/// Filter for a query, applying the per-genre adjustment when one is
/// registered for the requested genre
pub fn filter_for(content_type: ContentType, genre_id: Option<i64>) -> QualityFilter {
    let mut filter = base_filter(content_type);
    if let Some(genre) = genre_id {
        if let Some((_, votes, rating)) = GENRE_ADJUSTMENTS.iter().find(|(id, _, _)| *id == genre)
        {
            filter.min_votes = *votes;
            filter.min_rating = *rating;
        }
    }
    filter
}

/// Relaxed version of a filter for the single fallback query. Floors are
/// lowered by a fixed step but capped, and never raised above the
/// original values.
pub fn relax(filter: &QualityFilter) -> QualityFilter {
    QualityFilter {
        min_votes: filter
            .min_votes
            .saturating_sub(RELAX_VOTE_STEP)
            .max(MIN_VOTE_FLOOR)
            .min(filter.min_votes),
        min_rating: (filter.min_rating - RELAX_RATING_STEP)
            .max(MIN_RATING_FLOOR)
            .min(filter.min_rating),
        ..filter.clone()
    }
}

fn is_rare(genre_id: Option<i64>) -> bool {
    genre_id.is_some_and(|g| RARE_GENRES.contains(&g))
}

/// Chooses sort strategy and page, runs the query, and applies the
/// two-tier filter-then-relax policy
#[derive(Clone)]
pub struct RecommendationSelector {
    provider: Arc<dyn CatalogProvider>,
}

impl RecommendationSelector {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self { provider }
    }

    /// Fetches one quality-biased page of candidates.
    ///
    /// A genre routes through the discover endpoint; no genre routes
    /// through top-rated with the thresholds applied client-side. If the
    /// strict query comes back below the minimum acceptable count, one
    /// relaxed query runs and its results are returned regardless of
    /// count. No further retries.
    pub async fn select_page(
        &self,
        content_type: ContentType,
        genre_id: Option<i64>,
    ) -> AppResult<Vec<CatalogItem>> {
        // Decided up front so the strict and fallback queries page the
        // same slice of the catalog
        let (sort, page) = {
            let mut rng = rand::thread_rng();
            (choose_strategy(&mut rng), choose_page(&mut rng))
        };

        let filter = filter_for(content_type, genre_id);
        let results = self.query(content_type, genre_id, &filter, sort, page).await?;

        let minimum = if is_rare(genre_id) {
            MIN_RESULTS_RARE
        } else {
            MIN_RESULTS_DEFAULT
        };

        if results.len() >= minimum {
            return Ok(results);
        }

        let relaxed = relax(&filter);
        tracing::info!(
            content_type = %content_type,
            genre_id = ?genre_id,
            strict_results = results.len(),
            minimum,
            relaxed_votes = relaxed.min_votes,
            relaxed_rating = relaxed.min_rating,
            "Sparse results, issuing relaxed fallback query"
        );

        self.query(content_type, genre_id, &relaxed, sort, page).await
    }

    async fn query(
        &self,
        content_type: ContentType,
        genre_id: Option<i64>,
        filter: &QualityFilter,
        sort: SortStrategy,
        page: u32,
    ) -> AppResult<Vec<CatalogItem>> {
        if genre_id.is_some() {
            self.provider
                .discover(content_type, genre_id, filter, sort, page)
                .await
        } else {
            let items = self.provider.top_rated(content_type, page).await?;
            Ok(items.into_iter().filter(|i| filter.accepts(i)).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockCatalogProvider;
    use mockall::predicate::*;

    fn item(id: i64, votes: u32, rating: f64) -> CatalogItem {
        CatalogItem {
            id,
            content_type: ContentType::Movie,
            title: format!("Item {}", id),
            poster_path: None,
            release_date: NaiveDate::from_ymd_opt(2015, 1, 1),
            vote_average: rating,
            vote_count: votes,
            popularity: 1.0,
            genre_ids: vec![99],
        }
    }

    #[test]
    fn test_strategy_weights() {
        assert_eq!(strategy_for_roll(0), SortStrategy::Rating);
        assert_eq!(strategy_for_roll(59), SortStrategy::Rating);
        assert_eq!(strategy_for_roll(60), SortStrategy::Popularity);
        assert_eq!(strategy_for_roll(89), SortStrategy::Popularity);
        assert_eq!(strategy_for_roll(90), SortStrategy::Recency);
        assert_eq!(strategy_for_roll(99), SortStrategy::Recency);
    }

    #[test]
    fn test_page_window() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let page = choose_page(&mut rng);
            assert!((1..=PAGE_WINDOW).contains(&page));
        }
    }

    #[test]
    fn test_base_filter_movie_vs_tv() {
        let movie = base_filter(ContentType::Movie);
        assert_eq!(movie.min_votes, 100);
        assert_eq!(
            movie.earliest_release,
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
        );

        let tv = base_filter(ContentType::Tv);
        assert_eq!(tv.min_votes, 50);
        assert_eq!(
            tv.earliest_release,
            NaiveDate::from_ymd_opt(2010, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_filter_for_documentary_override() {
        let filter = filter_for(ContentType::Movie, Some(99));
        assert_eq!(filter.min_votes, 20);
        assert_eq!(filter.min_rating, 5.5);
        // Release gate stays at the base value
        assert_eq!(
            filter.earliest_release,
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_filter_for_unregistered_genre_uses_base() {
        let filter = filter_for(ContentType::Movie, Some(28));
        assert_eq!(filter.min_votes, 100);
        assert_eq!(filter.min_rating, 6.0);
    }

    #[test]
    fn test_relax_lowers_with_caps() {
        let filter = base_filter(ContentType::Movie);
        let relaxed = relax(&filter);
        assert_eq!(relaxed.min_votes, 80);
        assert_eq!(relaxed.min_rating, 5.5);

        // 40 - 20 = 20, capped back up to the floor of 30
        let relaxed = relax(&QualityFilter {
            min_votes: 40,
            min_rating: 5.2,
            ..filter.clone()
        });
        assert_eq!(relaxed.min_votes, 30);
        assert_eq!(relaxed.min_rating, 5.0);
    }

    #[test]
    fn test_relax_never_raises_thresholds() {
        let filter = QualityFilter {
            min_votes: 20,
            min_rating: 4.8,
            ..base_filter(ContentType::Movie)
        };
        let relaxed = relax(&filter);
        assert_eq!(relaxed.min_votes, 20);
        assert_eq!(relaxed.min_rating, 4.8);
    }

    #[tokio::test]
    async fn test_sparse_rare_genre_triggers_single_fallback() {
        let mut provider = MockCatalogProvider::new();

        // Strict query: below the rare-genre minimum of 3
        provider
            .expect_discover()
            .withf(|_, genre, filter, _, _| *genre == Some(99) && filter.min_votes == 20)
            .times(1)
            .returning(|_, _, _, _, _| Ok(vec![item(1, 25, 6.1)]));

        // Relaxed query: the rating floor drops, the vote floor is already
        // below the relaxation cap and stays put
        provider
            .expect_discover()
            .withf(|_, genre, filter, _, _| {
                *genre == Some(99) && filter.min_votes == 20 && filter.min_rating == 5.0
            })
            .times(1)
            .returning(|_, _, _, _, _| Ok(vec![item(1, 25, 6.1), item(2, 31, 5.1)]));

        let selector = RecommendationSelector::new(Arc::new(provider));
        let results = selector
            .select_page(ContentType::Movie, Some(99))
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_fallback_returned_even_if_still_sparse() {
        let mut provider = MockCatalogProvider::new();

        provider
            .expect_discover()
            .times(2)
            .returning(|_, _, _, _, _| Ok(vec![]));

        let selector = RecommendationSelector::new(Arc::new(provider));
        let results = selector
            .select_page(ContentType::Movie, Some(99))
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_sufficient_results_skip_fallback() {
        let mut provider = MockCatalogProvider::new();

        provider
            .expect_discover()
            .times(1)
            .returning(|_, _, _, _, _| Ok((0..5).map(|i| item(i, 50, 6.5)).collect()));

        let selector = RecommendationSelector::new(Arc::new(provider));
        let results = selector
            .select_page(ContentType::Movie, Some(99))
            .await
            .unwrap();

        assert_eq!(results.len(), 5);
    }

    #[tokio::test]
    async fn test_no_genre_routes_through_top_rated_with_client_filter() {
        let mut provider = MockCatalogProvider::new();

        provider.expect_top_rated().times(1).returning(|_, _| {
            Ok(vec![
                item(1, 500, 8.0),
                item(2, 10, 8.0), // below the vote floor
                item(3, 500, 8.0),
                item(4, 500, 8.0),
                item(5, 500, 8.0),
                item(6, 500, 8.0),
                item(7, 500, 8.0),
                item(8, 500, 8.0),
                item(9, 500, 8.0),
            ])
        });

        let selector = RecommendationSelector::new(Arc::new(provider));
        let results = selector.select_page(ContentType::Movie, None).await.unwrap();

        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|i| i.vote_count >= 100));
    }
}
