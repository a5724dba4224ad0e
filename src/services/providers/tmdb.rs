/// TMDB API provider
///
/// Issues one remote query per call. List endpoints degrade gracefully: a
/// non-success status or a transport failure (including timeout) is logged
/// and yields an empty result for that invocation, leaving user-visible
/// fallback messaging to the caller. No retries happen at this layer.
use crate::{
    error::{AppError, AppResult},
    models::{CatalogItem, ContentType, ItemDetails, TmdbDetails, TmdbPage},
    services::providers::{CatalogProvider, QualityFilter, SortStrategy},
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
        }
    }

    /// Query parameters for a discover request. Listed separately so the
    /// parameter mapping stays testable without a network round-trip.
    fn discover_params(
        &self,
        content_type: ContentType,
        genre_id: Option<i64>,
        filter: &QualityFilter,
        sort: SortStrategy,
        page: u32,
    ) -> Vec<(String, String)> {
        let release_gate = match content_type {
            ContentType::Movie => "primary_release_date.gte",
            ContentType::Tv => "first_air_date.gte",
        };

        let mut params = vec![
            ("api_key".to_string(), self.api_key.clone()),
            ("sort_by".to_string(), sort.api_param(content_type).to_string()),
            ("page".to_string(), page.to_string()),
            ("vote_count.gte".to_string(), filter.min_votes.to_string()),
            ("vote_average.gte".to_string(), filter.min_rating.to_string()),
            (
                "with_original_language".to_string(),
                filter.language.to_string(),
            ),
            (
                release_gate.to_string(),
                filter.earliest_release.format("%Y-%m-%d").to_string(),
            ),
            ("include_adult".to_string(), "false".to_string()),
        ];

        if let Some(genre) = genre_id {
            params.push(("with_genres".to_string(), genre.to_string()));
        }

        params
    }

    /// Fetches one list page, converting failures to an empty result
    async fn fetch_page(
        &self,
        url: &str,
        params: &[(String, String)],
        content_type: ContentType,
    ) -> Vec<CatalogItem> {
        let response = match self.http_client.get(url).query(params).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, provider = "tmdb", "Catalog request failed");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(
                url = %url,
                status = %status,
                provider = "tmdb",
                "Catalog request returned non-success status"
            );
            return Vec::new();
        }

        let page: TmdbPage = match response.json().await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, provider = "tmdb", "Malformed catalog response");
                return Vec::new();
            }
        };

        // Strip restricted content regardless of what the API returned
        page.results
            .into_iter()
            .filter(|item| !item.adult)
            .map(|item| item.into_item(content_type))
            .collect()
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn discover(
        &self,
        content_type: ContentType,
        genre_id: Option<i64>,
        filter: &QualityFilter,
        sort: SortStrategy,
        page: u32,
    ) -> AppResult<Vec<CatalogItem>> {
        let url = format!("{}/discover/{}", self.api_url, content_type);
        let params = self.discover_params(content_type, genre_id, filter, sort, page);

        let items = self.fetch_page(&url, &params, content_type).await;

        tracing::info!(
            content_type = %content_type,
            genre_id = ?genre_id,
            page,
            results = items.len(),
            provider = "tmdb",
            "Discover query completed"
        );

        Ok(items)
    }

    async fn top_rated(&self, content_type: ContentType, page: u32) -> AppResult<Vec<CatalogItem>> {
        let url = format!("{}/{}/top_rated", self.api_url, content_type);
        let params = vec![
            ("api_key".to_string(), self.api_key.clone()),
            ("page".to_string(), page.to_string()),
        ];

        let items = self.fetch_page(&url, &params, content_type).await;

        tracing::info!(
            content_type = %content_type,
            page,
            results = items.len(),
            provider = "tmdb",
            "Top-rated query completed"
        );

        Ok(items)
    }

    async fn trending(&self, content_type: ContentType) -> AppResult<Vec<CatalogItem>> {
        let url = format!("{}/trending/{}/week", self.api_url, content_type);
        let params = vec![("api_key".to_string(), self.api_key.clone())];

        let items = self.fetch_page(&url, &params, content_type).await;

        tracing::info!(
            content_type = %content_type,
            results = items.len(),
            provider = "tmdb",
            "Trending query completed"
        );

        Ok(items)
    }

    async fn details(&self, content_type: ContentType, item_id: i64) -> AppResult<ItemDetails> {
        let url = format!("{}/{}/{}", self.api_url, content_type, item_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("append_to_response", "videos"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let details: TmdbDetails = response.json().await?;
        if details.adult {
            return Err(AppError::NotFound(format!(
                "{} {} is not available",
                content_type, item_id
            )));
        }

        tracing::debug!(
            content_type = %content_type,
            item_id,
            provider = "tmdb",
            "Details fetched"
        );

        Ok(details.into_details(content_type))
    }
}
