use async_trait::async_trait;
use bilim_core::Sourced;
use bilim_error::BilimResult;
use bilim_interface::{ImageSource, Photo, PhotoSearch};
use rand::Rng;
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Image published when no search produces a photo.
pub const FALLBACK_IMAGE_URL: &str =
    "https://images.pexels.com/photos/2387418/pexels-photo-2387418.jpeg";

/// Queries at or below this trimmed length are too vague to search.
const MIN_QUERY_LEN: usize = 10;

/// Minimum width of a liked photo to pass the quality filter.
const MIN_QUALITY_WIDTH: u32 = 3000;

/// Number of raw results to pick from when no photo passes the filter.
const UNFILTERED_POOL: usize = 5;

/// Builds the search cascade for keywords ordered subject, action, detail, visual.
///
/// Missing keywords are treated as empty, and queries too short to be useful
/// are dropped.
///
/// # Examples
///
/// ```
/// use bilim_social::search_queries;
///
/// let keywords: Vec<String> = ["moon", "ice", "poles", "shadow"]
///     .iter()
///     .map(|k| k.to_string())
///     .collect();
/// let queries = search_queries(&keywords);
/// assert_eq!(queries.len(), 7);
/// assert_eq!(queries[0], "moon ice poles");
/// assert_eq!(queries[1], "moon shadow closeup");
/// assert_eq!(queries[6], "nature science photography");
/// ```
pub fn search_queries(keywords: &[String]) -> Vec<String> {
    let keyword = |index: usize| keywords.get(index).map(String::as_str).unwrap_or_default();
    let (subject, action, detail, visual) = (keyword(0), keyword(1), keyword(2), keyword(3));

    [
        format!("{subject} {action} {detail}"),
        format!("{subject} {visual} closeup"),
        format!("{subject} {action} nature"),
        format!("{subject} {detail} photography"),
        format!("{subject} wildlife professional"),
        format!("{subject} high quality nature"),
        "nature science photography".to_string(),
    ]
    .into_iter()
    .filter(|query| query.trim().chars().count() > MIN_QUERY_LEN)
    .collect()
}

/// Whether a photo passes the quality heuristic.
///
/// A large liked photo passes, as does any photo whose page URL mentions
/// nature or wildlife.
pub fn is_quality_photo(photo: &Photo) -> bool {
    let url = photo.url.to_lowercase();
    (photo.width >= MIN_QUALITY_WIDTH && photo.liked)
        || url.contains("nature")
        || url.contains("wildlife")
}

/// Picks a photo from one page of results.
///
/// Chooses uniformly among photos passing [`is_quality_photo`], otherwise
/// among the first five results. Returns `None` for an empty page.
pub fn select_photo<'a, R: Rng + ?Sized>(photos: &'a [Photo], rng: &mut R) -> Option<&'a Photo> {
    let quality: Vec<&Photo> = photos.iter().filter(|photo| is_quality_photo(photo)).collect();

    if quality.is_empty() {
        photos[..photos.len().min(UNFILTERED_POOL)].choose(rng)
    } else {
        quality.choose(rng).copied()
    }
}

/// Resolves photos through a cascade of progressively broader searches.
#[derive(Debug)]
pub struct ImageResolver<S> {
    search: Arc<S>,
    fallback_url: String,
}

impl<S: PhotoSearch> ImageResolver<S> {
    /// Creates a resolver using the default fallback image.
    pub fn new(search: Arc<S>) -> Self {
        Self {
            search,
            fallback_url: FALLBACK_IMAGE_URL.to_string(),
        }
    }

    /// Replaces the fallback image URL.
    pub fn with_fallback_url(mut self, fallback_url: impl Into<String>) -> Self {
        self.fallback_url = fallback_url.into();
        self
    }

    /// Runs the cascade, stopping at the first query with any results.
    ///
    /// # Errors
    ///
    /// Returns the first search error; the remaining queries are not tried.
    pub async fn try_resolve(&self, keywords: &[String]) -> BilimResult<Option<String>> {
        for query in search_queries(keywords) {
            let photos = self.search.search(&query).await?;
            if photos.is_empty() {
                debug!(query = %query, "No photos for query");
                continue;
            }

            let url = select_photo(&photos, &mut rand::thread_rng())
                .map(|photo| photo.src.large.clone());
            if url.is_some() {
                info!(query = %query, results = photos.len(), "Found photo");
                return Ok(url);
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl<S: PhotoSearch> ImageSource for ImageResolver<S> {
    #[instrument(skip(self))]
    async fn resolve_image(&self, keywords: &[String]) -> Sourced<String> {
        match self.try_resolve(keywords).await {
            Ok(Some(url)) => Sourced::Service(url),
            Ok(None) => {
                warn!("No query produced a photo, using fallback image");
                Sourced::Fallback(self.fallback_url.clone())
            }
            Err(e) => {
                warn!(error = %e, "Photo search failed, using fallback image");
                Sourced::Fallback(self.fallback_url.clone())
            }
        }
    }
}
