//! The dispatcher: sole entry point mapping validated intents onto the
//! spatial engine and result normalizer.
//!
//! Route layers stay thin translators: HTTP request in, [`QueryIntent`] (or
//! loose [`IntentRequest`]) to the dispatcher, JSON-ready result list back.
//! There is exactly one execution path per query shape; the convenience
//! wrappers only construct intents.

use rayon::prelude::*;
use tracing::{info, instrument};

use crate::{
    catalog::PointCatalog,
    config::QueryConfig,
    error::CalderaError,
    geo::{BoundingBox, Coord},
    query::{IntentRequest, QueryIntent, ResultRecord, engine, normalize},
};

/// Executes validated query intents against an immutable point catalog.
///
/// The dispatcher owns no mutable state: every call reads the shared
/// catalog and produces a fresh result, so a single instance (or clones,
/// which share the backing columns) can serve concurrent callers without
/// coordination.
///
/// # Examples
///
/// Basic usage with the embedded sample catalog:
/// ```rust
/// use caldera::{Coord, QueryDispatcher};
///
/// let dispatcher = QueryDispatcher::new_embedded()?;
/// let results = dispatcher.nearest(Coord::new(1.264, 103.840), 3)?;
/// for record in &results {
///     println!(
///         "{} ({}): {:.1} km",
///         record.name,
///         record.country,
///         record.distance_km.unwrap_or_default()
///     );
/// }
/// # Ok::<(), caldera::CalderaError>(())
/// ```
///
/// Dispatching a structured intent:
/// ```rust
/// use caldera::{Coord, QueryDispatcher, QueryIntent};
///
/// let dispatcher = QueryDispatcher::new_embedded()?;
/// let intent = QueryIntent::Radius {
///     origin: Coord::new(-6.2, 106.8),
///     radius_km: 1000.0,
/// };
/// let results = dispatcher.dispatch(&intent)?;
/// assert!(results.iter().all(|r| r.distance_km.unwrap() <= 1000.0));
/// # Ok::<(), caldera::CalderaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct QueryDispatcher {
    catalog: PointCatalog,
    config: QueryConfig,
}

impl QueryDispatcher {
    /// Create a dispatcher over `catalog` with default configuration.
    #[must_use]
    pub fn new(catalog: PointCatalog) -> Self {
        Self {
            catalog,
            config: QueryConfig::default(),
        }
    }

    /// Create a dispatcher with an explicit configuration.
    #[must_use]
    pub fn with_config(catalog: PointCatalog, config: QueryConfig) -> Self {
        Self { catalog, config }
    }

    /// Create a dispatcher over the embedded sample catalog.
    ///
    /// The fastest way to get a working dispatcher: no file paths, no
    /// downloads.
    #[instrument(name = "Create dispatcher (embedded catalog)", level = "info")]
    pub fn new_embedded() -> Result<Self, CalderaError> {
        let (frame, metadata) = caldera_data::embedded::sample_catalog()?;
        info!(
            source = %metadata.source,
            loaded = metadata.loaded,
            skipped = metadata.skipped,
            "embedded catalog loaded"
        );
        Ok(Self::new(PointCatalog::from_frame(frame)?))
    }

    /// Access the underlying catalog.
    #[must_use]
    pub fn catalog(&self) -> &PointCatalog {
        &self.catalog
    }

    /// Access the dispatcher's configuration.
    #[must_use]
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Execute one intent and return the shaped result list.
    ///
    /// Parameter violations (zero count, negative radius, non-finite
    /// coordinates) fail before any storage work. An empty catalog yields an
    /// empty list for every query shape, as does a degenerate bounding box.
    #[instrument(name = "Dispatch query", level = "debug", skip(self))]
    pub fn dispatch(&self, intent: &QueryIntent) -> Result<Vec<ResultRecord>, CalderaError> {
        intent.validate()?;

        if self.catalog.is_empty() {
            return Ok(Vec::new());
        }

        let results = match intent {
            QueryIntent::Nearest { origin, count } => {
                let raw = engine::nearest_candidates(&self.catalog, *origin, *count)?;
                normalize(Some(*origin), raw, None)
            }
            QueryIntent::Radius { origin, radius_km } => {
                let raw = engine::radius_candidates(
                    &self.catalog,
                    *origin,
                    *radius_km,
                    self.config.use_storage_radius_hint,
                )?;
                normalize(Some(*origin), raw, Some(*radius_km))
            }
            QueryIntent::BoundingBox { bbox } => {
                let raw = engine::bbox_candidates(&self.catalog, bbox)?;
                normalize(None, raw, None)
            }
        };

        Ok(results)
    }

    /// Execute a batch of intents in parallel.
    ///
    /// Output order matches the input; the first failing intent fails the
    /// batch.
    #[instrument(name = "Dispatch query batch", level = "debug", skip_all, fields(intents = intents.len()))]
    pub fn dispatch_batch(
        &self,
        intents: &[QueryIntent],
    ) -> Result<Vec<Vec<ResultRecord>>, CalderaError> {
        intents
            .par_iter()
            .map(|intent| self.dispatch(intent))
            .collect()
    }

    /// Resolve a loose intent request with this dispatcher's defaults, then
    /// dispatch it.
    pub fn dispatch_request(
        &self,
        request: &IntentRequest,
    ) -> Result<Vec<ResultRecord>, CalderaError> {
        let intent = request.resolve(&self.config)?;
        self.dispatch(&intent)
    }

    /// The `count` catalog entries closest to `origin`.
    pub fn nearest(&self, origin: Coord, count: usize) -> Result<Vec<ResultRecord>, CalderaError> {
        self.dispatch(&QueryIntent::Nearest { origin, count })
    }

    /// Every catalog entry within `radius_km` of `origin`.
    pub fn within_radius(
        &self,
        origin: Coord,
        radius_km: f64,
    ) -> Result<Vec<ResultRecord>, CalderaError> {
        self.dispatch(&QueryIntent::Radius { origin, radius_km })
    }

    /// Every catalog entry inside `bbox`.
    pub fn within_bounding_box(
        &self,
        bbox: BoundingBox,
    ) -> Result<Vec<ResultRecord>, CalderaError> {
        self.dispatch(&QueryIntent::BoundingBox { bbox })
    }
}

impl From<(PointCatalog, QueryConfig)> for QueryDispatcher {
    fn from((catalog, config): (PointCatalog, QueryConfig)) -> Self {
        Self { catalog, config }
    }
}

/// Builder for [`QueryDispatcher`].
///
/// Without an explicit catalog, [`build`](QueryDispatcherBuilder::build)
/// falls back to the embedded sample catalog.
#[derive(Debug, Default)]
pub struct QueryDispatcherBuilder {
    catalog: Option<PointCatalog>,
    config: Option<QueryConfig>,
}

impl QueryDispatcherBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit catalog.
    #[must_use]
    pub fn catalog(mut self, catalog: PointCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Use an explicit configuration.
    #[must_use]
    pub fn config(mut self, config: QueryConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the dispatcher.
    pub fn build(self) -> Result<QueryDispatcher, CalderaError> {
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => {
                let (frame, _) = caldera_data::embedded::sample_catalog()?;
                PointCatalog::from_frame(frame)?
            }
        };
        Ok(QueryDispatcher {
            catalog,
            config: self.config.unwrap_or_default(),
        })
    }
}
