//! Configuration for the grid sampler and the spatial filters.
//!
//! Every field has a serde default so partial JSON/TOML documents load; the
//! `with_*` builders cover programmatic setup.

use crate::compute::filter::{GeodesicFilter, HaversineFilter, IndexedFilter, SpatialFilter};
use crate::error::GeocoverError;
use serde::de::Error;
use serde::{Deserialize, Serialize};

pub use geocover_types::config::ColumnNames;

/// Mean Earth radius (IUGG/GRS80) used by the haversine approximation.
///
/// The ellipsoid's local radii of curvature differ from this by up to about
/// 0.5% at mid latitudes, which bounds the haversine filter's error.
pub const EARTH_MEAN_RADIUS_METERS: f64 = 6_371_008.8;

/// Upper bound on lattice candidates evaluated per polygon by default.
pub const DEFAULT_MAX_CANDIDATES: usize = 25_000_000;

/// Which spatial filter implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilterStrategy {
    /// Exact geodesic distance / containment per row
    #[default]
    Geodesic,
    /// Batched spherical distance over coordinate columns
    Haversine,
    /// R*-tree over the rows, envelope pruning then exact test
    Indexed,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub sampler: SamplerConfig,

    #[serde(default)]
    pub filter: FilterConfig,
}

/// Grid sampler settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplerConfig {
    /// Append the polygon's own vertices to the lattice points
    #[serde(default)]
    pub include_vertices: bool,

    /// Evaluate lattice rows on the rayon thread pool
    #[serde(default = "SamplerConfig::default_parallel")]
    pub parallel: bool,

    /// Refuse lattices with more candidates than this
    #[serde(default = "SamplerConfig::default_max_candidates")]
    pub max_candidates: usize,
}

impl SamplerConfig {
    const fn default_parallel() -> bool {
        true
    }

    const fn default_max_candidates() -> usize {
        DEFAULT_MAX_CANDIDATES
    }

    pub fn with_include_vertices(mut self, include: bool) -> Self {
        self.include_vertices = include;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        assert!(max_candidates > 0, "Max candidates must be greater than zero");
        self.max_candidates = max_candidates;
        self
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            include_vertices: false,
            parallel: Self::default_parallel(),
            max_candidates: Self::default_max_candidates(),
        }
    }
}

/// Spatial filter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    #[serde(default)]
    pub strategy: FilterStrategy,

    #[serde(default)]
    pub columns: ColumnNames,

    /// Sphere radius for the haversine and indexed strategies
    #[serde(default = "FilterConfig::default_earth_radius")]
    pub earth_radius_meters: f64,

    /// Evaluate rows on the rayon thread pool (geodesic strategy)
    #[serde(default = "FilterConfig::default_parallel")]
    pub parallel: bool,
}

impl FilterConfig {
    const fn default_earth_radius() -> f64 {
        EARTH_MEAN_RADIUS_METERS
    }

    const fn default_parallel() -> bool {
        true
    }

    pub fn with_strategy(mut self, strategy: FilterStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_earth_radius(mut self, meters: f64) -> Self {
        assert!(
            meters.is_finite() && meters > 0.0,
            "Earth radius must be positive"
        );
        self.earth_radius_meters = meters;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        let radius = self.earth_radius_meters;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(format!("Earth radius must be positive, got {}", radius));
        }

        if self.columns.latitude.is_empty() || self.columns.longitude.is_empty() {
            return Err("Coordinate column names must not be empty".to_string());
        }

        if self.columns.latitude == self.columns.longitude {
            return Err(format!(
                "Latitude and longitude columns must differ, both are '{}'",
                self.columns.latitude
            ));
        }

        Ok(())
    }

    /// Instantiate the configured strategy. Fails with
    /// [`GeocoverError::Config`] when the settings are invalid.
    pub fn build(&self) -> crate::Result<Box<dyn SpatialFilter>> {
        self.validate().map_err(GeocoverError::Config)?;

        Ok(match self.strategy {
            FilterStrategy::Geodesic => Box::new(
                GeodesicFilter::new(self.columns.clone()).with_parallel(self.parallel),
            ),
            FilterStrategy::Haversine => Box::new(
                HaversineFilter::new(self.columns.clone())
                    .with_earth_radius(self.earth_radius_meters),
            ),
            FilterStrategy::Indexed => Box::new(
                IndexedFilter::new(self.columns.clone())
                    .with_earth_radius(self.earth_radius_meters),
            ),
        })
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            strategy: FilterStrategy::default(),
            columns: ColumnNames::default(),
            earth_radius_meters: Self::default_earth_radius(),
            parallel: Self::default_parallel(),
        }
    }
}

impl Config {
    pub fn with_sampler(mut self, sampler: SamplerConfig) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sampler.max_candidates == 0 {
            return Err("Max candidates must be greater than zero".to_string());
        }

        self.filter.validate()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
