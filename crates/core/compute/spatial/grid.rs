//! Regular lattice sampling of areas of interest.
//!
//! A polygon's bounding box is covered by a lattice whose degree steps
//! correspond to the requested spacing at the box's south-west corner; the
//! lattice points that fall inside the polygon are the samples.

use crate::compute::spatial::algorithms::degree_steps;
use crate::compute::spatial::circle::circle;
use crate::compute::validation::{validate_polygon, validate_spacing};
use crate::config::SamplerConfig;
use crate::error::{GeocoverError, Result};
use geocover_types::bbox::BoundingBox2D;
use geocover_types::geo::{MultiPolygon, Point, Polygon};
use rayon::prelude::*;
use rustc_hash::FxHashSet;

/// A lattice over a bounding box. Candidates are generated lazily.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleGrid {
    origin: Point,
    lat_step: f64,
    lon_step: f64,
    rows: usize,
    cols: usize,
}

impl SampleGrid {
    /// Lattice covering `polygon`'s bounding box at `spacing_meters`.
    ///
    /// Returns `None` when the box has zero area or a single step already
    /// exceeds the box in either direction.
    pub fn for_polygon(polygon: &Polygon, spacing_meters: f64) -> Result<Option<Self>> {
        let bbox = BoundingBox2D::of_polygon(polygon).ok_or_else(|| {
            GeocoverError::InvalidGeometry("Polygon has no bounding box".to_string())
        })?;
        if bbox.is_degenerate() {
            return Ok(None);
        }

        let origin = bbox.south_west();
        let (lat_step, lon_step) = degree_steps(&origin, spacing_meters)?;
        if lat_step > bbox.height() || lon_step > bbox.width() {
            return Ok(None);
        }

        Ok(Some(Self {
            origin,
            lat_step,
            lon_step,
            rows: (bbox.height() / lat_step).floor() as usize + 1,
            cols: (bbox.width() / lon_step).floor() as usize + 1,
        }))
    }

    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    #[inline]
    pub fn lat_step(&self) -> f64 {
        self.lat_step
    }

    #[inline]
    pub fn lon_step(&self) -> f64 {
        self.lon_step
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total lattice candidates, `None` on overflow.
    pub fn candidate_count(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    /// Candidates of one lattice row, west to east.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Point> + '_ {
        let lat = self.origin.lat() + row as f64 * self.lat_step;
        (0..self.cols)
            .map(move |col| Point::new(self.origin.lon() + col as f64 * self.lon_step, lat))
    }

    /// All candidates in row-major order, south to north.
    pub fn candidates(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.rows).flat_map(move |row| self.row(row))
    }
}

/// One or more polygons to sample.
#[derive(Debug, Clone, Copy)]
pub enum Aoi<'a> {
    Polygon(&'a Polygon),
    Polygons(&'a [Polygon]),
}

impl<'a> Aoi<'a> {
    pub fn polygons(&self) -> &'a [Polygon] {
        match *self {
            Aoi::Polygon(polygon) => std::slice::from_ref(polygon),
            Aoi::Polygons(polygons) => polygons,
        }
    }
}

impl<'a> From<&'a Polygon> for Aoi<'a> {
    fn from(polygon: &'a Polygon) -> Self {
        Aoi::Polygon(polygon)
    }
}

impl<'a> From<&'a MultiPolygon> for Aoi<'a> {
    fn from(multi: &'a MultiPolygon) -> Self {
        Aoi::Polygons(multi.polygons())
    }
}

impl<'a> From<&'a [Polygon]> for Aoi<'a> {
    fn from(polygons: &'a [Polygon]) -> Self {
        Aoi::Polygons(polygons)
    }
}

impl<'a> From<&'a Vec<Polygon>> for Aoi<'a> {
    fn from(polygons: &'a Vec<Polygon>) -> Self {
        Aoi::Polygons(polygons.as_slice())
    }
}

/// Lattice sampler driven by a [`SamplerConfig`].
///
/// # Examples
///
/// ```
/// use geocover::compute::spatial::GridSampler;
/// use geocover::config::SamplerConfig;
/// use geocover::Polygon;
///
/// let square = Polygon::from_coords(&[(105.8, 21.0), (105.9, 21.0), (105.9, 21.1), (105.8, 21.1)]);
/// let sampler = GridSampler::new(SamplerConfig::default().with_parallel(false));
/// let points = sampler.sample(&square, 5000.0)?;
/// assert!(!points.is_empty());
/// assert!(points.iter().all(|p| square.contains(p)));
/// # Ok::<(), geocover::GeocoverError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct GridSampler {
    config: SamplerConfig,
}

impl GridSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Sample every polygon of `aoi`, concatenating results in polygon order.
    ///
    /// Within a polygon the output is row-major (south to north, west to
    /// east), followed by the polygon's vertices when `include_vertices` is
    /// set. Points shared by overlapping polygons are repeated; see
    /// [`unique_points`].
    ///
    /// Every polygon is validated and its lattice sized before any sampling,
    /// so an invalid member fails the whole call.
    pub fn sample<'a>(&self, aoi: impl Into<Aoi<'a>>, spacing_meters: f64) -> Result<Vec<Point>> {
        validate_spacing(spacing_meters)?;

        let polygons = aoi.into().polygons();
        let mut grids = Vec::with_capacity(polygons.len());
        for polygon in polygons {
            validate_polygon(polygon)?;
            let grid = SampleGrid::for_polygon(polygon, spacing_meters)?;
            if let Some(grid) = &grid {
                self.check_size(grid)?;
            }
            grids.push(grid);
        }

        let mut samples = Vec::new();
        for (polygon, grid) in polygons.iter().zip(&grids) {
            if let Some(grid) = grid {
                samples.extend(self.sample_grid(polygon, grid));
            }
            if self.config.include_vertices {
                samples.extend(polygon.vertices());
            }
        }

        log::debug!(
            "Sampled {} point(s) from {} polygon(s) at {} m spacing",
            samples.len(),
            polygons.len(),
            spacing_meters
        );
        Ok(samples)
    }

    fn check_size(&self, grid: &SampleGrid) -> Result<()> {
        match grid.candidate_count() {
            Some(count) if count <= self.config.max_candidates => Ok(()),
            count => {
                log::warn!(
                    "Refusing {} x {} lattice, limit is {} candidates",
                    grid.rows(),
                    grid.cols(),
                    self.config.max_candidates
                );
                Err(GeocoverError::InvalidInput(format!(
                    "Lattice of {} candidates exceeds the limit of {}",
                    count.map_or_else(|| "too many".to_string(), |c| c.to_string()),
                    self.config.max_candidates
                )))
            }
        }
    }

    fn sample_grid(&self, polygon: &Polygon, grid: &SampleGrid) -> Vec<Point> {
        log::debug!(
            "Scanning {} x {} lattice (steps {:.6} lat, {:.6} lon)",
            grid.rows(),
            grid.cols(),
            grid.lat_step(),
            grid.lon_step()
        );

        if self.config.parallel {
            (0..grid.rows())
                .into_par_iter()
                .flat_map_iter(move |row| grid.row(row).filter(move |p| polygon.contains(p)))
                .collect()
        } else {
            grid.candidates().filter(|p| polygon.contains(p)).collect()
        }
    }
}

/// Sample `aoi` with the default sampler settings.
///
/// Lattice points strictly inside a polygon are kept; points falling exactly
/// on a ring are dropped, which is why `include_vertices` exists.
pub fn sample<'a>(
    aoi: impl Into<Aoi<'a>>,
    spacing_meters: f64,
    include_vertices: bool,
) -> Result<Vec<Point>> {
    GridSampler::new(SamplerConfig::default().with_include_vertices(include_vertices))
        .sample(aoi, spacing_meters)
}

/// Sample the area within `radius_meters` of `center`, approximated by an
/// `n_vertices`-gon, including the n-gon's vertices.
pub fn sample_around(
    center: &Point,
    radius_meters: f64,
    n_vertices: usize,
    spacing_meters: f64,
) -> Result<Vec<Point>> {
    let area = circle(center, radius_meters, n_vertices)?;
    sample(&area, spacing_meters, true)
}

/// Drop repeated points, keeping the first occurrence of each.
pub fn unique_points(points: &[Point]) -> Vec<Point> {
    let mut seen = FxHashSet::default();
    points
        .iter()
        .filter(|p| seen.insert(((p.x() + 0.0).to_bits(), (p.y() + 0.0).to_bits())))
        .copied()
        .collect()
}
