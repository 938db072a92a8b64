pub mod algorithms;
pub use algorithms::{
    DistanceMetric, degree_steps, destination, distance, distance_between, distance_km,
    haversine_distance,
};

pub mod circle;
pub use circle::{circle, circle_points};

pub mod grid;
pub use grid::{Aoi, GridSampler, SampleGrid, sample, sample_around, unique_points};
