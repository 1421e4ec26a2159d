//! Infers 2D coordinates for named locations from pairwise travel times.
//!
//! Edge lengths are pulled toward `scale * time` by a hill climber that trials a
//! move of each endpoint of one connection per iteration and keeps the better
//! trial, or neither.

pub mod adjust;
pub mod config;
pub mod error;
pub mod graph;
pub mod load;
pub mod model;
pub mod optimize;
pub mod report;
pub mod select;

pub use adjust::{adjust, RatePolicy, DEFAULT_FIXED_RATE};
pub use config::{OptimizerConfig, DEFAULT_ITERATIONS};
pub use error::{DegenerateGeometry, Error, Result};
pub use graph::{Connection, ConnectionKey, Graph, Location, LocationId, Point};
pub use load::{load_graph, parse_connections, parse_locations, parse_travel_time};
pub use model::{edge_error, global_error, Scale};
pub use optimize::{decide, Checkpoint, Decision, Iteration, Optimizer, RunSummary, Trial};
pub use report::{write_locations, Comparison, LocationShift};
pub use select::{select, Candidate, SelectionPolicy};
