use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::{Connection, Graph};

/// Average spatial distance per minute of travel, fixed for a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scale(f64);

impl Scale {
    /// Total connection length over total travel time, measured on the graph as loaded.
    pub fn estimate(graph: &Graph) -> Result<Self> {
        let mut total_len = 0.0;
        let mut total_time = 0.0;
        for conn in graph.connections() {
            total_len += graph.length(conn);
            total_time += conn.time;
        }
        if total_time <= 0.0 {
            return Err(Error::ZeroTotalTime);
        }
        Ok(Self(total_len / total_time))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn expected_distance(&self, time: f64) -> f64 {
        self.0 * time
    }
}

/// Positive when the edge is shorter than its travel time implies.
pub fn edge_error(graph: &Graph, scale: Scale, conn: &Connection) -> f64 {
    scale.expected_distance(conn.time) - graph.length(conn)
}

pub fn global_error(graph: &Graph, scale: Scale) -> f64 {
    graph
        .connections()
        .iter()
        .map(|c| edge_error(graph, scale, c).abs())
        .sum()
}
