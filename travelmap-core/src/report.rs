use std::io::{self, Write};

use serde::Serialize;

use crate::graph::{Graph, Point};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationShift {
    pub name: String,
    pub original: Point,
    pub optimized: Point,
    pub displacement: f64,
}

/// Before/after view of every location, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub locations: Vec<LocationShift>,
    pub max_displacement: f64,
}

impl Comparison {
    /// Locations missing from `original` are compared against their own final position.
    pub fn new(original: &Graph, optimized: &Graph) -> Self {
        let mut locations = Vec::with_capacity(optimized.locations().len());
        let mut max_displacement: f64 = 0.0;
        for loc in optimized.locations() {
            let before = original
                .location_id(&loc.name)
                .map(|id| original.position(id))
                .unwrap_or(loc.position);
            let displacement = before.distance(&loc.position);
            max_displacement = max_displacement.max(displacement);
            locations.push(LocationShift {
                name: loc.name.clone(),
                original: before,
                optimized: loc.position,
                displacement,
            });
        }
        Self {
            locations,
            max_displacement,
        }
    }
}

/// Writes positions in the loader's `name,x,y` format.
pub fn write_locations<W: Write>(graph: &Graph, mut out: W) -> io::Result<()> {
    writeln!(out, "# name,x,y")?;
    for loc in graph.locations() {
        writeln!(out, "{},{},{}", loc.name, loc.position.x, loc.position.y)?;
    }
    out.flush()
}
