//! Reader for the two plain-text input tables.
//!
//! Locations are `name,x,y`; connections are `from,to,H:MM`. Lines starting with
//! `#` and blank lines are skipped, and fields past the third are ignored.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::graph::{Graph, LocationId, Point};

pub fn load_graph<P: AsRef<Path>, Q: AsRef<Path>>(coords: P, conns: Q) -> Result<Graph> {
    let mut graph = Graph::new();
    parse_locations(&fs::read_to_string(coords)?, &mut graph)?;
    parse_connections(&fs::read_to_string(conns)?, &mut graph)?;
    info!(
        "Loaded {} locations and {} connections",
        graph.locations().len(),
        graph.connections().len()
    );
    Ok(graph)
}

pub fn parse_locations(text: &str, graph: &mut Graph) -> Result<usize> {
    let mut count = 0;
    for (line, fields) in records(text) {
        let [name, x, y] = fields_3(line, &fields)?;
        let x = parse_coord(line, x)?;
        let y = parse_coord(line, y)?;
        graph.add_location(name, Point::new(x, y))?;
        count += 1;
    }
    Ok(count)
}

pub fn parse_connections(text: &str, graph: &mut Graph) -> Result<usize> {
    let mut count = 0;
    for (line, fields) in records(text) {
        let [from, to, time] = fields_3(line, &fields)?;
        let a = lookup(graph, line, from)?;
        let b = lookup(graph, line, to)?;
        let minutes = parse_travel_time(time).ok_or_else(|| Error::Parse {
            line,
            message: format!("travel time `{time}` is not H:MM"),
        })?;
        graph.connect(a, b, minutes as f64)?;
        count += 1;
    }
    Ok(count)
}

/// `H:MM` to total minutes. Minutes past 59 are accepted as-is.
pub fn parse_travel_time(s: &str) -> Option<u32> {
    let (hours, mins) = s.trim().split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let mins: u32 = mins.trim().parse().ok()?;
    hours.checked_mul(60)?.checked_add(mins)
}

fn records(text: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    text.lines().enumerate().filter_map(|(i, raw)| {
        if raw.starts_with('#') || raw.trim().is_empty() {
            return None;
        }
        Some((i + 1, raw.split(',').map(str::trim).collect()))
    })
}

fn fields_3<'a>(line: usize, fields: &[&'a str]) -> Result<[&'a str; 3]> {
    match fields {
        [a, b, c, ..] => Ok([*a, *b, *c]),
        _ => Err(Error::Parse {
            line,
            message: format!("expected 3 comma-separated fields, found {}", fields.len()),
        }),
    }
}

fn parse_coord(line: usize, s: &str) -> Result<f64> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::Parse {
            line,
            message: format!("invalid coordinate `{s}`"),
        }),
    }
}

fn lookup(graph: &Graph, line: usize, name: &str) -> Result<LocationId> {
    graph.location_id(name).ok_or_else(|| Error::UnknownLocation {
        line,
        name: name.to_string(),
    })
}
