use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LocationId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub position: Point,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Location({}, x={:.3}, y={:.3})",
            self.name, self.position.x, self.position.y
        )
    }
}

/// Endpoints of a connection in canonical order, so `a-b` and `b-a` compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionKey(pub LocationId, pub LocationId);

/// An undirected edge weighted by travel time in minutes.
///
/// `a` and `b` keep the orientation they were loaded with; the optimizer trials
/// `b` first, so orientation decides which endpoint wins an exact tie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub a: LocationId,
    pub b: LocationId,
    pub time: f64,
}

impl Connection {
    pub fn key(&self) -> ConnectionKey {
        if self.a <= self.b {
            ConnectionKey(self.a, self.b)
        } else {
            ConnectionKey(self.b, self.a)
        }
    }

    pub fn flipped(&self) -> Self {
        Self {
            a: self.b,
            b: self.a,
            time: self.time,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.a == self.b
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    locations: Vec<Location>,
    by_name: HashMap<String, LocationId>,
    connections: Vec<Connection>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_location(&mut self, name: &str, position: Point) -> Result<LocationId> {
        if self.by_name.contains_key(name) {
            return Err(Error::DuplicateLocation {
                name: name.to_string(),
            });
        }
        let id = LocationId(self.locations.len());
        self.locations.push(Location {
            name: name.to_string(),
            position,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Adds a connection and returns its index.
    ///
    /// A second connection over the same pair is kept as its own entry and counts
    /// twice toward the global error; see [`Graph::duplicate_connections`].
    pub fn connect(&mut self, a: LocationId, b: LocationId, time: f64) -> Result<usize> {
        if !time.is_finite() || time < 0.0 {
            return Err(Error::InvalidTravelTime { time });
        }
        let conn = Connection { a, b, time };
        if conn.is_self_loop() {
            warn!("self-loop on {}", self.locations[a.0].name);
        }
        let key = conn.key();
        if self.connections.iter().any(|c| c.key() == key) {
            warn!(
                "duplicate connection {} - {}",
                self.locations[a.0].name, self.locations[b.0].name
            );
        }
        self.connections.push(conn);
        Ok(self.connections.len() - 1)
    }

    pub fn location_id(&self, name: &str) -> Option<LocationId> {
        self.by_name.get(name).copied()
    }

    pub fn location(&self, id: LocationId) -> &Location {
        &self.locations[id.0]
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn position(&self, id: LocationId) -> Point {
        self.locations[id.0].position
    }

    pub fn set_position(&mut self, id: LocationId, position: Point) {
        self.locations[id.0].position = position;
    }

    pub fn endpoints(&self, conn: &Connection) -> (Point, Point) {
        (self.position(conn.a), self.position(conn.b))
    }

    pub fn length(&self, conn: &Connection) -> f64 {
        let (a, b) = self.endpoints(conn);
        a.distance(&b)
    }

    /// Keys that appear on more than one connection, in first-seen order.
    pub fn duplicate_connections(&self) -> Vec<ConnectionKey> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for conn in &self.connections {
            let key = conn.key();
            if !seen.insert(key) && !out.contains(&key) {
                out.push(key);
            }
        }
        out
    }

    pub fn describe(&self, conn: &Connection) -> String {
        format!(
            "Conn({}, {}, t={:.3})",
            self.location(conn.a),
            self.location(conn.b),
            conn.time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_cities() -> (Graph, LocationId, LocationId) {
        let mut g = Graph::new();
        let a = g.add_location("a", Point::new(0.0, 0.0)).unwrap();
        let b = g.add_location("b", Point::new(3.0, 4.0)).unwrap();
        (g, a, b)
    }

    #[test]
    fn distance_is_symmetric() {
        let p = Point::new(1.5, -2.0);
        let q = Point::new(-4.0, 7.25);
        assert_eq!(p.distance(&q), q.distance(&p));
        assert_eq!(Point::new(0.0, 0.0).distance(&Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn connection_key_ignores_orientation() {
        let (mut g, a, b) = two_cities();
        g.connect(a, b, 10.0).unwrap();
        g.connect(b, a, 12.0).unwrap();
        let c = g.connections();
        assert_eq!(c[0].key(), c[1].key());
        assert_eq!(c[0].flipped().a, b);
        assert_ne!(c[0], c[1]);
    }

    #[test]
    fn duplicate_location_rejected() {
        let (mut g, _, _) = two_cities();
        let err = g.add_location("a", Point::new(1.0, 1.0)).unwrap_err();
        assert!(matches!(err, Error::DuplicateLocation { ref name } if name == "a"));
    }

    #[test]
    fn duplicates_are_kept_and_reported() {
        let (mut g, a, b) = two_cities();
        g.connect(a, b, 10.0).unwrap();
        g.connect(b, a, 10.0).unwrap();
        g.connect(a, b, 10.0).unwrap();
        assert_eq!(g.connections().len(), 3);
        assert_eq!(g.duplicate_connections(), vec![ConnectionKey(a, b)]);
    }

    #[test]
    fn invalid_time_rejected() {
        let (mut g, a, b) = two_cities();
        assert!(matches!(
            g.connect(a, b, -1.0),
            Err(Error::InvalidTravelTime { .. })
        ));
        assert!(g.connect(a, b, f64::NAN).is_err());
        assert!(g.connections().is_empty());
    }

    #[test]
    fn snapshot_is_independent() {
        let (mut g, a, b) = two_cities();
        g.connect(a, b, 5.0).unwrap();
        let original = g.clone();
        g.set_position(b, Point::new(9.0, 9.0));
        assert_eq!(original.position(b), Point::new(3.0, 4.0));
        assert_eq!(g.length(&g.connections()[0]), Point::new(9.0, 9.0).distance(&Point::new(0.0, 0.0)));
    }
}
