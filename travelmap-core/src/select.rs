use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::model::{edge_error, Scale};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Any connection, uniformly.
    #[default]
    Random,
    /// The connection with the largest absolute error.
    #[serde(alias = "top")]
    ExhaustiveWorst,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Index into [`Graph::connections`].
    pub index: usize,
    pub error: f64,
}

/// Picks the connection to work on this iteration, or `None` if there are none.
pub fn select<R: Rng + ?Sized>(
    policy: SelectionPolicy,
    graph: &Graph,
    scale: Scale,
    rng: &mut R,
) -> Option<Candidate> {
    let conns = graph.connections();
    if conns.is_empty() {
        return None;
    }
    match policy {
        SelectionPolicy::Random => {
            let index = rng.gen_range(0..conns.len());
            Some(Candidate {
                index,
                error: edge_error(graph, scale, &conns[index]),
            })
        }
        SelectionPolicy::ExhaustiveWorst => {
            let mut best: Option<Candidate> = None;
            for (index, conn) in conns.iter().enumerate() {
                let error = edge_error(graph, scale, conn);
                match best {
                    Some(b) if error.abs() <= b.error.abs() => {}
                    _ => best = Some(Candidate { index, error }),
                }
            }
            best
        }
    }
}
