use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::adjust::adjust;
use crate::config::OptimizerConfig;
use crate::error::Result;
use crate::graph::{Connection, Graph, LocationId, Point};
use crate::model::{global_error, Scale};
use crate::select::select;

/// Positions of both endpoints of a connection before any trial move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checkpoint {
    saved: [(LocationId, Point); 2],
}

impl Checkpoint {
    pub fn take(graph: &Graph, conn: &Connection) -> Self {
        Self {
            saved: [
                (conn.a, graph.position(conn.a)),
                (conn.b, graph.position(conn.b)),
            ],
        }
    }

    pub fn saved(&self, id: LocationId) -> Option<Point> {
        self.saved.iter().find(|(i, _)| *i == id).map(|(_, p)| *p)
    }

    pub fn restore(&self, graph: &mut Graph) {
        for (id, pos) in self.saved {
            graph.set_position(id, pos);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Decision {
    Reject,
    CommitA,
    CommitB,
}

/// Exact ties between the two trials go to B.
pub fn decide(prev: f64, error_a: f64, error_b: f64) -> Decision {
    if prev < error_a && prev < error_b {
        Decision::Reject
    } else if error_a < error_b {
        Decision::CommitA
    } else {
        Decision::CommitB
    }
}

/// One tentative move of a single endpoint, measured but not yet applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trial {
    pub moved: LocationId,
    pub position: Point,
    pub rate: f64,
    pub error: f64,
    /// The endpoints coincided, so the endpoint stayed put.
    pub degenerate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Iteration {
    pub connection: usize,
    pub candidate_error: f64,
    pub prev_error: f64,
    pub trial_a: Trial,
    pub trial_b: Trial,
    pub decision: Decision,
    pub global_error: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub iterations: usize,
    pub commits_a: usize,
    pub commits_b: usize,
    pub rejects: usize,
    pub degenerate_trials: usize,
    pub initial_error: f64,
    pub final_error: f64,
    pub stopped_early: bool,
}

impl RunSummary {
    fn new(initial_error: f64) -> Self {
        Self {
            iterations: 0,
            commits_a: 0,
            commits_b: 0,
            rejects: 0,
            degenerate_trials: 0,
            initial_error,
            final_error: initial_error,
            stopped_early: false,
        }
    }

    fn record(&mut self, it: &Iteration) {
        self.iterations += 1;
        match it.decision {
            Decision::Reject => self.rejects += 1,
            Decision::CommitA => self.commits_a += 1,
            Decision::CommitB => self.commits_b += 1,
        }
        self.degenerate_trials += [it.trial_a, it.trial_b]
            .iter()
            .filter(|t| t.degenerate)
            .count();
        self.final_error = it.global_error;
    }
}

pub struct Optimizer<R> {
    config: OptimizerConfig,
    scale: Scale,
    global_error: f64,
    rng: R,
}

impl<R: Rng> Optimizer<R> {
    /// Estimates the scale from `graph` as it is now; fails on zero total travel time.
    pub fn new(graph: &Graph, config: OptimizerConfig, rng: R) -> Result<Self> {
        let scale = Scale::estimate(graph)?;
        Self::with_scale(graph, config, scale, rng)
    }

    pub fn with_scale(graph: &Graph, config: OptimizerConfig, scale: Scale, rng: R) -> Result<Self> {
        config.validate()?;
        let global_error = global_error(graph, scale);
        info!("Found {} locations.", graph.locations().len());
        info!("Found {} connections.", graph.connections().len());
        info!(
            "Average distance-per-time: {:.3} units/min",
            scale.value()
        );
        info!("Total error: {:.3} units", global_error);
        Ok(Self {
            config,
            scale,
            global_error,
            rng,
        })
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn global_error(&self) -> f64 {
        self.global_error
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Runs one select/trial/decide cycle. `None` means there was nothing to select.
    pub fn step(&mut self, graph: &mut Graph) -> Option<Iteration> {
        let cand = select(self.config.selection, graph, self.scale, &mut self.rng)?;
        let conn = graph.connections()[cand.index];
        let prev_error = self.global_error;
        debug!(
            "Candidate: {} [d={:.3}, e={:.3}, gd={:.3}]",
            graph.describe(&conn),
            graph.length(&conn),
            cand.error,
            prev_error
        );

        let checkpoint = Checkpoint::take(graph, &conn);
        let trial_b = self.trial(graph, &checkpoint, conn.a, conn.b, cand.error);
        let trial_a = self.trial(graph, &checkpoint, conn.b, conn.a, cand.error);

        let decision = decide(prev_error, trial_a.error, trial_b.error);
        self.global_error = match decision {
            Decision::Reject => {
                debug!("Reject.");
                prev_error
            }
            Decision::CommitA => {
                graph.set_position(trial_a.moved, trial_a.position);
                trial_a.error
            }
            Decision::CommitB => {
                graph.set_position(trial_b.moved, trial_b.position);
                trial_b.error
            }
        };
        debug!("Total error: {:.3} units", self.global_error);

        Some(Iteration {
            connection: cand.index,
            candidate_error: cand.error,
            prev_error,
            trial_a,
            trial_b,
            decision,
            global_error: self.global_error,
        })
    }

    /// Runs the configured number of iterations, stopping early only when
    /// there are no connections to select.
    pub fn run(&mut self, graph: &mut Graph) -> RunSummary {
        let mut summary = RunSummary::new(self.global_error);
        for n in 0..self.config.iterations {
            debug!("Iteration {}.", n);
            let Some(it) = self.step(graph) else {
                info!("No candidate connection left. Exiting.");
                summary.stopped_early = true;
                break;
            };
            summary.record(&it);
        }
        info!(
            "Finished {} iterations: {} commits, {} rejects, total error {:.3} -> {:.3}",
            summary.iterations,
            summary.commits_a + summary.commits_b,
            summary.rejects,
            summary.initial_error,
            summary.final_error
        );
        summary
    }

    // Leaves the graph exactly at the checkpoint on return.
    fn trial(
        &mut self,
        graph: &mut Graph,
        checkpoint: &Checkpoint,
        fixed: LocationId,
        movable: LocationId,
        signed_error: f64,
    ) -> Trial {
        let rate = self.config.rate.draw(&mut self.rng);
        let start = graph.position(movable);
        match adjust(graph.position(fixed), start, signed_error, rate) {
            Ok(position) => {
                graph.set_position(movable, position);
                let error = global_error(graph, self.scale);
                debug!(
                    "Adjusted : {} to ({:.3}, {:.3}) [gd={:.3}]",
                    graph.location(movable).name,
                    position.x,
                    position.y,
                    error
                );
                checkpoint.restore(graph);
                Trial {
                    moved: movable,
                    position,
                    rate,
                    error,
                    degenerate: false,
                }
            }
            Err(err) => {
                debug!("Skipping move of {}: {}", graph.location(movable).name, err);
                Trial {
                    moved: movable,
                    position: start,
                    rate,
                    error: self.global_error,
                    degenerate: true,
                }
            }
        }
    }
}
