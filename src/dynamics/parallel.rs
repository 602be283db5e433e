//! Rayon-backed grid relaxation.
//!
//! Within one vertical sweep, the links between a given pair of rows touch
//! disjoint particles; within one horizontal sweep, each row is an
//! independent chain. Relaxing those groups concurrently while keeping the
//! row order gives exactly the sequential result.

use rayon::prelude::*;

use super::solver::{max_stretch, relax_pair, JakobsenSolver, RelaxationMetrics};
use crate::core::{point_mass::PointMass, topology::Grid};
use crate::utils::{math::Real, slots::pair_mut};

pub fn relax_grid(solver: &JakobsenSolver, grid: &mut Grid) -> RelaxationMetrics {
    let rows = grid.rows();
    let cols = grid.cols();
    let row_gap = grid.row_gap();
    let col_gap = grid.col_gap();
    let k = solver.correction_factor();

    let mut metrics = RelaxationMetrics {
        passes: solver.passes(),
        ..Default::default()
    };
    {
        let particles = grid.particles_mut();
        for _ in 0..solver.passes() {
            for row in 0..rows - 1 {
                metrics.merge(&relax_row_pair(particles, row, cols, row_gap, k));
            }
            metrics.merge(&relax_rows(particles, cols, col_gap, k));
        }
    }

    let (particles, constraints) = grid.split_mut();
    metrics.max_stretch = max_stretch(particles, constraints);
    if metrics.degenerate_skips > 0 {
        log::debug!(
            "parallel relaxation skipped {} degenerate corrections",
            metrics.degenerate_skips
        );
    }
    metrics
}

fn relax_row_pair(particles: &mut [PointMass], row: usize, cols: usize, rest_length: Real, k: Real) -> RelaxationMetrics {
    let (upper, lower) = particles.split_at_mut((row + 1) * cols);
    let top = &mut upper[row * cols..];
    let bottom = &mut lower[..cols];
    top.par_iter_mut()
        .zip(bottom.par_iter_mut())
        .fold(RelaxationMetrics::default, |mut acc, (v, w)| {
            acc.record(relax_pair(v, w, rest_length, k));
            acc
        })
        .reduce(RelaxationMetrics::default, |mut a, b| {
            a.merge(&b);
            a
        })
}

fn relax_rows(particles: &mut [PointMass], cols: usize, rest_length: Real, k: Real) -> RelaxationMetrics {
    particles
        .par_chunks_mut(cols)
        .map(|row| {
            let mut acc = RelaxationMetrics::default();
            for col in 0..cols - 1 {
                if let Some((v, w)) = pair_mut(row, col, col + 1) {
                    acc.record(relax_pair(v, w, rest_length, k));
                }
            }
            acc
        })
        .reduce(RelaxationMetrics::default, |mut a, b| {
            a.merge(&b);
            a
        })
}
