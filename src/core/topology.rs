//! Builders for the two connected particle layouts: a rope-like chain and a
//! cloth-like grid.

use serde::{Deserialize, Serialize};

use super::{constraints::DistanceConstraint, point_mass::PointMass};
use crate::error::{ensure_positive, Result, SimError};
use crate::utils::math::{bounding_corners, separation, vec2, Real, Vector};

/// `count` particles evenly spaced on the segment from `start` to `end`,
/// linked consecutively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ChainData")]
pub struct Chain {
    particles: Vec<PointMass>,
    constraints: Vec<DistanceConstraint>,
    rest_length: Real,
}

/// Row/column address of a grid particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridIndex {
    pub row: usize,
    pub col: usize,
}

impl GridIndex {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Axis-aligned `rows × cols` particle lattice stored row-major.
///
/// Rows run along +Y, columns along +X. Vertical constraints are stored
/// first (top-to-bottom, row-major), then horizontal ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    particles: Vec<PointMass>,
    constraints: Vec<DistanceConstraint>,
    rows: usize,
    cols: usize,
    row_gap: Real,
    col_gap: Real,
    vertical_count: usize,
}

#[derive(Deserialize)]
struct ChainData {
    particles: Vec<PointMass>,
    constraints: Vec<DistanceConstraint>,
    rest_length: Real,
}

impl TryFrom<ChainData> for Chain {
    type Error = SimError;

    /// Accepts only the layout [`build_chain`] produces.
    fn try_from(data: ChainData) -> Result<Self> {
        let count = data.particles.len();
        if count < 2 {
            return Err(SimError::invalid(format!(
                "a chain needs at least 2 particles, got {count}"
            )));
        }
        ensure_positive("rest length", data.rest_length)?;
        let expected = (0..count - 1).map(|i| (i, i + 1, data.rest_length));
        ensure_links(&data.constraints, expected, count - 1, "chain")?;
        Ok(Chain {
            particles: data.particles,
            constraints: data.constraints,
            rest_length: data.rest_length,
        })
    }
}

#[derive(Deserialize)]
struct GridData {
    particles: Vec<PointMass>,
    constraints: Vec<DistanceConstraint>,
    rows: usize,
    cols: usize,
    row_gap: Real,
    col_gap: Real,
    vertical_count: usize,
}

impl TryFrom<GridData> for Grid {
    type Error = SimError;

    /// Accepts only the layout [`build_grid`] produces, so the sweep
    /// helpers can index rows without further checks.
    fn try_from(data: GridData) -> Result<Self> {
        let GridData {
            particles,
            constraints,
            rows,
            cols,
            row_gap,
            col_gap,
            vertical_count,
        } = data;
        if rows < 2 || cols < 2 {
            return Err(SimError::invalid(format!(
                "a grid needs at least 2x2 particles, got {rows}x{cols}"
            )));
        }
        if rows.checked_mul(cols) != Some(particles.len()) {
            return Err(SimError::invalid(format!(
                "grid of {rows}x{cols} cannot hold {} particles",
                particles.len()
            )));
        }
        ensure_positive("row gap", row_gap)?;
        ensure_positive("column gap", col_gap)?;
        if vertical_count != (rows - 1) * cols {
            return Err(SimError::invalid(format!(
                "grid of {rows}x{cols} must have {} vertical links, got {vertical_count}",
                (rows - 1) * cols
            )));
        }

        let vertical = (0..rows - 1)
            .flat_map(|row| (0..cols).map(move |col| (row * cols + col, (row + 1) * cols + col, row_gap)));
        let horizontal = (0..rows)
            .flat_map(|row| (0..cols - 1).map(move |col| (row * cols + col, row * cols + col + 1, col_gap)));
        ensure_links(
            &constraints,
            vertical.chain(horizontal),
            vertical_count + rows * (cols - 1),
            "grid",
        )?;

        Ok(Grid {
            particles,
            constraints,
            rows,
            cols,
            row_gap,
            col_gap,
            vertical_count,
        })
    }
}

/// Checks that `links` follows the `(a, b, rest length)` sequence
/// `expected`, in order. Rest lengths may differ by text round-off.
fn ensure_links(
    links: &[DistanceConstraint],
    expected: impl Iterator<Item = (usize, usize, Real)>,
    expected_len: usize,
    layout: &str,
) -> Result<()> {
    if links.len() != expected_len {
        return Err(SimError::invalid(format!(
            "{layout} must have {expected_len} links, got {}",
            links.len()
        )));
    }
    for (i, (link, (a, b, rest))) in links.iter().zip(expected).enumerate() {
        if link.endpoints() != (a, b) || (link.rest_length() - rest).abs() > rest * 1e-9 {
            return Err(SimError::invalid(format!(
                "{layout} link {i} does not match the {layout} layout"
            )));
        }
    }
    Ok(())
}

pub fn build_chain(start: Vector, end: Vector, count: usize, radius: Real, mass: Real) -> Result<Chain> {
    if count < 2 {
        return Err(SimError::invalid(format!(
            "a chain needs at least 2 particles, got {count}"
        )));
    }
    let (direction, length) = separation(start, end)
        .ok_or_else(|| SimError::invalid("chain endpoints must be distinct"))?;
    let gap = length / (count - 1) as Real;

    let particles = (0..count)
        .map(|i| PointMass::new(start + direction * (gap * i as Real), radius, mass))
        .collect::<Result<Vec<_>>>()?;
    let constraints = (0..count - 1)
        .map(|i| DistanceConstraint::new(i, i + 1, gap))
        .collect::<Result<Vec<_>>>()?;

    log::debug!("built chain: {count} particles, gap {gap:.3}");
    Ok(Chain {
        particles,
        constraints,
        rest_length: gap,
    })
}

pub fn build_grid(start: Vector, end: Vector, side_count: usize, radius: Real, mass: Real) -> Result<Grid> {
    if side_count < 2 {
        return Err(SimError::invalid(format!(
            "a grid needs at least 2 particles per side, got {side_count}"
        )));
    }
    let (origin, far) = bounding_corners(start, end);
    let extent = far - origin;
    if extent.x <= 0.0 || extent.y <= 0.0 || !extent.is_finite() {
        return Err(SimError::invalid(format!(
            "grid corners must span a rectangle, got extent {extent}"
        )));
    }

    let rows = side_count;
    let cols = side_count;
    let row_gap = extent.y / (rows - 1) as Real;
    let col_gap = extent.x / (cols - 1) as Real;

    let mut particles = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let position = origin + vec2(col as Real * col_gap, row as Real * row_gap);
            particles.push(PointMass::new(position, radius, mass)?);
        }
    }

    let vertical_count = (rows - 1) * cols;
    let mut constraints = Vec::with_capacity(vertical_count + rows * (cols - 1));
    for row in 0..rows - 1 {
        for col in 0..cols {
            let a = row * cols + col;
            constraints.push(DistanceConstraint::new(a, a + cols, row_gap)?);
        }
    }
    for row in 0..rows {
        for col in 0..cols - 1 {
            let a = row * cols + col;
            constraints.push(DistanceConstraint::new(a, a + 1, col_gap)?);
        }
    }

    log::debug!(
        "built grid: {rows}x{cols}, row gap {row_gap:.3}, col gap {col_gap:.3}"
    );
    Ok(Grid {
        particles,
        constraints,
        rows,
        cols,
        row_gap,
        col_gap,
        vertical_count,
    })
}

impl Chain {
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn rest_length(&self) -> Real {
        self.rest_length
    }

    pub fn particles(&self) -> &[PointMass] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [PointMass] {
        &mut self.particles
    }

    pub fn constraints(&self) -> &[DistanceConstraint] {
        &self.constraints
    }

    /// Particles and constraints borrowed together for a relaxation sweep.
    pub fn split_mut(&mut self) -> (&mut [PointMass], &[DistanceConstraint]) {
        (&mut self.particles, &self.constraints)
    }
}

impl Grid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Spacing between consecutive rows (rest length of vertical links).
    pub fn row_gap(&self) -> Real {
        self.row_gap
    }

    /// Spacing between consecutive columns (rest length of horizontal links).
    pub fn col_gap(&self) -> Real {
        self.col_gap
    }

    /// Flat row-major index, or `None` when out of range.
    pub fn index(&self, at: GridIndex) -> Option<usize> {
        (at.row < self.rows && at.col < self.cols).then(|| at.row * self.cols + at.col)
    }

    pub fn coords(&self, index: usize) -> Option<GridIndex> {
        (index < self.particles.len()).then(|| GridIndex::new(index / self.cols, index % self.cols))
    }

    pub fn particle(&self, at: GridIndex) -> Option<&PointMass> {
        self.index(at).map(|i| &self.particles[i])
    }

    pub fn particle_mut(&mut self, at: GridIndex) -> Option<&mut PointMass> {
        let i = self.index(at)?;
        Some(&mut self.particles[i])
    }

    pub fn particles(&self) -> &[PointMass] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [PointMass] {
        &mut self.particles
    }

    pub fn constraints(&self) -> &[DistanceConstraint] {
        &self.constraints
    }

    /// Row-adjacent links, in sweep order.
    pub fn vertical_constraints(&self) -> &[DistanceConstraint] {
        &self.constraints[..self.vertical_count]
    }

    /// Column-adjacent links, in sweep order.
    pub fn horizontal_constraints(&self) -> &[DistanceConstraint] {
        &self.constraints[self.vertical_count..]
    }

    pub fn split_mut(&mut self) -> (&mut [PointMass], &[DistanceConstraint]) {
        (&mut self.particles, &self.constraints)
    }
}
