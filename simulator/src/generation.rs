/**
 * Generation stepping: applying a rule to every cell of the present grid
 * and writing the result into the future grid.
 */

use anyhow::{bail, Result};
use log::trace;

use crate::grid::Grid;
use crate::rule::Rule;

/// Computes the next generation of `present` into `future`.
///
/// Every cell of `future` is overwritten with
/// `rule(present.is_alive(c), present.living_neighbors(c))`. Each new value
/// depends only on `present`, so visiting order does not matter. Both grids
/// must have the same dimensions; a mismatch is rejected before any cell is
/// written.
pub fn advance<R: Rule + ?Sized>(present: &Grid, future: &mut Grid, rule: &mut R) -> Result<()> {
    if present.dimensions() != future.dimensions() {
        bail!(
            "dimension mismatch: present is {}x{}, future is {}x{}",
            present.width(),
            present.height(),
            future.width(),
            future.height()
        );
    }

    for coord in present.coords() {
        let alive = rule.next(present.is_alive(coord), present.living_neighbors(coord));
        future.set(coord, alive);
    }
    Ok(())
}

/// The present/future pair. After each step the freshly written grid becomes
/// the present and the old present is kept as scratch space for the next
/// step, so no grid is reallocated across generations.
#[derive(Debug, Clone)]
pub struct Generations {
    present: Grid,
    future: Grid,
    number: u64,
}

impl Generations {
    pub fn new(width: usize, height: usize) -> Self {
        Self::from_grid(Grid::new(width, height))
    }

    /// Starts from `grid` as generation 0, with a matching scratch grid.
    pub fn from_grid(grid: Grid) -> Self {
        let future = Grid::new(grid.width(), grid.height());
        Self {
            present: grid,
            future,
            number: 0,
        }
    }

    pub fn present(&self) -> &Grid {
        &self.present
    }

    /// Mutable access for user edits between steps.
    pub fn present_mut(&mut self) -> &mut Grid {
        &mut self.present
    }

    /// Number of steps taken so far.
    pub fn generation(&self) -> u64 {
        self.number
    }

    pub fn step<R: Rule + ?Sized>(&mut self, rule: &mut R) -> Result<()> {
        advance(&self.present, &mut self.future, rule)?;
        std::mem::swap(&mut self.present, &mut self.future);
        self.number += 1;
        trace!(
            "Generation {}: population {}",
            self.number,
            self.present.population()
        );
        Ok(())
    }

    /// True once a step has been taken and it left the grid unchanged.
    pub fn is_stable(&self) -> bool {
        self.number > 0 && self.present == self.future
    }
}
