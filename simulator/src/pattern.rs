use anyhow::{bail, Result};

use crate::grid::{Coord, Grid};

/// A named seed pattern: live-cell offsets relative to its top-left corner.
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(isize, isize)],
}

pub const BLOCK: Pattern = Pattern {
    name: "block",
    cells: &[(0, 0), (0, 1), (1, 0), (1, 1)],
};

pub const BLINKER: Pattern = Pattern {
    name: "blinker",
    cells: &[(0, 0), (0, 1), (0, 2)],
};

pub const TOAD: Pattern = Pattern {
    name: "toad",
    cells: &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
};

pub const BEACON: Pattern = Pattern {
    name: "beacon",
    cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)],
};

pub const GLIDER: Pattern = Pattern {
    name: "glider",
    cells: &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
};

pub const R_PENTOMINO: Pattern = Pattern {
    name: "r-pentomino",
    cells: &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)],
};

#[rustfmt::skip]
pub const LWSS: Pattern = Pattern {
    name: "lwss",
    cells: &[
        (0, 1), (0, 4),
        (1, 0),
        (2, 0), (2, 4),
        (3, 0), (3, 1), (3, 2), (3, 3),
    ],
};

#[rustfmt::skip]
pub const PULSAR: Pattern = Pattern {
    name: "pulsar",
    cells: &[
        // Top half
        (0, 2), (0, 3), (0, 4), (0, 8), (0, 9), (0, 10),
        (2, 0), (2, 5), (2, 7), (2, 12),
        (3, 0), (3, 5), (3, 7), (3, 12),
        (4, 0), (4, 5), (4, 7), (4, 12),
        (5, 2), (5, 3), (5, 4), (5, 8), (5, 9), (5, 10),
        // Bottom half (mirrored)
        (7, 2), (7, 3), (7, 4), (7, 8), (7, 9), (7, 10),
        (8, 0), (8, 5), (8, 7), (8, 12),
        (9, 0), (9, 5), (9, 7), (9, 12),
        (10, 0), (10, 5), (10, 7), (10, 12),
        (12, 2), (12, 3), (12, 4), (12, 8), (12, 9), (12, 10),
    ],
};

#[rustfmt::skip]
pub const GOSPER_GLIDER_GUN: Pattern = Pattern {
    name: "gosper-glider-gun",
    cells: &[
        // Left block
        (4, 0), (4, 1), (5, 0), (5, 1),
        // Left ship
        (2, 12), (2, 13), (3, 11), (3, 15), (4, 10), (4, 16), (5, 10),
        (5, 14), (5, 16), (5, 17), (6, 10), (6, 16), (7, 11), (7, 15),
        (8, 12), (8, 13),
        // Right ship
        (0, 24), (1, 22), (1, 24), (2, 20), (2, 21), (3, 20), (3, 21),
        (4, 20), (4, 21), (5, 22), (5, 24), (6, 24),
        // Right block
        (2, 34), (2, 35), (3, 34), (3, 35),
    ],
};

pub const PATTERNS: &[Pattern] = &[
    BLOCK,
    BLINKER,
    TOAD,
    BEACON,
    GLIDER,
    R_PENTOMINO,
    LWSS,
    PULSAR,
    GOSPER_GLIDER_GUN,
];

impl Pattern {
    /// `(height, width)` of the bounding box.
    pub fn size(&self) -> (isize, isize) {
        let rows = self.cells.iter().map(|&(r, _)| r).max().unwrap_or(-1) + 1;
        let cols = self.cells.iter().map(|&(_, c)| c).max().unwrap_or(-1) + 1;
        (rows, cols)
    }

    /// Sets the pattern's cells alive with its top-left corner at `origin`.
    /// Cells that land off the grid are dropped.
    pub fn place(&self, grid: &mut Grid, origin: Coord) {
        for &(dr, dc) in self.cells {
            if let Some(coord) = origin.offset(dr, dc) {
                grid.set(coord, true);
            }
        }
    }

    /// Origin that centers the pattern's bounding box on `grid`.
    pub fn centered(&self, grid: &Grid) -> Coord {
        let (rows, cols) = self.size();
        Coord::new(
            (grid.height() as isize - rows) / 2,
            (grid.width() as isize - cols) / 2,
        )
    }

    /// Looks a pattern up in [`PATTERNS`], ignoring case.
    pub fn by_name(name: &str) -> Result<&'static Pattern> {
        let wanted = name.trim().to_ascii_lowercase();
        match PATTERNS.iter().find(|p| p.name == wanted) {
            Some(pattern) => Ok(pattern),
            None => {
                let known: Vec<&str> = PATTERNS.iter().map(|p| p.name).collect();
                bail!("unknown pattern {name:?} (known: {})", known.join(", "))
            }
        }
    }
}
