use std::fmt;

use log::warn;

pub const DEFAULT_WIDTH: usize = 32;
pub const DEFAULT_HEIGHT: usize = 32;

/// Moore neighborhood offsets as `(row, col)` deltas. The center is excluded.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A `(row, col)` position. Signed so that off-grid neighbors such as
/// `(-1, -1)` can be named and then rejected by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    pub row: isize,
    pub col: isize,
}

impl Coord {
    pub const fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }

    /// `self` shifted by the given deltas, or `None` if either component
    /// overflows. An overflowing position is off every grid.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add(d_row)?,
            col: self.col.checked_add(d_col)?,
        })
    }
}

impl From<(isize, isize)> for Coord {
    fn from((row, col): (isize, isize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Conversion into a stored cell byte. Anything "truthy" becomes 1.
pub trait IntoCell {
    fn into_cell(self) -> u8;
}

impl IntoCell for bool {
    fn into_cell(self) -> u8 {
        self as u8
    }
}

impl IntoCell for u8 {
    fn into_cell(self) -> u8 {
        (self != 0) as u8
    }
}

/// Fixed-size rectangular board of binary cells, stored row-major in a flat
/// byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Grid {
    /// Creates an all-dead grid. Zero dimensions are clamped to 1.
    pub fn new(width: usize, height: usize) -> Self {
        let (width, height) = clamp_dimensions(width, height);
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Creates a grid from an initial buffer.
    ///
    /// The buffer must hold exactly `width * height` bytes. Any other length
    /// is discarded in favor of a zero-filled buffer, so the caller always
    /// gets a usable grid. Nonzero bytes are normalized to 1.
    pub fn with_cells(width: usize, height: usize, cells: Vec<u8>) -> Self {
        let (width, height) = clamp_dimensions(width, height);
        let expected = width * height;
        if cells.len() != expected {
            warn!(
                "Ignoring initial cells for {}x{} grid: expected {} values, got {}",
                width,
                height,
                expected,
                cells.len()
            );
            return Self::new(width, height);
        }
        let cells = cells.into_iter().map(IntoCell::into_cell).collect();
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major view of the raw cell bytes.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    fn contains(&self, coord: Coord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && (coord.row as usize) < self.height
            && (coord.col as usize) < self.width
    }

    /// Row-major index of `coord`, or `None` if it lies off the grid.
    pub fn index_for(&self, coord: Coord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        Some(coord.row as usize * self.width + coord.col as usize)
    }

    /// Inverse of [`Grid::index_for`]. Indices past the end of the buffer
    /// map to `None`.
    pub fn coord_for(&self, index: usize) -> Option<Coord> {
        if index >= self.cells.len() {
            return None;
        }
        let coord = Coord::new((index / self.width) as isize, (index % self.width) as isize);
        self.contains(coord).then_some(coord)
    }

    /// Value at `coord`. Off-grid cells read as dead.
    pub fn get(&self, coord: Coord) -> u8 {
        self.index_for(coord).map_or(0, |i| self.cells[i])
    }

    pub fn is_alive(&self, coord: Coord) -> bool {
        self.get(coord) != 0
    }

    /// Stores `value` as 0 or 1. Writes to off-grid coordinates are ignored.
    pub fn set(&mut self, coord: Coord, value: impl IntoCell) {
        if let Some(i) = self.index_for(coord) {
            self.cells[i] = value.into_cell();
        }
    }

    pub fn toggle(&mut self, coord: Coord) {
        let alive = self.is_alive(coord);
        self.set(coord, !alive);
    }

    /// Number of live cells among the 8 Moore neighbors of `coord`.
    pub fn living_neighbors(&self, coord: Coord) -> u8 {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dr, dc)| coord.offset(dr, dc))
            .map(|neighbor| self.get(neighbor))
            .sum()
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Every in-bounds coordinate, row-major.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let width = self.width as isize;
        (0..self.height as isize)
            .flat_map(move |row| (0..width).map(move |col| Coord::new(row, col)))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks_exact(self.width)
    }
}

fn clamp_dimensions(width: usize, height: usize) -> (usize, usize) {
    if width == 0 || height == 0 {
        warn!("Grid dimensions must be positive (got {}x{}); clamping to 1", width, height);
    }
    (width.max(1), height.max(1))
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for &cell in row {
                f.write_str(if cell != 0 { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
