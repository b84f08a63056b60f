//! Number grids and sequence neighborhoods.
//!
//! Ground truth for the two neighborhood puzzles:
//! - **Valley**: a cell strictly smaller than every present neighbor
//!   (8-connected, clipped at the edges).
//! - **Taller neighbors**: how many of a bar's immediate left/right
//!   neighbors are strictly taller (0, 1 or 2).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::ConfigError;

/// Offsets of the 8 surrounding cells.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Rectangular grid of integers, stored row-major.
///
/// Answer positions for grid puzzles are row-major cell indices:
/// `position = row * cols + col`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<i32>,
}

impl Grid {
    /// Build a grid from row vectors.
    ///
    /// ```
    /// use timed_rounds::puzzle::Grid;
    ///
    /// let grid = Grid::from_rows(&[vec![5, 9], vec![4, 1]]).unwrap();
    /// assert_eq!(grid.get(1, 1), Some(1));
    /// ```
    pub fn from_rows(rows: &[Vec<i32>]) -> Result<Self, ConfigError> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.is_empty() || cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: rows.len(),
                cols,
            });
        }

        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != cols {
                return Err(ConfigError::RaggedGrid {
                    row,
                    expected: cols,
                    found: values.len(),
                });
            }
            cells.extend_from_slice(values);
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            cells,
        })
    }

    /// Build a grid from row-major cells. Callers guarantee
    /// `cells.len() == rows * cols` with both dimensions non-zero.
    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<i32>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        Self { rows, cols, cells }
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total cell count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a constructed grid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major cell values.
    #[must_use]
    pub fn cells(&self) -> &[i32] {
        &self.cells
    }

    /// Value at `(row, col)`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    /// Row-major answer position of `(row, col)`.
    #[must_use]
    pub fn position(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// `(row, col)` of a row-major position.
    #[must_use]
    pub fn coords(&self, position: usize) -> (usize, usize) {
        (position / self.cols, position % self.cols)
    }

    /// Values of the up-to-8 neighbors present around `(row, col)`.
    #[must_use]
    pub fn neighbors(&self, row: usize, col: usize) -> SmallVec<[i32; 8]> {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dr, dc)| {
                let r = row.checked_add_signed(dr)?;
                let c = col.checked_add_signed(dc)?;
                self.get(r, c)
            })
            .collect()
    }

    /// Whether `(row, col)` is strictly smaller than every present neighbor.
    ///
    /// Missing neighbors at the edges never disqualify a cell, so a 1x1
    /// grid's only cell is a valley.
    #[must_use]
    pub fn is_valley(&self, row: usize, col: usize) -> bool {
        let Some(value) = self.get(row, col) else {
            return false;
        };
        self.neighbors(row, col).iter().all(|&n| value < n)
    }

    /// Valley flag for every cell, row-major.
    #[must_use]
    pub fn valleys(&self) -> Vec<bool> {
        (0..self.cells.len())
            .map(|position| {
                let (row, col) = self.coords(position);
                self.is_valley(row, col)
            })
            .collect()
    }
}

/// Count of strictly taller immediate neighbors for each bar.
///
/// ```
/// use timed_rounds::puzzle::taller_neighbor_counts;
///
/// assert_eq!(taller_neighbor_counts(&[3, 1, 4, 4, 2]), vec![0, 2, 0, 0, 1]);
/// ```
#[must_use]
pub fn taller_neighbor_counts(heights: &[i32]) -> Vec<u8> {
    heights
        .iter()
        .enumerate()
        .map(|(i, &h)| {
            let left = i > 0 && heights[i - 1] > h;
            let right = heights.get(i + 1).is_some_and(|&n| n > h);
            u8::from(left) + u8::from(right)
        })
        .collect()
}
