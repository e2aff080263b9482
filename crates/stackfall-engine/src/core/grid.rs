use std::{fmt, rc::Rc};

use arrayvec::ArrayVec;

use super::shape::{Position, Shape};

/// Number of rows in the playfield.
pub const ROWS: usize = 20;
/// Number of columns in the playfield.
pub const COLS: usize = 10;

/// Number of leading columns that must be filled for a row to count as complete.
///
/// The last column does not take part in the check, so a row whose first
/// `COLS - 1` cells are filled is cleared whatever its last cell holds.
pub const COMPLETION_COLS: usize = COLS - 1;

/// A single cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum Cell {
    #[default]
    Empty,
    Filled,
}

/// One row of cells, shared between grid values until it is written to.
pub type Row = [Cell; COLS];

const EMPTY_ROW: Row = [Cell::Empty; COLS];

/// Fixed-size 20×10 playfield with value semantics.
///
/// Every update returns a new `Grid`. Rows are reference counted, so an update
/// only allocates the row it touches and the outer row table; the remaining
/// rows are shared with the previous value.
///
/// Updates that do not change anything return a clone of the same instance,
/// which callers can detect with [`Grid::ptr_eq`] to skip recomputation.
///
/// # Example
///
/// ```
/// use stackfall_engine::{Cell, Grid};
///
/// let grid = Grid::new();
/// let updated = grid.with_cell(3, 5, Cell::Filled);
/// assert!(updated.cell(3, 5).is_filled());
/// assert!(grid.cell(3, 5).is_empty());
///
/// // Writing the value a cell already holds is a no-op.
/// let again = updated.with_cell(3, 5, Cell::Filled);
/// assert!(Grid::ptr_eq(&updated, &again));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Rc<[Rc<Row>; ROWS]>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Creates a grid with every cell empty.
    #[must_use]
    pub fn new() -> Self {
        let empty = Rc::new(EMPTY_ROW);
        Self {
            rows: Rc::new(std::array::from_fn(|_| Rc::clone(&empty))),
        }
    }

    /// Returns `true` if both values are the same grid instance.
    #[must_use]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.rows, &other.rows)
    }

    /// Returns `true` if row `y` of both grids is the same shared row.
    #[must_use]
    pub fn shares_row(&self, other: &Self, y: usize) -> bool {
        Rc::ptr_eq(&self.rows[y], &other.rows[y])
    }

    /// Converts signed coordinates into an in-bounds index pair.
    #[must_use]
    pub fn checked_index(x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|x| *x < COLS)?;
        let y = usize::try_from(y).ok().filter(|y| *y < ROWS)?;
        Some((x, y))
    }

    /// Returns the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of range.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        assert!(x < COLS && y < ROWS, "cell ({x}, {y}) is outside the grid");
        self.rows[y][x]
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().map(|row| &**row)
    }

    /// Returns the number of filled cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.rows().flatten().filter(|cell| cell.is_filled()).count()
    }

    /// Returns a grid equal to this one except that `(x, y)` holds `value`.
    ///
    /// If the cell already holds `value`, the same instance is returned.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of range. Callers are expected to
    /// validate placements before writing them.
    #[must_use]
    pub fn with_cell(&self, x: usize, y: usize, value: Cell) -> Self {
        if self.cell(x, y) == value {
            return self.clone();
        }
        let mut rows = (*self.rows).clone();
        let mut row = *rows[y];
        row[x] = value;
        rows[y] = Rc::new(row);
        Self {
            rows: Rc::new(rows),
        }
    }

    /// Returns a grid with every in-bounds cell of `shape` at `pos` filled.
    ///
    /// Cells outside the grid are skipped.
    #[must_use]
    pub fn overlay_shape(&self, shape: &Shape, pos: Position) -> Self {
        shape
            .absolute_cells(pos)
            .filter_map(|(x, y)| Self::checked_index(x, y))
            .fold(self.clone(), |grid, (x, y)| {
                grid.with_cell(x, y, Cell::Filled)
            })
    }

    fn is_row_complete(row: &Row) -> bool {
        row[..COMPLETION_COLS].iter().all(|cell| cell.is_filled())
    }

    /// Returns the indices of rows that are currently complete.
    #[must_use]
    pub fn completed_rows(&self) -> ArrayVec<usize, ROWS> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| Self::is_row_complete(row))
            .map(|(y, _)| y)
            .collect()
    }

    /// Removes complete rows and returns the compacted grid with the number
    /// of rows removed.
    ///
    /// Rows are scanned top to bottom. When row `y` is complete, every row
    /// above it moves down by one and row 0 becomes empty. The row that moves
    /// into `y` has already been scanned, so the sweep continues at `y + 1`.
    ///
    /// Returns the same instance when nothing is cleared.
    #[must_use]
    pub fn clear_completed_rows(&self) -> (Self, usize) {
        let mut rows = (*self.rows).clone();
        let mut cleared = 0;
        for y in 0..ROWS {
            if !Self::is_row_complete(&rows[y]) {
                continue;
            }
            rows[..=y].rotate_right(1);
            rows[0] = Rc::new(EMPTY_ROW);
            cleared += 1;
        }
        if cleared == 0 {
            return (self.clone(), 0);
        }
        let grid = Self {
            rows: Rc::new(rows),
        };
        (grid, cleared)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                let ch = match cell {
                    Cell::Empty => '.',
                    Cell::Filled => '#',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shape::ShapeKind;

    fn fill_row(grid: &Grid, y: usize, cols: usize) -> Grid {
        (0..cols).fold(grid.clone(), |grid, x| grid.with_cell(x, y, Cell::Filled))
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new();
        assert_eq!(grid.rows().count(), ROWS);
        for row in grid.rows() {
            assert_eq!(row.len(), COLS);
            assert!(row.iter().all(|cell| cell.is_empty()));
        }
        assert_eq!(grid.filled_count(), 0);
    }

    #[test]
    fn test_with_cell_sets_single_cell() {
        let grid = Grid::new();
        let updated = grid.with_cell(4, 7, Cell::Filled);

        assert!(updated.cell(4, 7).is_filled());
        assert_eq!(updated.filled_count(), 1);
        // The receiver is untouched.
        assert_eq!(grid.filled_count(), 0);
    }

    #[test]
    fn test_with_cell_is_idempotent_by_reference() {
        let grid = Grid::new();
        for (x, y) in [(0, 0), (9, 19), (5, 10)] {
            for value in [Cell::Empty, Cell::Filled] {
                let once = grid.with_cell(x, y, value);
                let twice = once.with_cell(x, y, value);
                assert!(
                    Grid::ptr_eq(&once, &twice),
                    "repeated write of {value:?} at ({x}, {y}) allocated a new grid"
                );
            }
        }
    }

    #[test]
    fn test_with_cell_shares_untouched_rows() {
        let grid = fill_row(&Grid::new(), 3, 4);
        let updated = grid.with_cell(0, 8, Cell::Filled);

        assert!(!Grid::ptr_eq(&grid, &updated));
        assert!(!updated.shares_row(&grid, 8));
        for y in (0..ROWS).filter(|y| *y != 8) {
            assert!(updated.shares_row(&grid, y), "row {y} was copied");
        }
    }

    #[test]
    #[should_panic(expected = "outside the grid")]
    fn test_with_cell_out_of_range_panics() {
        let _ = Grid::new().with_cell(COLS, 0, Cell::Filled);
    }

    #[test]
    fn test_checked_index() {
        assert_eq!(Grid::checked_index(0, 0), Some((0, 0)));
        assert_eq!(Grid::checked_index(9, 19), Some((9, 19)));
        assert_eq!(Grid::checked_index(-1, 0), None);
        assert_eq!(Grid::checked_index(0, -1), None);
        assert_eq!(Grid::checked_index(10, 0), None);
        assert_eq!(Grid::checked_index(0, 20), None);
    }

    #[test]
    fn test_overlay_shape_fills_cells() {
        let shape = ShapeKind::O.template();
        let grid = Grid::new().overlay_shape(&shape, Position::new(4, 10));

        assert_eq!(grid.filled_count(), 4);
        for (x, y) in [(4, 10), (5, 10), (4, 11), (5, 11)] {
            assert!(grid.cell(x, y).is_filled());
        }
    }

    #[test]
    fn test_overlay_shape_skips_out_of_bounds_cells() {
        let shape = ShapeKind::I.template();
        // Vertical bar hanging two cells below the floor.
        let grid = Grid::new().overlay_shape(&shape, Position::new(0, 18));
        assert_eq!(grid.filled_count(), 2);
        assert!(grid.cell(0, 18).is_filled());
        assert!(grid.cell(0, 19).is_filled());

        // Entirely outside: nothing changes, same instance.
        let empty = Grid::new();
        let unchanged = empty.overlay_shape(&shape, Position::new(-3, 0));
        assert!(Grid::ptr_eq(&empty, &unchanged));
    }

    #[test]
    fn test_overlay_on_filled_cells_keeps_instance() {
        let shape = ShapeKind::O.template();
        let grid = Grid::new().overlay_shape(&shape, Position::new(0, 0));
        let again = grid.overlay_shape(&shape, Position::new(0, 0));
        assert!(Grid::ptr_eq(&grid, &again));
    }

    #[test]
    fn test_clear_on_empty_grid() {
        let grid = Grid::new();
        let (cleared_grid, cleared) = grid.clear_completed_rows();
        assert_eq!(cleared, 0);
        assert_eq!(cleared_grid, grid);
    }

    #[test]
    fn test_clear_single_row() {
        // Row 4 has a marker that should slide down into row 5.
        let grid = fill_row(&Grid::new(), 5, COMPLETION_COLS)
            .with_cell(2, 4, Cell::Filled)
            .with_cell(7, 4, Cell::Filled);
        let before = grid.clone();

        let (grid, cleared) = grid.clear_completed_rows();

        assert_eq!(cleared, 1);
        assert_eq!(grid.rows().nth(5), before.rows().nth(4));
        assert!(grid.rows().next().unwrap().iter().all(|c| c.is_empty()));
        assert_eq!(grid.filled_count(), 2);
        assert!(grid.cell(2, 5).is_filled());
        assert!(grid.cell(7, 5).is_filled());
        // Rows below the cleared one are shared, not copied.
        for y in 6..ROWS {
            assert!(grid.shares_row(&before, y));
        }
    }

    #[test]
    fn test_last_column_does_not_count() {
        // Last column empty: still complete.
        let grid = fill_row(&Grid::new(), 19, COMPLETION_COLS);
        assert_eq!(grid.completed_rows().as_slice(), &[19]);
        assert_eq!(grid.clear_completed_rows().1, 1);

        // Last column filled but a cell in the checked span empty: not complete.
        let grid = fill_row(&Grid::new(), 19, COLS).with_cell(0, 19, Cell::Empty);
        assert!(grid.completed_rows().is_empty());
        assert_eq!(grid.clear_completed_rows().1, 0);
    }

    #[test]
    fn test_clear_multiple_rows() {
        let mut grid = Grid::new();
        for y in [10, 12, 13] {
            grid = fill_row(&grid, y, COLS);
        }
        let grid = grid.with_cell(0, 11, Cell::Filled).with_cell(3, 9, Cell::Filled);

        let (grid, cleared) = grid.clear_completed_rows();

        assert_eq!(cleared, 3);
        assert_eq!(grid.filled_count(), 2);
        // Row 11 moved below the two lower clears; row 9 moved down by three.
        assert!(grid.cell(0, 13).is_filled());
        assert!(grid.cell(3, 12).is_filled());
        for y in 0..3 {
            assert!(grid.rows().nth(y).unwrap().iter().all(|c| c.is_empty()));
        }
    }

    #[test]
    fn test_clear_all_rows() {
        let mut grid = Grid::new();
        for y in 0..ROWS {
            grid = fill_row(&grid, y, COLS);
        }
        let (grid, cleared) = grid.clear_completed_rows();
        assert_eq!(cleared, ROWS);
        assert_eq!(grid.filled_count(), 0);
    }

    #[test]
    fn test_display() {
        let grid = Grid::new().with_cell(0, 0, Cell::Filled);
        let text = grid.to_string();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("#........."));
        assert_eq!(lines.next(), Some(".........."));
        assert_eq!(text.lines().count(), ROWS);
    }
}
