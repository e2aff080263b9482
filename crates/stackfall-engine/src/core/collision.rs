use super::{
    grid::Grid,
    shape::{Position, Shape},
};

/// Returns `true` if `shape` placed at `pos` lies inside `grid` and covers
/// only empty cells.
///
/// This is the single gate for every position or rotation change of the
/// falling shape. It must be called with the settled grid, never with the
/// staged grid that already contains the falling shape.
///
/// # Example
///
/// ```
/// use stackfall_engine::{Grid, Position, ShapeKind, is_valid};
///
/// let grid = Grid::new();
/// let shape = ShapeKind::O.template();
/// assert!(is_valid(&grid, &shape, Position::new(8, 18)));
/// assert!(!is_valid(&grid, &shape, Position::new(9, 18)));
/// ```
#[must_use]
pub fn is_valid(grid: &Grid, shape: &Shape, pos: Position) -> bool {
    shape.absolute_cells(pos).all(|(x, y)| {
        Grid::checked_index(x, y).is_some_and(|(x, y)| grid.cell(x, y).is_empty())
    })
}
