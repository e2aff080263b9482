use rand::{Rng, distr::StandardUniform, prelude::Distribution};

/// Number of cells in every catalog shape.
pub const SHAPE_CELLS: usize = 4;

/// Offset of one shape cell relative to the shape's local origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellOffset {
    pub x: i32,
    pub y: i32,
}

impl CellOffset {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Origin of the active shape in grid coordinates.
///
/// (0, 0) is the top-left cell; x grows rightward, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Where every freshly spawned shape starts.
    pub const SPAWN: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn moved_by(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Catalog identity of a shape template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ShapeKind {
    /// T-shape, flat side up.
    T = 0,
    /// Z-shape, standing.
    Z = 1,
    /// J-shape, standing with the foot at the top.
    J = 2,
    /// I-shape, vertical.
    I = 3,
    /// O-shape.
    O = 4,
}

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        match rng.random_range(0..ShapeKind::LEN) {
            0 => ShapeKind::T,
            1 => ShapeKind::Z,
            2 => ShapeKind::J,
            3 => ShapeKind::I,
            _ => ShapeKind::O,
        }
    }
}

impl ShapeKind {
    /// Number of shape templates (5).
    pub const LEN: usize = 5;

    pub const ALL: [Self; Self::LEN] = [Self::T, Self::Z, Self::J, Self::I, Self::O];

    /// Returns the template shape for this kind in its spawn orientation.
    #[must_use]
    pub const fn template(self) -> Shape {
        SHAPE_TEMPLATES[self as usize]
    }
}

/// An immutable polyomino: cell offsets plus a bounding width and height.
///
/// Rotation returns a new `Shape` and leaves the receiver unchanged.
///
/// # Example
///
/// ```
/// use stackfall_engine::{Position, ShapeKind};
///
/// let shape = ShapeKind::I.template();
/// let rotated = shape.rotated();
/// assert_eq!(rotated.width(), shape.width());
///
/// let cells: Vec<_> = shape.absolute_cells(Position::new(2, 3)).collect();
/// assert_eq!(cells, [(2, 3), (2, 4), (2, 5), (2, 6)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    kind: ShapeKind,
    cells: [CellOffset; SHAPE_CELLS],
    width: i32,
    height: i32,
}

impl Shape {
    #[must_use]
    pub const fn new(
        kind: ShapeKind,
        cells: [CellOffset; SHAPE_CELLS],
        width: i32,
        height: i32,
    ) -> Self {
        Self {
            kind,
            cells,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub const fn cells(&self) -> &[CellOffset; SHAPE_CELLS] {
        &self.cells
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Iterates over the grid coordinates the shape covers when placed at `pos`.
    ///
    /// Coordinates may lie outside the grid.
    pub fn absolute_cells(&self, pos: Position) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells
            .iter()
            .map(move |cell| (cell.x + pos.x(), cell.y + pos.y()))
    }

    /// Returns the shape rotated by 90° about the center of its bounding box.
    ///
    /// The center is `(width / 2, height / 2)` in integer arithmetic. Each
    /// cell is translated so the center sits at the origin, mapped through
    /// `(x, y) -> (-y, x)` and translated back. Width and height are kept as
    /// they are, so the result may have offsets outside the unrotated box.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let cx = self.width / 2;
        let cy = self.height / 2;
        let cells = self.cells.map(|CellOffset { x, y }| {
            let (x, y) = (x - cx, y - cy);
            CellOffset::new(-y + cx, x + cy)
        });
        Self { cells, ..*self }
    }
}

const SHAPE_TEMPLATES: [Shape; ShapeKind::LEN] = {
    const fn s(
        kind: ShapeKind,
        cells: [(i32, i32); SHAPE_CELLS],
        width: i32,
        height: i32,
    ) -> Shape {
        let mut offsets = [CellOffset::new(0, 0); SHAPE_CELLS];
        let mut i = 0;
        while i < SHAPE_CELLS {
            offsets[i] = CellOffset::new(cells[i].0, cells[i].1);
            i += 1;
        }
        Shape::new(kind, offsets, width, height)
    }

    [
        s(ShapeKind::T, [(0, 0), (1, 0), (1, 1), (2, 0)], 3, 2),
        s(ShapeKind::Z, [(0, 1), (0, 2), (1, 1), (1, 0)], 2, 3),
        s(ShapeKind::J, [(0, 0), (0, 1), (0, 2), (1, 0)], 2, 3),
        s(ShapeKind::I, [(0, 0), (0, 1), (0, 2), (0, 3)], 1, 4),
        s(ShapeKind::O, [(0, 0), (0, 1), (1, 0), (1, 1)], 2, 2),
    ]
};
