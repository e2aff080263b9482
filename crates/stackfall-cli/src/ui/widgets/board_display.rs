use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use stackfall_engine::{COLS, Grid, ROWS};

use crate::ui::widgets::CellDisplay;

/// Draws a grid as-is.
///
/// Pass the engine's stage to show the falling shape together with the
/// settled cells.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    grid: &'a Grid,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        COLS as u16 * CellDisplay::WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        ROWS as u16 * CellDisplay::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..COLS).map(|_| Constraint::Length(CellDisplay::WIDTH));
        let row_constraints = (0..ROWS).map(|_| Constraint::Length(CellDisplay::HEIGHT));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let screen_cells = area
            .layout::<ROWS>(&vertical)
            .into_iter()
            .map(|row| row.layout::<COLS>(&horizontal));

        for (screen_row, row) in iter::zip(screen_cells, self.grid.rows()) {
            for (screen_cell, cell) in iter::zip(screen_row, row) {
                CellDisplay::from_cell(*cell).render(screen_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use stackfall_engine::Cell;

    use super::*;
    use crate::ui::widgets::style;

    #[test]
    fn test_size_includes_border() {
        let grid = Grid::new();
        assert_eq!(BoardDisplay::new(&grid).width(), 20);
        assert_eq!(BoardDisplay::new(&grid).height(), 20);

        let bordered = BoardDisplay::new(&grid).block(BlockWidget::bordered());
        assert_eq!(bordered.width(), 22);
        assert_eq!(bordered.height(), 22);
    }

    #[test]
    fn test_renders_filled_cells() {
        let grid = Grid::new()
            .with_cell(0, 0, Cell::Filled)
            .with_cell(9, 19, Cell::Filled);
        let board = BoardDisplay::new(&grid).block(BlockWidget::bordered());
        let area = Rect::new(0, 0, board.width(), board.height());
        let mut buf = Buffer::empty(area);

        board.render(area, &mut buf);

        // Inside the border, each grid cell spans two columns.
        assert_eq!(buf[(1, 1)].bg, style::FILLED.bg.unwrap());
        assert_eq!(buf[(2, 1)].bg, style::FILLED.bg.unwrap());
        assert_eq!(buf[(19, 20)].bg, style::FILLED.bg.unwrap());
        assert_eq!(buf[(20, 20)].bg, style::FILLED.bg.unwrap());
        assert_eq!(buf[(3, 1)].bg, style::EMPTY_DOT.bg.unwrap());
        assert_eq!(buf[(3, 1)].fg, style::EMPTY_DOT.fg.unwrap());
    }
}
