use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};
use stackfall_engine::GameEngine;

use crate::ui::widgets::{BoardDisplay, ScoreDisplay, color, style};

/// Board and score panel side by side, with a popup once the game is over.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    engine: &'a GameEngine,
}

impl<'a> GameDisplay<'a> {
    pub fn new(engine: &'a GameEngine) -> Self {
        Self { engine }
    }

    fn board(&self) -> BoardDisplay<'a> {
        BoardDisplay::new(self.engine.stage()).block(
            Block::bordered()
                .border_style(self.border_color())
                .style(style::DEFAULT),
        )
    }

    fn score_panel(&self) -> ScoreDisplay<'a> {
        ScoreDisplay::new(self.engine.stats()).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(Padding::horizontal(1))
                .border_style(self.border_color())
                .style(style::DEFAULT),
        )
    }

    fn border_color(&self) -> ratatui::style::Color {
        if self.engine.is_game_over() {
            color::RED
        } else {
            color::WHITE
        }
    }

    pub fn height(&self) -> u16 {
        u16::max(self.board().height(), self.score_panel().height())
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let board = self.board();
        let score_panel = self.score_panel();

        let [board_column, score_column] = Layout::horizontal([
            Constraint::Length(board.width()),
            Constraint::Length(score_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);
        let [board_area] =
            Layout::vertical([Constraint::Length(board.height())]).areas(board_column);
        let [score_area] =
            Layout::vertical([Constraint::Length(score_panel.height())]).areas(score_column);

        let board_width = board.width();
        board.render(board_area, buf);
        score_panel.render(score_area, buf);

        if self.engine.is_game_over() {
            let block = Block::new().style(style::GAME_OVER);
            let text = Text::styled("GAME OVER", style::GAME_OVER).centered();
            let area = board_area.centered(Constraint::Length(board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
