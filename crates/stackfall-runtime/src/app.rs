use crossterm::event::Event;
use ratatui::Frame;

use crate::Runtime;

/// A terminal application driven by [`Runtime::run`].
///
/// All callbacks run on the same thread, one at a time, so the application
/// never observes a tick and a key event concurrently.
pub trait App {
    /// Called once before the first event. Configure tick and render rates here.
    fn init(&mut self, runtime: &mut Runtime);

    /// Returns whether the event loop should stop.
    fn should_exit(&self) -> bool;

    /// Handles a terminal event (key input, mouse, resize, etc.).
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    /// Draws the current state.
    fn draw(&self, frame: &mut Frame);

    /// Called once per tick.
    fn update(&mut self, runtime: &mut Runtime);
}
