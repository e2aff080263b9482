use std::{
    io,
    time::{Duration, Instant},
};

use tracing::trace;

use crate::{
    App,
    event::TuiEvent,
    event_loop::{EventLoop, RenderMode},
};

/// Terminal application runtime.
///
/// Owns the event loop and dispatches its events to an [`App`].
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate in Hz. `None` disables ticks.
    pub fn set_tick_rate(&mut self, rate: Option<f64>) {
        self.set_tick_interval(rate.map(|rate| Duration::from_secs_f64(1.0 / rate)));
    }

    /// Sets the tick interval. The schedule restarts from the current instant.
    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        trace!(?interval, "tick interval changed");
        self.events.set_tick_interval(interval, Instant::now());
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Runs the application until [`App::should_exit`] returns `true`.
    ///
    /// The terminal is put into raw mode and the alternate screen for the
    /// duration of the call and restored afterwards, also on error.
    ///
    /// # Errors
    ///
    /// Returns an error if reading terminal events or drawing fails.
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => app.update(&mut self),
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(&mut self, event),
                }
            }
            Ok(())
        })
    }
}
