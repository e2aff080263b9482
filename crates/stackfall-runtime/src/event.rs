use crossterm::event::Event as CrosstermEvent;

/// Events dispatched by the runtime.
#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// One elapsed boundary of the tick schedule.
    Tick,
    /// Time to redraw.
    Render,
    /// Key input, mouse, resize and other terminal events.
    Crossterm(CrosstermEvent),
}
