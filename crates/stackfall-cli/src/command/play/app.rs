use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use stackfall_engine::{GameEngine, TickOutcome};
use stackfall_runtime::{App, RenderMode, Runtime, TimerDriver};
use tracing::{debug, info};

use crate::ui::widgets::{GameDisplay, KeyBinding, KeyBindingDisplay};

/// How often the runtime wakes up to drive the gravity timer and redraw.
const POLL_RATE: f64 = 60.0;

const PLAYING_BINDINGS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↓"], "Soft Drop"),
    (&["↑"], "Rotate"),
    (&["Q", "Esc"], "Quit"),
];
const GAME_OVER_BINDINGS: &[KeyBinding] = &[(&["Q", "Esc"], "Quit")];

fn apply_gravity(engine: &mut GameEngine) {
    match engine.tick() {
        TickOutcome::Fell | TickOutcome::Halted => {}
        TickOutcome::Locked { cleared_rows } => {
            if cleared_rows > 0 {
                debug!(cleared_rows, score = engine.score(), "rows cleared");
            }
        }
        TickOutcome::ToppedOut { .. } => info!(score = engine.score(), "game over"),
    }
}

/// Maps a terminal key to the engine's key name.
fn key_name(code: KeyCode) -> Option<&'static str> {
    match code {
        KeyCode::Up => Some("ArrowUp"),
        KeyCode::Left => Some("ArrowLeft"),
        KeyCode::Right => Some("ArrowRight"),
        KeyCode::Down => Some("ArrowDown"),
        _ => None,
    }
}

fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// One play session: an engine plus the gravity timer driving it.
///
/// The timer is started in [`App::init`] and stopped when the player quits or
/// the game ends. Dropping the app drops the timer with it.
#[derive(Debug)]
pub struct PlayApp {
    engine: GameEngine,
    gravity: TimerDriver<'static, GameEngine>,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(engine: GameEngine, tick: Duration) -> Self {
        Self {
            engine,
            gravity: TimerDriver::new(tick, apply_gravity),
            is_exiting: false,
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    fn start(&mut self, now: Instant) {
        if !self.engine.is_game_over() {
            self.gravity.start(now);
        }
    }

    fn advance(&mut self, now: Instant) {
        if self.gravity.advance(now, &mut self.engine) > 0 && self.engine.is_game_over() {
            self.gravity.stop();
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if is_quit_key(key) {
            info!(score = self.engine.score(), "quit requested");
            self.is_exiting = true;
            self.gravity.stop();
            return;
        }
        if let Some(name) = key_name(key.code) {
            self.engine.handle_key(name);
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(POLL_RATE));
        runtime.set_render_mode(RenderMode::throttled_from_rate(POLL_RATE));
        self.start(Instant::now());
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        if let Some(key) = event.as_key_press_event() {
            self.handle_key(&key);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let bindings = if self.engine.is_game_over() {
            GAME_OVER_BINDINGS
        } else {
            PLAYING_BINDINGS
        };
        let game_display = GameDisplay::new(&self.engine);
        let help = KeyBindingDisplay::new(bindings);

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(game_display.height()),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(game_display, main_area);
        frame.render_widget(help, help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime) {
        self.advance(Instant::now());
    }
}
