pub use self::{
    app::App,
    event_loop::RenderMode,
    runtime::Runtime,
    timer::{TickSchedule, TimerDriver},
};

mod app;
mod event;
mod event_loop;
mod runtime;
mod timer;
