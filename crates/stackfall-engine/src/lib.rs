pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("spawned shape collides with the settled grid")]
pub struct SpawnCollisionError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParseShapeSeedError {
    #[display("invalid shape seed: expected 32 hex digits, got {_0} characters")]
    InvalidLength(#[error(not(source))] usize),
    #[display("invalid shape seed: {_0:?} is not 32 hex digits")]
    InvalidDigit(#[error(not(source))] String),
}
