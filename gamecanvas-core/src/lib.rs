#![warn(clippy::pedantic)]

pub mod assets;
pub mod cache;
pub mod canvas;
pub mod collision;
pub mod color;
pub mod config;
pub mod context;
pub mod draw;
pub mod math;
pub mod pool;
pub mod touch;
pub mod units;
pub mod util;

pub use context::{FrameInput, GameCanvas};
pub use ultraviolet::Vec2;
