//! Records stored by the pool.

pub mod position;
pub mod tick;

pub use position::Position;
pub use tick::Tick;
