pub mod common;
pub mod engine;
pub mod possible_actions;
pub mod round;
pub mod string;
pub mod wall;

pub use engine::run_round;
pub use round::{Phase, Round, RoundSetup};
