pub mod calculator;
pub mod format;
pub mod fraction;
pub mod state;
