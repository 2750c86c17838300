pub mod clock;
pub mod input;
pub mod result;
pub mod state;
