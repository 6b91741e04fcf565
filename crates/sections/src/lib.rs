pub mod blend;
pub mod config;
pub mod controller;
pub mod score;

pub use blend::*;
pub use config::*;
pub use controller::*;
pub use score::*;
