pub mod adapter;
pub mod binding;
pub mod config;
pub mod descriptor;
pub mod driver;
pub mod error;
pub mod parallax;
pub mod queue;
pub mod registry;
pub mod residency;
pub mod scheduler;
pub mod tier;
pub mod waiters;

pub use adapter::*;
pub use binding::*;
pub use config::*;
pub use descriptor::*;
pub use driver::*;
pub use error::*;
pub use parallax::*;
pub use queue::*;
pub use registry::*;
pub use residency::*;
pub use scheduler::*;
pub use tier::*;
pub use waiters::*;
