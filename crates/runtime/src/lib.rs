pub mod budget;
pub mod frame;
pub mod metrics;
pub mod throttle;
pub mod work_queue;

pub use budget::*;
pub use frame::*;
pub use metrics::*;
pub use throttle::*;
pub use work_queue::*;
