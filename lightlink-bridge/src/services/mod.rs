mod cooldown;
mod dispatcher;
mod registry;
mod serial;
mod trigger;

pub use cooldown::*;
pub use dispatcher::*;
pub use registry::*;
pub use serial::*;
pub use trigger::*;
