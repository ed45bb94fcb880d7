mod control;
mod device;
mod response;

pub use control::*;
pub use device::*;
pub use response::*;
