mod settings;

pub use settings::{Govee, Logger, Serial, Settings, Trigger};
