#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Govee API error: {0}")]
    Api(#[from] lightlink_api::Error),

    #[error("Serial error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GOVEE_DEVICES empty and API discovery failed or returned no devices")]
    NoDevices,

    #[error("No serial port configured and none detected")]
    NoSerialPort,
}

pub type Result<T> = std::result::Result<T, BridgeError>;
