use std::io::{self, BufRead, BufReader, ErrorKind, Read};

use serialport::{SerialPortInfo, available_ports};
use tokio::sync::mpsc;

use crate::configs;
use crate::errors::{BridgeError, Result};

/// Picks the configured port, falling back to the first one the OS reports.
pub fn select_port(configured: Option<&str>) -> Result<String> {
    select_port_from(configured, available_ports)
}

/// [`select_port`] with the port enumeration supplied by `ports`, which is
/// only called when no port is configured.
pub fn select_port_from<F>(configured: Option<&str>, ports: F) -> Result<String>
where
    F: FnOnce() -> serialport::Result<Vec<SerialPortInfo>>,
{
    match configured {
        Some(port) => Ok(port.to_string()),
        None => ports()?
            .first()
            .map(|port| port.port_name.clone())
            .ok_or(BridgeError::NoSerialPort),
    }
}

/// An open line source, normally a serial port.
pub struct SerialSession {
    port_name: String,
    port: Box<dyn Read + Send>,
}

impl SerialSession {
    pub fn new(port_name: impl Into<String>, port: impl Read + Send + 'static) -> Self {
        Self {
            port_name: port_name.into(),
            port: Box::new(port),
        }
    }

    pub fn open(serial: &configs::Serial) -> Result<Self> {
        let port_name = select_port(serial.port.as_deref())?;

        tracing::debug!("Connect to port: {} @ {}", port_name, serial.baud_rate);

        let port = serialport::new(&port_name, serial.baud_rate)
            .timeout(serial.read_timeout())
            .open()?;

        Ok(Self::new(port_name, port))
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Blocks until the port fails; see [`forward_lines`].
    pub fn forward_lines(self, lines: mpsc::Sender<Vec<u8>>) -> io::Result<()> {
        forward_lines(self.port, lines)
    }
}

/// Reads newline terminated frames from `reader` and sends each raw frame to
/// `lines`. Read timeouts only mean the line is idle. Returns `Ok` once the
/// receiving side is gone and an error when the reader fails or closes.
pub fn forward_lines<R: Read>(reader: R, lines: mpsc::Sender<Vec<u8>>) -> io::Result<()> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                if !buf.is_empty() && lines.blocking_send(std::mem::take(&mut buf)).is_err() {
                    return Ok(());
                }
                return Err(io::Error::new(ErrorKind::UnexpectedEof, "serial port closed"));
            }
            Ok(_) if buf.ends_with(b"\n") => {
                if lines.blocking_send(std::mem::take(&mut buf)).is_err() {
                    return Ok(());
                }
            }
            Ok(_) => {}
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                if lines.is_closed() {
                    return Ok(());
                }
            }
            Err(e) => return Err(e),
        }
    }
}
