//! Serial bus transport backed by the `serialport` crate.

use super::{DeviceKind, Transport};
use crate::error::{BenchError, BenchResult};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{ErrorKind, Read, Write};
use std::time::Duration;
use tracing::debug;

/// Transport for instruments on local serial ports.
///
/// Ports are opened per transaction, matching a bench where devices come and
/// go between commands. The device kind selects framing: serial-LF resources
/// run at 115200 baud, 8N1, with line-feed write termination; direct
/// resources keep default framing.
pub struct SerialTransport {
    read_timeout: Duration,
}

impl SerialTransport {
    /// Create a transport with the given per-transaction read timeout.
    pub fn new(read_timeout: Duration) -> Self {
        Self { read_timeout }
    }

    fn open(&self, address: &str, kind: DeviceKind) -> BenchResult<Box<dyn SerialPort>> {
        let baud = match kind {
            DeviceKind::SerialLf => 115_200,
            DeviceKind::Direct => 9_600,
        };
        serialport::new(address, baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(self.read_timeout)
            .open()
            .map_err(|e| BenchError::Transport(format!("open {address}: {e}")))
    }

    fn send(port: &mut Box<dyn SerialPort>, command: &str) -> std::io::Result<()> {
        let framed = format!("{}\n", command.trim_end());
        port.write_all(framed.as_bytes())
    }

    fn read_response(
        &self,
        port: &mut Box<dyn SerialPort>,
        address: &str,
    ) -> BenchResult<String> {
        let mut buf = [0u8; 256];
        let mut out = Vec::new();
        loop {
            match port.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    out.extend_from_slice(&buf[..n]);
                    if out.contains(&b'\n') {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::TimedOut => {
                    // A timed-out read is a legitimate "no data" response.
                    debug!(%address, "read timeout, empty response");
                    break;
                }
                Err(e) => return Err(BenchError::Transport(format!("read {address}: {e}"))),
            }
        }
        Ok(String::from_utf8_lossy(&out).trim().to_string())
    }
}

impl Transport for SerialTransport {
    fn list_resources(&self) -> BenchResult<Vec<String>> {
        let ports = serialport::available_ports()
            .map_err(|e| BenchError::Transport(format!("port enumeration: {e}")))?;
        Ok(ports.into_iter().map(|p| p.port_name).collect())
    }

    fn query(&self, address: &str, kind: DeviceKind, command: &str) -> BenchResult<String> {
        let mut port = self.open(address, kind)?;
        Self::send(&mut port, command)
            .map_err(|e| BenchError::Transport(format!("write {address}: {e}")))?;
        self.read_response(&mut port, address)
    }

    fn write(&self, address: &str, kind: DeviceKind, command: &str) -> BenchResult<()> {
        let mut port = self.open(address, kind)?;
        match Self::send(&mut port, command) {
            // A timed-out write counts as delivered.
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(()),
            Err(e) => Err(BenchError::Transport(format!("write {address}: {e}"))),
            Ok(()) => Ok(()),
        }
    }
}
