//! Instrument transport boundary.
//!
//! A [`Transport`] enumerates bus resources and moves raw command strings to
//! and from instruments. Read timeouts are recovered at this boundary: a
//! timed-out query yields an empty response and a timed-out write counts as
//! sent, so the bench core only ever sees real bus failures.

pub mod mock;
#[cfg(feature = "transport_serial")]
pub mod serial;

use crate::error::BenchResult;
use serde::{Deserialize, Serialize};

/// Bus configuration a resource is driven with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceKind {
    /// Addressed-bus resource with default framing.
    Direct,
    /// Serial line at 115200 baud, 8N1, line-feed terminated.
    SerialLf,
}

impl DeviceKind {
    /// Classify a resource address by its bus prefix.
    pub fn classify(address: &str) -> Self {
        if address.starts_with("ASRL")
            || address.starts_with("/dev/tty")
            || address.starts_with("COM")
        {
            DeviceKind::SerialLf
        } else {
            DeviceKind::Direct
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceKind::Direct => write!(f, "DIRECT"),
            DeviceKind::SerialLf => write!(f, "SERIAL_LF"),
        }
    }
}

/// Blocking transport primitive used by the registry.
///
/// Implementations are shared behind `Arc` and called outside the registry
/// lock; a call may block for up to the configured read timeout.
pub trait Transport: Send + Sync {
    /// Enumerate candidate resource addresses.
    fn list_resources(&self) -> BenchResult<Vec<String>>;

    /// Write `command`, then read one response. A read timeout yields `Ok("")`.
    fn query(&self, address: &str, kind: DeviceKind, command: &str) -> BenchResult<String>;

    /// Write `command` without reading back. A timeout counts as delivered.
    fn write(&self, address: &str, kind: DeviceKind, command: &str) -> BenchResult<()>;
}

/// Parse an identity response into `(vendor, model, serial)`.
///
/// Comma-delimited fields are used when the response carries at least three
/// commas (the standard `*IDN?` shape), otherwise whitespace fields.
/// `parts[0]` is the vendor, `parts[1]` the model, and the remaining fields
/// join into the serial with single spaces. Fewer than two fields is
/// unusable.
pub fn parse_identity(response: &str) -> Option<(String, String, String)> {
    let parts: Vec<&str> = if response.matches(',').count() >= 3 {
        response
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    } else {
        response.split_whitespace().collect()
    };
    if parts.len() < 2 {
        return None;
    }
    Some((
        parts[0].to_string(),
        parts[1].to_string(),
        parts[2..].join(" "),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_address_prefix() {
        assert_eq!(DeviceKind::classify("ASRL3::INSTR"), DeviceKind::SerialLf);
        assert_eq!(DeviceKind::classify("/dev/ttyUSB0"), DeviceKind::SerialLf);
        assert_eq!(DeviceKind::classify("COM4"), DeviceKind::SerialLf);
        assert_eq!(DeviceKind::classify("GPIB0::5::INSTR"), DeviceKind::Direct);
        assert_eq!(
            DeviceKind::classify("TCPIP0::192.168.1.10::INSTR"),
            DeviceKind::Direct
        );
    }

    #[test]
    fn identity_with_three_commas_splits_on_commas() {
        let (vendor, model, serial) =
            parse_identity("Keysight Technologies,34465A,MY12345678,A.03.01").unwrap();
        assert_eq!(vendor, "Keysight Technologies");
        assert_eq!(model, "34465A");
        assert_eq!(serial, "MY12345678 A.03.01");
    }

    #[test]
    fn identity_with_few_commas_splits_on_whitespace() {
        let (vendor, model, serial) = parse_identity("Stanford DG645 s/n 001043").unwrap();
        assert_eq!(vendor, "Stanford");
        assert_eq!(model, "DG645");
        assert_eq!(serial, "s/n 001043");
    }

    #[test]
    fn identity_needs_at_least_two_fields() {
        assert!(parse_identity("GARBLEDTEXT").is_none());
        assert!(parse_identity("").is_none());
    }

    #[test]
    fn empty_comma_fields_are_dropped() {
        let (vendor, model, serial) = parse_identity("ACME,,PS-2000,,SN42,").unwrap();
        assert_eq!(vendor, "ACME");
        assert_eq!(model, "PS-2000");
        assert_eq!(serial, "SN42");
    }
}
