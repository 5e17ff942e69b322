//! Instrument records, identities, and dispatch snapshots.

use crate::transport::DeviceKind;
use chrono::{DateTime, Utc};

/// Stable instrument identity: normalized vendor, model, and serial.
///
/// Normalization is trim + lowercase, so identity survives cosmetic
/// differences between discovery scans and operator input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstrumentId {
    vendor: String,
    model: String,
    serial: String,
}

impl InstrumentId {
    /// Build an identity from raw vendor/model/serial strings.
    pub fn new(vendor: &str, model: &str, serial: &str) -> Self {
        Self {
            vendor: normalize(vendor),
            model: normalize(model),
            serial: normalize(serial),
        }
    }
}

pub(crate) fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// A discovered instrument as the registry tracks it.
#[derive(Debug, Clone)]
pub struct InstrumentRecord {
    /// Transport resource address.
    pub address: String,
    /// Bus configuration.
    pub kind: DeviceKind,
    /// Vendor as reported by the instrument, original casing.
    pub vendor: String,
    /// Model as reported by the instrument, original casing.
    pub model: String,
    /// Serial as reported by the instrument, original casing.
    pub serial: String,
    /// Operator-assigned alias.
    pub alias: Option<String>,
    /// Set when the identity vanished from the latest scan.
    pub stale: bool,
    /// When the identity last answered a scan.
    pub last_seen: DateTime<Utc>,
}

impl InstrumentRecord {
    /// The record's stable identity key.
    pub fn id(&self) -> InstrumentId {
        InstrumentId::new(&self.vendor, &self.model, &self.serial)
    }

    /// Immutable dispatch snapshot of this record.
    pub fn snapshot(&self) -> InstrumentSnapshot {
        InstrumentSnapshot {
            address: self.address.clone(),
            kind: self.kind,
            vendor: self.vendor.clone(),
            model: self.model.clone(),
            serial: self.serial.clone(),
            alias: self.alias.clone(),
        }
    }
}

/// Immutable dispatch target captured under the registry lock.
///
/// Transport I/O runs against the snapshot after the lock is released; a
/// concurrent rescan replaces registry state but cannot invalidate a
/// snapshot already in flight.
#[derive(Debug, Clone)]
pub struct InstrumentSnapshot {
    /// Transport resource address.
    pub address: String,
    /// Bus configuration.
    pub kind: DeviceKind,
    /// Vendor, original casing.
    pub vendor: String,
    /// Model, original casing.
    pub model: String,
    /// Serial, original casing.
    pub serial: String,
    /// Alias at capture time.
    pub alias: Option<String>,
}
