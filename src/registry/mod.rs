//! Alias-based instrument registry.
//!
//! Holds discovered instruments keyed by stable identity, assigns aliases,
//! and dispatches alias-addressed queries and writes. A single mutex guards
//! discovery, alias mutation, and lookup; transport I/O always runs outside
//! the guard against immutable [`InstrumentSnapshot`]s.
//!
//! Rescans merge instead of replace: an identity that answers again keeps
//! its alias, an identity that stops answering is marked stale (and stops
//! resolving) rather than dropped, so a flaky bus never silently destroys an
//! operator's alias table.

pub mod instrument;

pub use instrument::{InstrumentId, InstrumentRecord, InstrumentSnapshot};

use crate::error::BenchResult;
use crate::transport::{parse_identity, DeviceKind, Transport};
use chrono::Utc;
use instrument::normalize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Shared instrument registry.
pub struct InstrumentRegistry {
    transport: Arc<dyn Transport>,
    inner: Mutex<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    instruments: HashMap<InstrumentId, InstrumentRecord>,
    /// Normalized alias -> identity index; one identity per alias.
    aliases: HashMap<String, InstrumentId>,
}

impl InstrumentRegistry {
    /// Create an empty registry over the given transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            inner: Mutex::new(RegistryState::default()),
        }
    }

    /// Rescan the bus and merge the results into the known instrument set.
    ///
    /// Every enumerated resource is probed with an identity query; resources
    /// that error, stay silent, or answer unusably are skipped without
    /// failing the scan. Returns the merged instrument set.
    pub fn discover(&self) -> BenchResult<Vec<InstrumentRecord>> {
        let mut state = self.inner.lock().unwrap();
        let resources = self.transport.list_resources()?;
        info!(resources = resources.len(), "scanning bus");

        let mut seen: Vec<InstrumentId> = Vec::new();
        for address in resources {
            let kind = DeviceKind::classify(&address);
            let response = match self.transport.query(&address, kind, "*IDN?") {
                Ok(r) => r,
                Err(e) => {
                    warn!(%address, error = %e, "resource skipped during scan");
                    continue;
                }
            };
            let response = response.trim();
            if response.len() <= 8 {
                debug!(%address, "no usable identity response");
                continue;
            }
            let Some((vendor, model, serial)) = parse_identity(response) else {
                warn!(%address, response, "identity response not parseable");
                continue;
            };

            let id = InstrumentId::new(&vendor, &model, &serial);
            let now = Utc::now();
            match state.instruments.get_mut(&id) {
                Some(record) => {
                    record.address = address;
                    record.kind = kind;
                    record.stale = false;
                    record.last_seen = now;
                }
                None => {
                    info!(%vendor, %model, %serial, %address, "discovered instrument");
                    state.instruments.insert(
                        id.clone(),
                        InstrumentRecord {
                            address,
                            kind,
                            vendor,
                            model,
                            serial,
                            alias: None,
                            stale: false,
                            last_seen: now,
                        },
                    );
                }
            }
            seen.push(id);
        }

        for (id, record) in state.instruments.iter_mut() {
            if !record.stale && !seen.contains(id) {
                info!(
                    vendor = %record.vendor,
                    model = %record.model,
                    serial = %record.serial,
                    "instrument vanished, marking stale"
                );
                record.stale = true;
            }
        }

        Ok(Self::sorted(&state))
    }

    /// Current instrument set, sorted by address for stable output.
    pub fn list(&self) -> Vec<InstrumentRecord> {
        Self::sorted(&self.inner.lock().unwrap())
    }

    fn sorted(state: &RegistryState) -> Vec<InstrumentRecord> {
        let mut list: Vec<InstrumentRecord> = state.instruments.values().cloned().collect();
        list.sort_by(|a, b| a.address.cmp(&b.address));
        list
    }

    /// Bind an alias to the instrument matching the identity fields.
    ///
    /// Matching is case-insensitive and trim-normalized. Rebinding an alias
    /// that currently names a different instrument replaces the old binding
    /// with a warning; repeating an identical assignment is a no-op.
    /// Returns false when no instrument matches the identity.
    pub fn assign_alias(&self, alias: &str, vendor: &str, model: &str, serial: &str) -> bool {
        let mut state = self.inner.lock().unwrap();
        let id = InstrumentId::new(vendor, model, serial);
        if !state.instruments.contains_key(&id) {
            warn!(%alias, %vendor, %model, %serial, "device not found, alias not set");
            return false;
        }

        let key = normalize(alias);
        if let Some(previous) = state.aliases.get(&key).cloned() {
            if previous != id {
                warn!(%alias, "alias already bound to another instrument, rebinding");
                if let Some(old) = state.instruments.get_mut(&previous) {
                    old.alias = None;
                }
            }
        }
        // An instrument holds at most one alias; release any other binding.
        state.aliases.retain(|_, bound| *bound != id);
        state.aliases.insert(key, id.clone());
        if let Some(record) = state.instruments.get_mut(&id) {
            record.alias = Some(alias.trim().to_string());
        }
        true
    }

    /// Resolve an alias to a dispatch snapshot. Stale instruments do not
    /// resolve.
    pub fn resolve(&self, alias: &str) -> Option<InstrumentSnapshot> {
        let state = self.inner.lock().unwrap();
        Self::matching(&state, alias).into_iter().next()
    }

    fn matching(state: &RegistryState, alias: &str) -> Vec<InstrumentSnapshot> {
        let key = normalize(alias);
        state
            .instruments
            .values()
            .filter(|record| !record.stale)
            .filter(|record| {
                record
                    .alias
                    .as_deref()
                    .is_some_and(|a| normalize(a) == key)
            })
            .map(InstrumentRecord::snapshot)
            .collect()
    }

    /// Query every live instrument bound to `alias` and concatenate the
    /// replies. An alias matching nothing yields an empty string; the miss
    /// is logged, not raised.
    pub fn query(&self, alias: &str, command: &str) -> BenchResult<String> {
        let snapshots = {
            let state = self.inner.lock().unwrap();
            Self::matching(&state, alias)
        };
        if snapshots.is_empty() {
            debug!(%alias, "query on unbound alias");
            return Ok(String::new());
        }

        let mut response = String::new();
        for snapshot in snapshots {
            let reply = self
                .transport
                .query(&snapshot.address, snapshot.kind, command)?;
            info!(%alias, command = %command.trim(), reply = %reply.trim(), "query");
            response.push_str(&reply);
        }
        Ok(response)
    }

    /// Write to the first live instrument bound to `alias`. An unbound alias
    /// is a logged no-op.
    pub fn write(&self, alias: &str, command: &str) -> BenchResult<()> {
        let Some(snapshot) = self.resolve(alias) else {
            warn!(%alias, "write on unbound alias");
            return Ok(());
        };
        self.transport
            .write(&snapshot.address, snapshot.kind, command)?;
        info!(%alias, command = %command.trim(), "write");
        Ok(())
    }
}
