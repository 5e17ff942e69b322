//! Mock transport for tests and offline development.

use super::{DeviceKind, Transport};
use crate::error::{BenchError, BenchResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// Scripted in-memory transport double.
///
/// Resources answer `*IDN?` with a canned identity; additional per-command
/// responses can be stubbed. Every query and write is recorded so tests can
/// assert exactly what reached the bus. Resources can be added and removed
/// after construction to simulate devices being plugged and unplugged
/// between scans.
#[derive(Default)]
pub struct MockTransport {
    resources: Mutex<Vec<String>>,
    identities: Mutex<HashMap<String, String>>,
    failing: Mutex<Vec<String>>,
    responses: Mutex<HashMap<(String, String), String>>,
    log: Mutex<MockLog>,
}

#[derive(Default)]
struct MockLog {
    queries: Vec<(String, String)>,
    writes: Vec<(String, String)>,
}

impl MockTransport {
    /// Create an empty mock with no resources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource that answers `*IDN?` with `identity`.
    pub fn with_resource(self, address: &str, identity: &str) -> Self {
        self.add_resource(address, identity);
        self
    }

    /// Add a resource that errors on any access (a dead or busy port).
    pub fn with_failing_resource(self, address: &str) -> Self {
        self.resources.lock().unwrap().push(address.to_string());
        self.failing.lock().unwrap().push(address.to_string());
        self
    }

    /// Add a silent resource: present on the bus, every read times out.
    pub fn with_silent_resource(self, address: &str) -> Self {
        self.resources.lock().unwrap().push(address.to_string());
        self
    }

    /// Plug in a resource after construction.
    pub fn add_resource(&self, address: &str, identity: &str) {
        self.resources.lock().unwrap().push(address.to_string());
        self.identities
            .lock()
            .unwrap()
            .insert(address.to_string(), identity.to_string());
    }

    /// Unplug a resource: it stops enumerating and answering.
    pub fn remove_resource(&self, address: &str) {
        self.resources.lock().unwrap().retain(|a| a != address);
        self.identities.lock().unwrap().remove(address);
    }

    /// Make an existing resource error on any further access.
    pub fn fail_resource(&self, address: &str) {
        self.failing.lock().unwrap().push(address.to_string());
    }

    /// Stub the response for `command` on `address`.
    pub fn stub_response(&self, address: &str, command: &str, response: &str) {
        self.responses.lock().unwrap().insert(
            (address.to_string(), command.to_string()),
            response.to_string(),
        );
    }

    /// Queries issued so far, as `(address, command)`.
    pub fn queries(&self) -> Vec<(String, String)> {
        self.log.lock().unwrap().queries.clone()
    }

    /// Commands written (fire-and-forget) so far, as `(address, command)`.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.log.lock().unwrap().writes.clone()
    }
}

impl Transport for MockTransport {
    fn list_resources(&self) -> BenchResult<Vec<String>> {
        Ok(self.resources.lock().unwrap().clone())
    }

    fn query(&self, address: &str, _kind: DeviceKind, command: &str) -> BenchResult<String> {
        if self.failing.lock().unwrap().iter().any(|a| a == address) {
            return Err(BenchError::Transport(format!("resource busy: {address}")));
        }
        self.log
            .lock()
            .unwrap()
            .queries
            .push((address.to_string(), command.to_string()));

        if command == "*IDN?" {
            if let Some(identity) = self.identities.lock().unwrap().get(address) {
                return Ok(identity.clone());
            }
        }
        // Unanswered reads time out, which the transport boundary turns
        // into an empty response.
        let responses = self.responses.lock().unwrap();
        Ok(responses
            .get(&(address.to_string(), command.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn write(&self, address: &str, _kind: DeviceKind, command: &str) -> BenchResult<()> {
        if self.failing.lock().unwrap().iter().any(|a| a == address) {
            return Err(BenchError::Transport(format!("resource busy: {address}")));
        }
        self.log
            .lock()
            .unwrap()
            .writes
            .push((address.to_string(), command.to_string()));
        Ok(())
    }
}
