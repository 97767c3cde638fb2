use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One immutable capture of what a nearby tracker broadcast at scan
/// time. Populated once by the capture layer; the encoder never goes
/// back to the radio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertisementSnapshot {
    pub is_connectable: bool,
    /// Raw per-service payloads as broadcast, keyed by 16-bit BLE
    /// service identifier. Values are opaque and not re-validated.
    pub service_data: HashMap<u16, Vec<u8>>,
    /// Stable identity of the observed peripheral. `None` means the
    /// capture layer could not resolve it; submission must refuse
    /// rather than invent an identity.
    pub peripheral_id: Option<Uuid>,
}

impl AdvertisementSnapshot {
    pub fn new(
        is_connectable: bool,
        service_data: HashMap<u16, Vec<u8>>,
        peripheral_id: Option<Uuid>,
    ) -> Self {
        Self {
            is_connectable,
            service_data,
            peripheral_id,
        }
    }

    pub fn service_data_for(&self, service: u16) -> Option<&[u8]> {
        self.service_data.get(&service).map(Vec::as_slice)
    }
}
