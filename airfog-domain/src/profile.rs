use serde::{Deserialize, Serialize};

/// Per-tracker-family constants: which BLE service, if any, the family
/// advertises under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerProfile {
    pub offered_service: Option<u16>,
}

impl TrackerProfile {
    pub fn new(offered_service: Option<u16>) -> Self {
        Self { offered_service }
    }

    /// The 2-byte little-endian encoding of the offered service, per
    /// the BLE assigned-numbers convention. Computed on demand so it
    /// can never drift from `offered_service`.
    pub fn encoded_service_id(&self) -> Option<[u8; 2]> {
        self.offered_service.map(u16::to_le_bytes)
    }
}
