use std::sync::Arc;

use tracing::{debug, warn};

use airfog_domain::adv;
use airfog_domain::profile::TrackerProfile;
use airfog_domain::record::{Location, RelayRecord};
use airfog_domain::snapshot::AdvertisementSnapshot;

use crate::client::RelayTransport;
use crate::error::{RelayError, Result};

/// Status line shown after a successful send.
pub const SENT_CONFIRMATION: &str = "Location and advertisement relayed";

/// Turns one user-initiated "send" into one relay submission: check
/// the precondition, re-encode the advertisement, assemble the record,
/// hand it to the transport. The transport is injected at construction
/// so callers own the wiring and tests can substitute a double.
pub struct RelayCoordinator {
    transport: Arc<dyn RelayTransport>,
}

impl RelayCoordinator {
    pub fn new(transport: Arc<dyn RelayTransport>) -> RelayCoordinator {
        RelayCoordinator { transport }
    }

    /// One submission, one outcome. Nothing is sent if encoding fails,
    /// and nothing is retried if the backend refuses.
    pub async fn submit(
        &self,
        location: Location,
        profile: &TrackerProfile,
        snapshot: &AdvertisementSnapshot,
    ) -> Result<()> {
        let device_id = snapshot
            .peripheral_id
            .ok_or(RelayError::MissingPeripheralId)?;

        let advertisement_data = adv::encode(snapshot, profile)?;
        debug!(
            %device_id,
            payload = %adv::hex_string(&advertisement_data),
            "encoded advertisement for relay"
        );

        let record = RelayRecord {
            device_id,
            // MAC deliberately withheld from the backend
            mac_address: None,
            location,
            advertisement_data,
        };

        if let Err(e) = self.transport.submit(&record).await {
            warn!(%device_id, error = %e, "relay submission failed");
            return Err(e);
        }
        Ok(())
    }
}
