use thiserror::Error;

use crate::profile::TrackerProfile;
use crate::snapshot::AdvertisementSnapshot;

// BLE AD structure type octets (Assigned Numbers, Common Data Types)
pub const AD_TYPE_FLAGS: u8 = 0x01;
pub const AD_TYPE_INCOMPLETE_16BIT_SERVICE_UUIDS: u8 = 0x03;
pub const AD_TYPE_SERVICE_DATA_16BIT: u8 = 0x16;

/// LE General Discoverable Mode + BR/EDR Not Supported.
pub const FLAGS_GENERAL_DISCOVERABLE: u8 = 0x06;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdvError {
    #[error("service data of {len} bytes overflows the AD length octet")]
    PayloadTooLarge { len: usize },

    #[error("truncated AD structure at offset {offset}")]
    Truncated { offset: usize },
}

/// Re-encode a captured advertisement into a BLE AD byte stream for
/// relay. Structures are emitted in a fixed order, each one
/// `[length][type][value..]` with the type octet counted by the length
/// octet:
///
/// 1. Flags, only when the advertisement declared the device
///    connectable.
/// 2. Incomplete list of 16-bit service UUIDs, only when the profile
///    offers a service.
/// 3. Service data for the offered service, only when the snapshot
///    carries bytes under that identifier; the value is the
///    little-endian service id followed by the captured bytes
///    verbatim.
///
/// Either the whole stream is produced or nothing is: service data too
/// long for the single length octet fails the encode outright rather
/// than truncating.
pub fn encode(
    snapshot: &AdvertisementSnapshot,
    profile: &TrackerProfile,
) -> Result<Vec<u8>, AdvError> {
    let mut out = Vec::new();

    if snapshot.is_connectable {
        out.extend_from_slice(&[0x02, AD_TYPE_FLAGS, FLAGS_GENERAL_DISCOVERABLE]);
    }

    let Some(service_id) = profile.encoded_service_id() else {
        // No offered service: nothing ties this capture to a service,
        // so the UUID-list and service-data structures are skipped.
        return Ok(out);
    };

    out.push(0x03);
    out.push(AD_TYPE_INCOMPLETE_16BIT_SERVICE_UUIDS);
    out.extend_from_slice(&service_id);

    if let Some(service) = profile.offered_service
        && let Some(data) = snapshot.service_data_for(service)
    {
        let length = u8::try_from(2 + data.len())
            .map_err(|_| AdvError::PayloadTooLarge { len: data.len() })?;
        out.push(length);
        out.push(AD_TYPE_SERVICE_DATA_16BIT);
        out.extend_from_slice(&service_id);
        out.extend_from_slice(data);
    }

    Ok(out)
}

/// One decoded `[length][type][value]` triple.
#[derive(Debug, PartialEq, Eq)]
pub struct AdStructure<'a> {
    pub ad_type: u8,
    pub value: &'a [u8],
}

/// Walk an AD byte stream structure by structure. Used for operator
/// inspection of relayed payloads; fails if a length octet runs past
/// the end of the stream.
pub fn structures(payload: &[u8]) -> Result<Vec<AdStructure<'_>>, AdvError> {
    let mut parsed = Vec::new();
    let mut offset = 0;
    while offset < payload.len() {
        let length = payload[offset] as usize;
        if length == 0 || offset + 1 + length > payload.len() {
            return Err(AdvError::Truncated { offset });
        }
        parsed.push(AdStructure {
            ad_type: payload[offset + 1],
            value: &payload[offset + 2..offset + 1 + length],
        });
        offset += 1 + length;
    }
    Ok(parsed)
}

/// Lowercase hex rendering of a payload for diagnosis.
pub fn hex_string(payload: &[u8]) -> String {
    hex::encode(payload)
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use uuid::Uuid;

    use crate::profile::TrackerProfile;
    use crate::snapshot::AdvertisementSnapshot;

    use super::{
        AD_TYPE_INCOMPLETE_16BIT_SERVICE_UUIDS, AD_TYPE_SERVICE_DATA_16BIT, AdvError, encode,
        hex_string, structures,
    };

    fn snapshot(is_connectable: bool, service_data: HashMap<u16, Vec<u8>>) -> AdvertisementSnapshot {
        AdvertisementSnapshot::new(is_connectable, service_data, Some(Uuid::new_v4()))
    }

    #[test]
    fn connectable_snapshot_with_service_data() {
        let snapshot = snapshot(true, HashMap::from([(0x1234, vec![0xAA, 0xBB])]));
        let profile = TrackerProfile::new(Some(0x1234));
        let payload = encode(&snapshot, &profile).unwrap();
        assert_eq!(
            payload,
            vec![0x02, 0x01, 0x06, 0x03, 0x03, 0x34, 0x12, 0x04, 0x16, 0x34, 0x12, 0xAA, 0xBB]
        );
    }

    #[test]
    fn non_connectable_snapshot_omits_flags() {
        let snapshot = snapshot(false, HashMap::from([(0x1234, vec![0xAA, 0xBB])]));
        let profile = TrackerProfile::new(Some(0x1234));
        let payload = encode(&snapshot, &profile).unwrap();
        assert_eq!(
            payload,
            vec![0x03, 0x03, 0x34, 0x12, 0x04, 0x16, 0x34, 0x12, 0xAA, 0xBB]
        );
    }

    #[test]
    fn connectable_snapshot_starts_with_flags_structure() {
        let snapshot = snapshot(true, HashMap::new());
        let profile = TrackerProfile::new(Some(0xFD5A));
        let payload = encode(&snapshot, &profile).unwrap();
        assert_eq!(&payload[..3], &[0x02, 0x01, 0x06]);
    }

    #[test]
    fn no_flags_and_no_matching_service_data_emits_only_uuid_list() {
        let snapshot = snapshot(false, HashMap::from([(0x9999, vec![0x01])]));
        let profile = TrackerProfile::new(Some(0x1234));
        let payload = encode(&snapshot, &profile).unwrap();
        let parsed = structures(&payload).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].ad_type, AD_TYPE_INCOMPLETE_16BIT_SERVICE_UUIDS);
        assert_eq!(parsed[0].value, &[0x34, 0x12]);
    }

    #[test]
    fn no_offered_service_skips_uuid_list_entirely() {
        let snapshot = snapshot(false, HashMap::from([(0x1234, vec![0xAA])]));
        let profile = TrackerProfile::new(None);
        assert_eq!(encode(&snapshot, &profile).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn service_data_structure_length_and_type() {
        let data = vec![0xDE, 0xAD, 0xBE, 0xEF, 0x42];
        let snapshot = snapshot(false, HashMap::from([(0xFD5A, data.clone())]));
        let profile = TrackerProfile::new(Some(0xFD5A));
        let payload = encode(&snapshot, &profile).unwrap();
        let parsed = structures(&payload).unwrap();
        let service_data = parsed
            .iter()
            .find(|s| s.ad_type == AD_TYPE_SERVICE_DATA_16BIT)
            .unwrap();
        // length octet is value size + type octet; value is id + data
        assert_eq!(payload[4] as usize, 2 + data.len());
        assert_eq!(service_data.value, &[&[0x5A, 0xFD][..], &data[..]].concat());
    }

    #[test]
    fn walk_recovers_exactly_the_emitted_structures() {
        let snapshot = snapshot(true, HashMap::from([(0x1234, vec![0xAA, 0xBB, 0xCC])]));
        let profile = TrackerProfile::new(Some(0x1234));
        let payload = encode(&snapshot, &profile).unwrap();
        let parsed = structures(&payload).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].ad_type, 0x01);
        assert_eq!(parsed[0].value, &[0x06]);
        assert_eq!(parsed[1].ad_type, 0x03);
        assert_eq!(parsed[1].value, &[0x34, 0x12]);
        assert_eq!(parsed[2].ad_type, 0x16);
        assert_eq!(parsed[2].value, &[0x34, 0x12, 0xAA, 0xBB, 0xCC]);
        // no trailing or overlapping bytes
        let total: usize = parsed.iter().map(|s| 2 + s.value.len()).sum();
        assert_eq!(total, payload.len());
    }

    #[test]
    fn encoding_is_deterministic() {
        let snapshot = snapshot(true, HashMap::from([(0x1234, vec![0xAA, 0xBB])]));
        let profile = TrackerProfile::new(Some(0x1234));
        assert_eq!(
            encode(&snapshot, &profile).unwrap(),
            encode(&snapshot, &profile).unwrap()
        );
    }

    #[test]
    fn service_data_at_length_octet_capacity_still_encodes() {
        let data = vec![0x00; 253];
        let snapshot = snapshot(false, HashMap::from([(0x1234, data)]));
        let profile = TrackerProfile::new(Some(0x1234));
        let payload = encode(&snapshot, &profile).unwrap();
        assert_eq!(payload[4], 0xFF);
        assert!(structures(&payload).is_ok());
    }

    #[test]
    fn oversized_service_data_is_rejected_not_truncated() {
        let snapshot = snapshot(false, HashMap::from([(0x1234, vec![0x00; 254])]));
        let profile = TrackerProfile::new(Some(0x1234));
        assert_eq!(
            encode(&snapshot, &profile),
            Err(AdvError::PayloadTooLarge { len: 254 })
        );
    }

    #[test]
    fn hex_rendering_is_lowercase() {
        assert_eq!(hex_string(&[0x02, 0x01, 0x06, 0xAB]), "020106ab");
    }

    #[test]
    fn walk_rejects_truncated_stream() {
        assert_eq!(
            structures(&[0x05, 0x16, 0x34]),
            Err(AdvError::Truncated { offset: 0 })
        );
    }
}
