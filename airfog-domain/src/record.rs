use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Vec<u8>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// The payload exchanged with the relay backend: which tracker, where
/// it was seen, and the re-encoded advertisement bytes. Built fresh
/// per send and discarded once the exchange completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayRecord {
    pub device_id: Uuid,
    pub mac_address: Option<String>,
    pub location: Location,
    #[serde(with = "base64_bytes")]
    pub advertisement_data: Vec<u8>,
}
