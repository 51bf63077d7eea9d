use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::digi::ZdcDigi;
use super::error::ResolveError;

/// The identifying information of a single event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventHeader {
    pub event: u64,
    pub run: u32,
    pub lumi_block: u32,
    pub bunch_crossing: i32,
    /// Raw event time; the upper 32 bits are seconds since the unix epoch
    #[serde(default)]
    pub time: Option<u64>,
}

impl EventHeader {
    /// Seconds since the unix epoch, if the event carried a time
    pub fn unix_seconds(&self) -> Option<i64> {
        self.time.map(|t| (t >> 32) as i64)
    }
}

/// An event as delivered by the input, holding any number of named digi collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    #[serde(flatten)]
    pub header: EventHeader,
    #[serde(default)]
    pub collections: FxHashMap<String, Vec<ZdcDigi>>,
}

impl InputEvent {
    pub fn new(header: EventHeader) -> Self {
        Self {
            header,
            collections: FxHashMap::default(),
        }
    }

    /// Resolve the digi collection with the given tag
    pub fn collection(&self, tag: &str) -> Result<&[ZdcDigi], ResolveError> {
        self.collections
            .get(tag)
            .map(|digis| digis.as_slice())
            .ok_or_else(|| ResolveError::MissingCollection(self.header.event, tag.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zdc_id::RawZdcId;

    #[test]
    fn test_collection_lookup() {
        let mut event = InputEvent::new(EventHeader {
            event: 7,
            ..Default::default()
        });
        event.collections.insert(
            String::from("castorDigis"),
            vec![ZdcDigi::new(RawZdcId::new(1, 1, 1), vec![])],
        );
        assert_eq!(event.collection("castorDigis").unwrap().len(), 1);
        match event.collection("hcalDigis") {
            Err(ResolveError::MissingCollection(id, tag)) => {
                assert_eq!(id, 7);
                assert_eq!(tag, "hcalDigis");
            }
            Ok(_) => panic!(),
        }
    }

    #[test]
    fn test_unix_seconds() {
        let header = EventHeader {
            time: Some((1_700_000_000u64 << 32) | 12345),
            ..Default::default()
        };
        assert_eq!(header.unix_seconds(), Some(1_700_000_000));
        assert_eq!(EventHeader::default().unix_seconds(), None);
    }
}
