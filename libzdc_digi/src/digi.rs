use serde::{Deserialize, Serialize};

use super::zdc_id::RawZdcId;

/// One time sample of a ZDC channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZdcSample {
    pub adc: i32,
    pub nominal_fc: f32,
}

impl ZdcSample {
    pub fn new(adc: i32, nominal_fc: f32) -> Self {
        Self { adc, nominal_fc }
    }
}

/// A digitized ZDC channel: the detector id plus however many time samples the readout
/// delivered. The length is not fixed; only the first `SAMPLES_PER_CHANNEL` are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZdcDigi {
    pub id: RawZdcId,
    #[serde(default)]
    pub samples: Vec<ZdcSample>,
}

impl ZdcDigi {
    pub fn new(id: RawZdcId, samples: Vec<ZdcSample>) -> Self {
        Self { id, samples }
    }

    pub fn size(&self) -> usize {
        self.samples.len()
    }
}
