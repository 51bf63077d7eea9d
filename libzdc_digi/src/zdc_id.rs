use serde::{Deserialize, Serialize};

use super::constants::{EM_CHANNELS, HAD_CHANNELS, SECTION_STRIDE, SIDE_STRIDE};
use super::error::ChannelError;

/// The detector identifier exactly as it arrives with a digi. Nothing here is checked yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawZdcId {
    pub zside: i32,
    pub section: i32,
    pub channel: i32,
}

impl RawZdcId {
    pub fn new(zside: i32, section: i32, channel: i32) -> Self {
        Self {
            zside,
            section,
            channel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZdcSide {
    Negative,
    Positive,
}

impl TryFrom<i32> for ZdcSide {
    type Error = ChannelError;
    fn try_from(zside: i32) -> Result<Self, Self::Error> {
        match zside {
            -1 => Ok(Self::Negative),
            1 => Ok(Self::Positive),
            _ => Err(ChannelError::BadSide(zside)),
        }
    }
}

/// Only the EM and HAD sections are read out into the tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZdcSection {
    EM,
    HAD,
}

impl ZdcSection {
    /// Number of channels in this section
    pub fn n_channels(&self) -> u8 {
        match self {
            Self::EM => EM_CHANNELS,
            Self::HAD => HAD_CHANNELS,
        }
    }

    fn number(&self) -> usize {
        match self {
            Self::EM => 1,
            Self::HAD => 2,
        }
    }
}

impl TryFrom<i32> for ZdcSection {
    type Error = ChannelError;
    fn try_from(section: i32) -> Result<Self, Self::Error> {
        match section {
            1 => Ok(Self::EM),
            2 => Ok(Self::HAD),
            _ => Err(ChannelError::BadSection(section)),
        }
    }
}

/// A validated ZDC channel address.
///
/// Can only be built through `TryFrom<RawZdcId>`, so every ZdcId maps to a flat index in
/// `[0, NUMBER_OF_CHANNELS)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZdcId {
    side: ZdcSide,
    section: ZdcSection,
    channel: u8,
}

impl ZdcId {
    pub fn side(&self) -> ZdcSide {
        self.side
    }

    pub fn section(&self) -> ZdcSection {
        self.section
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Flat channel index, `(section-1)*5 + positive*9 + (channel-1)`
    pub fn flat_index(&self) -> usize {
        let side_offset = match self.side {
            ZdcSide::Negative => 0,
            ZdcSide::Positive => SIDE_STRIDE,
        };
        (self.section.number() - 1) * SECTION_STRIDE + side_offset + (self.channel as usize - 1)
    }
}

impl TryFrom<RawZdcId> for ZdcId {
    type Error = ChannelError;
    fn try_from(raw: RawZdcId) -> Result<Self, Self::Error> {
        let side = ZdcSide::try_from(raw.zside)?;
        let section = ZdcSection::try_from(raw.section)?;
        let max = section.n_channels();
        if raw.channel < 1 || raw.channel > max as i32 {
            return Err(ChannelError::BadChannel {
                section: raw.section,
                channel: raw.channel,
                max,
            });
        }
        Ok(Self {
            side,
            section,
            channel: raw.channel as u8,
        })
    }
}
