// The ZDC has two sides, each with 5 EM and 4 HAD channels. Every readout channel gets a
// dense index so that the per-event buffers can be addressed directly:
// [side, section, channel] -> index in [0, 18)
// with the 9 negative side channels first, then the 9 positive side channels.
// Anything that is not one of those 18 channels (other sections, bad sides) is rejected
// before it can touch a buffer.
use super::constants::CHANNEL_NAMES;
use super::error::ChannelError;
use super::zdc_id::{RawZdcId, ZdcId};

/// Map a raw detector id to its flat channel index.
///
/// Returns an error if the id is outside of the 18 readout channels.
pub fn channel_index(raw: RawZdcId) -> Result<usize, ChannelError> {
    Ok(ZdcId::try_from(raw)?.flat_index())
}

/// The column prefix for a flat channel index, i.e. `posHD3` for 16
pub fn channel_name(index: usize) -> Option<&'static str> {
    CHANNEL_NAMES.get(index).copied()
}
