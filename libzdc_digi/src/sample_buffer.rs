use bitvec::prelude::*;
use ndarray::{Array2, ArrayView1};

use super::constants::{NUMBER_OF_CHANNELS, SAMPLES_PER_CHANNEL};
use super::digi::ZdcSample;

type ChannelMask = BitArr!(for NUMBER_OF_CHANNELS, in u32);

/// The dense per-event buffer: one row per flat channel index, one column per time sample.
///
/// Both matrices are in standard (row major) layout, so the flat offset of
/// `[[channel, sample]]` is `channel * SAMPLES_PER_CHANNEL + sample`.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    fc: Array2<f32>,
    adc: Array2<i32>,
    filled: ChannelMask,
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self {
            fc: Array2::zeros([NUMBER_OF_CHANNELS, SAMPLES_PER_CHANNEL]),
            adc: Array2::zeros([NUMBER_OF_CHANNELS, SAMPLES_PER_CHANNEL]),
            filled: BitArray::ZERO,
        }
    }

    /// Zero every slot of every channel
    pub fn reset(&mut self) {
        self.fc.fill(0.0);
        self.adc.fill(0);
        self.filled.fill(false);
    }

    /// Write the samples of a channel, keeping at most `SAMPLES_PER_CHANNEL` of them.
    ///
    /// Returns true if the channel had already been written this event. The earlier values of
    /// that channel are discarded entirely, so the row holds only the last digi written.
    pub fn fill_channel(&mut self, channel: usize, samples: &[ZdcSample]) -> bool {
        let overwritten = self.filled.replace(channel, true);
        if overwritten {
            self.fc.row_mut(channel).fill(0.0);
            self.adc.row_mut(channel).fill(0);
        }
        for (slot, sample) in samples.iter().take(SAMPLES_PER_CHANNEL).enumerate() {
            self.fc[[channel, slot]] = sample.nominal_fc;
            self.adc[[channel, slot]] = sample.adc;
        }
        overwritten
    }

    pub fn channel_fc(&self, channel: usize) -> ArrayView1<'_, f32> {
        self.fc.row(channel)
    }

    pub fn channel_adc(&self, channel: usize) -> ArrayView1<'_, i32> {
        self.adc.row(channel)
    }

    /// Charge at a flat offset `channel * SAMPLES_PER_CHANNEL + sample`
    pub fn fc_at(&self, offset: usize) -> f32 {
        self.fc[[offset / SAMPLES_PER_CHANNEL, offset % SAMPLES_PER_CHANNEL]]
    }

    /// ADC at a flat offset `channel * SAMPLES_PER_CHANNEL + sample`
    pub fn adc_at(&self, offset: usize) -> i32 {
        self.adc[[offset / SAMPLES_PER_CHANNEL, offset % SAMPLES_PER_CHANNEL]]
    }

    pub fn is_filled(&self, channel: usize) -> bool {
        self.filled[channel]
    }

    pub fn n_filled(&self) -> usize {
        self.filled.count_ones()
    }
}
