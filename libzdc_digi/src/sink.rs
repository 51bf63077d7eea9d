use ndarray::Array2;

use super::constants::{NUMBER_OF_CHANNELS, SAMPLES_PER_CHANNEL};
use super::error::SinkError;
use super::event::EventHeader;
use super::sample_buffer::SampleBuffer;

/// One row of the beam (event metadata) table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeamRow {
    pub bunch_crossing: i32,
    pub lumi_block: u32,
    pub run: u32,
    pub event: u64,
}

impl From<&EventHeader> for BeamRow {
    fn from(header: &EventHeader) -> Self {
        Self {
            bunch_crossing: header.bunch_crossing,
            lumi_block: header.lumi_block,
            run: header.run,
            event: header.event,
        }
    }
}

/// An append-only store of the two output tables.
///
/// Rows are appended one at a time as events are processed and must be visible to readers in
/// that order; there is no way to change or remove a row once appended. An error from either
/// method is fatal to the job.
pub trait TabularSink {
    fn append_beam(&mut self, row: &BeamRow) -> Result<(), SinkError>;
    fn append_samples(&mut self, buffer: &SampleBuffer) -> Result<(), SinkError>;
}

/// A sample table row copied out of the buffer
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub fc: Array2<f32>,
    pub adc: Array2<i32>,
}

impl From<&SampleBuffer> for SampleRow {
    fn from(buffer: &SampleBuffer) -> Self {
        let mut row = Self {
            fc: Array2::zeros([NUMBER_OF_CHANNELS, SAMPLES_PER_CHANNEL]),
            adc: Array2::zeros([NUMBER_OF_CHANNELS, SAMPLES_PER_CHANNEL]),
        };
        for channel in 0..NUMBER_OF_CHANNELS {
            row.fc.row_mut(channel).assign(&buffer.channel_fc(channel));
            row.adc.row_mut(channel).assign(&buffer.channel_adc(channel));
        }
        row
    }
}

/// Keeps both tables in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    beam: Vec<BeamRow>,
    samples: Vec<SampleRow>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn beam_rows(&self) -> &[BeamRow] {
        &self.beam
    }

    pub fn sample_rows(&self) -> &[SampleRow] {
        &self.samples
    }
}

impl TabularSink for MemorySink {
    fn append_beam(&mut self, row: &BeamRow) -> Result<(), SinkError> {
        self.beam.push(*row);
        Ok(())
    }

    fn append_samples(&mut self, buffer: &SampleBuffer) -> Result<(), SinkError> {
        self.samples.push(SampleRow::from(buffer));
        Ok(())
    }
}
