use super::channel_map::channel_index;
use super::constants::SAMPLES_PER_CHANNEL;
use super::digi::ZdcDigi;
use super::error::SinkError;
use super::event::EventHeader;
use super::run_context::RunContext;
use super::sample_buffer::SampleBuffer;
use super::sink::{BeamRow, TabularSink};

/// Data quality counters for the digis of one event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillStats {
    /// Digis written to the buffer (including ones that overwrote an earlier digi)
    pub written: usize,
    /// Digis whose id is not one of the readout channels
    pub skipped: usize,
    /// Digis for a channel that already had a digi this event
    pub overwritten: usize,
    /// Digis with more samples than the buffer holds
    pub truncated: usize,
}

/// What was appended to the sink for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    /// No digi collection; only the beam row was written
    BeamOnly,
    /// Beam row and sample row were written
    BeamAndSamples(FillStats),
}

/// RecordBuilder turns the sparse digi collection of an event into the dense sample row.
///
/// The builder owns the buffer that is reused from event to event. Run bookkeeping is held
/// in a [`RunContext`] owned by the caller, so the builder itself carries nothing across
/// events that could change its output.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    buffer: SampleBuffer,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one event.
    ///
    /// A beam row is always appended. If `digis` is Some (the collection was resolved), the
    /// buffer is rebuilt from the digis and a sample row is appended as well; an empty
    /// collection still produces an all zero sample row. Digis with an invalid id are skipped.
    /// If two digis share a channel, the later one wins.
    pub fn on_event<S: TabularSink>(
        &mut self,
        ctx: &mut RunContext,
        header: &EventHeader,
        digis: Option<&[ZdcDigi]>,
        sink: &mut S,
    ) -> Result<EmitOutcome, SinkError> {
        ctx.observe(header);
        sink.append_beam(&BeamRow::from(header))?;

        let digis = match digis {
            Some(d) => d,
            None => return Ok(EmitOutcome::BeamOnly),
        };

        let stats = self.fill(header, digis);
        sink.append_samples(&self.buffer)?;
        Ok(EmitOutcome::BeamAndSamples(stats))
    }

    /// The buffer as it was last written
    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    fn fill(&mut self, header: &EventHeader, digis: &[ZdcDigi]) -> FillStats {
        let mut stats = FillStats::default();
        self.buffer.reset();
        for digi in digis {
            let channel = match channel_index(digi.id) {
                Ok(channel) => channel,
                Err(e) => {
                    log::warn!("Skipping digi in event {}: {e}", header.event);
                    stats.skipped += 1;
                    continue;
                }
            };
            if digi.size() > SAMPLES_PER_CHANNEL {
                log::debug!(
                    "Digi for channel {channel} in event {} has {} samples; keeping {SAMPLES_PER_CHANNEL}",
                    header.event,
                    digi.size()
                );
                stats.truncated += 1;
            }
            if self.buffer.fill_channel(channel, &digi.samples) {
                log::warn!(
                    "Event {} has more than one digi for channel {channel}; keeping the last one",
                    header.event
                );
                stats.overwritten += 1;
            }
            stats.written += 1;
        }
        stats
    }
}
