use std::sync::mpsc::Sender;

use super::config::Config;
use super::error::ProcessorError;
use super::event::InputEvent;
use super::event_source::EventSource;
use super::hdf_writer::HDFWriter;
use super::record_builder::{EmitOutcome, RecordBuilder};
use super::run_context::{RunContext, RunSummary};
use super::sink::TabularSink;
use super::worker_status::WorkerStatus;

// Send a progress update every this many events
const STATUS_INTERVAL: u64 = 1_000;

/// Totals over a whole job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobStats {
    pub events_without_digis: u64,
    pub digis_written: u64,
    pub digis_skipped: u64,
    pub channels_overwritten: u64,
    pub digis_truncated: u64,
}

impl JobStats {
    fn record(&mut self, outcome: &EmitOutcome) {
        match outcome {
            EmitOutcome::BeamOnly => self.events_without_digis += 1,
            EmitOutcome::BeamAndSamples(stats) => {
                self.digis_written += stats.written as u64;
                self.digis_skipped += stats.skipped as u64;
                self.channels_overwritten += stats.overwritten as u64;
                self.digis_truncated += stats.truncated as u64;
            }
        }
    }
}

/// Everything one job needs between events.
///
/// Owns the run bookkeeping and the record builder; the sink is passed in so that the same
/// loop drives the HDF5 file and the in-memory tables alike.
#[derive(Debug, Default)]
pub struct Job {
    digi_tag: String,
    ctx: RunContext,
    builder: RecordBuilder,
    stats: JobStats,
}

impl Job {
    pub fn new(digi_tag: &str) -> Self {
        Self {
            digi_tag: digi_tag.to_string(),
            ..Default::default()
        }
    }

    /// Resolve the digi collection of the event and hand the event to the builder.
    ///
    /// A missing collection is not an error; the event just gets no sample row.
    pub fn process_event<S: TabularSink>(
        &mut self,
        event: &InputEvent,
        sink: &mut S,
    ) -> Result<EmitOutcome, ProcessorError> {
        let digis = match event.collection(&self.digi_tag) {
            Ok(digis) => Some(digis),
            Err(e) => {
                log::warn!("Cannot get ZDC digis: {e}");
                None
            }
        };
        let outcome = self
            .builder
            .on_event(&mut self.ctx, &event.header, digis, sink)?;
        self.stats.record(&outcome);
        Ok(outcome)
    }

    pub fn n_events(&self) -> u64 {
        self.ctx.n_events()
    }

    pub fn stats(&self) -> &JobStats {
        &self.stats
    }

    /// End the job
    pub fn finish(self) -> (RunSummary, JobStats) {
        (self.ctx.finish(), self.stats)
    }
}

fn log_summary(summary: &RunSummary, stats: &JobStats) {
    match &summary.run {
        Some(info) => log::info!(
            "Run {} started {}: {} events in lumi blocks {} to {}",
            info.run_begin,
            info.start_time_string(),
            summary.n_events,
            info.lumi_min,
            info.lumi_max
        ),
        None => log::info!("No events were processed"),
    }
    if stats.events_without_digis > 0 {
        log::warn!(
            "{} events had no digi collection and only have a beam row",
            stats.events_without_digis
        );
    }
    if stats.digis_skipped > 0 || stats.channels_overwritten > 0 {
        log::warn!(
            "Data quality: {} digis skipped for invalid ids, {} channels overwritten by a later digi",
            stats.digis_skipped,
            stats.channels_overwritten
        );
    }
    log::info!(
        "{} digis written ({} truncated to the buffer length)",
        stats.digis_written,
        stats.digis_truncated
    );
}

/// The main loop of zdc_digi.
///
/// Reads every event of the input file in order, writes the tables to the output file and
/// reports progress over `tx`. Returns the run bookkeeping of the job.
pub fn process(config: &Config, tx: &Sender<WorkerStatus>) -> Result<RunSummary, ProcessorError> {
    let output_path = config.get_output_file()?;
    let mut source = EventSource::new(&config.input_path)?;
    log::info!(
        "Reading events from {} ({})",
        source.get_path().to_string_lossy(),
        human_bytes::human_bytes(source.get_total_bytes() as f64)
    );
    log::info!("Using digi collection {:?}", config.digi_tag);

    let mut writer = HDFWriter::new(&output_path)?;
    let mut job = Job::new(&config.digi_tag);
    let total_bytes = source.get_total_bytes();

    tx.send(WorkerStatus::new(0, 0, total_bytes, false))?;
    while let Some(event) = source.next_event()? {
        job.process_event(&event, &mut writer)?;
        if job.n_events() % STATUS_INTERVAL == 0 {
            tx.send(WorkerStatus::new(
                job.n_events(),
                source.get_bytes_read(),
                total_bytes,
                false,
            ))?;
        }
    }

    let (summary, stats) = job.finish();
    let path = writer.close(&summary)?;
    log_summary(&summary, &stats);
    if let Ok(meta) = path.metadata() {
        log::info!(
            "Output file size: {}",
            human_bytes::human_bytes(meta.len() as f64)
        );
    }
    tx.send(WorkerStatus::new(
        summary.n_events,
        source.get_bytes_read(),
        total_bytes,
        true,
    ))?;
    Ok(summary)
}
