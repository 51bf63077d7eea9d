use time::format_description::well_known::Rfc2822;
use time::OffsetDateTime;

use super::constants::NO_START_TIME;
use super::event::EventHeader;

/// What is latched from the first event of a job, plus the lumi block range seen since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunInfo {
    pub run_begin: u32,
    pub start_time: Option<OffsetDateTime>,
    pub lumi_min: u32,
    pub lumi_max: u32,
}

impl RunInfo {
    fn from_first_event(header: &EventHeader) -> Self {
        let start_time = match header.unix_seconds() {
            Some(seconds) => match OffsetDateTime::from_unix_timestamp(seconds) {
                Ok(t) => Some(t),
                Err(e) => {
                    log::warn!("Event {} has an unusable time stamp: {e}", header.event);
                    None
                }
            },
            None => {
                log::warn!("Event {} has no time stamp; start time is not available", header.event);
                None
            }
        };
        Self {
            run_begin: header.run,
            start_time,
            lumi_min: header.lumi_block,
            lumi_max: header.lumi_block,
        }
    }

    /// Extend the lumi block range to include `lumi`. The range never shrinks.
    fn extend_lumi(&mut self, lumi: u32) {
        self.lumi_min = self.lumi_min.min(lumi);
        self.lumi_max = self.lumi_max.max(lumi);
    }

    pub fn start_time_string(&self) -> String {
        self.start_time
            .and_then(|t| t.format(&Rfc2822).ok())
            .unwrap_or_else(|| String::from(NO_START_TIME))
    }
}

/// Run bookkeeping for one job.
///
/// Owned by whoever drives the job and handed to the RecordBuilder for every event. It starts
/// out uninitialized; the first observed event initializes it, and it then stays initialized
/// until the job consumes it with [`RunContext::finish`].
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    info: Option<RunInfo>,
    n_events: u64,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for an event. Returns true if this was the first event of the job.
    pub fn observe(&mut self, header: &EventHeader) -> bool {
        self.n_events += 1;
        match &mut self.info {
            Some(info) => {
                info.extend_lumi(header.lumi_block);
                false
            }
            None => {
                let info = RunInfo::from_first_event(header);
                log::info!(
                    "First event of run {} (lumi block {}) started at {}",
                    info.run_begin,
                    header.lumi_block,
                    info.start_time_string()
                );
                self.info = Some(info);
                true
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.info.is_some()
    }

    pub fn info(&self) -> Option<&RunInfo> {
        self.info.as_ref()
    }

    pub fn n_events(&self) -> u64 {
        self.n_events
    }

    /// End the job's bookkeeping
    pub fn finish(self) -> RunSummary {
        RunSummary {
            n_events: self.n_events,
            run: self.info,
        }
    }
}

/// Final state of a job's run bookkeeping. `run` is None if no event was ever seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub n_events: u64,
    pub run: Option<RunInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(run: u32, lumi_block: u32) -> EventHeader {
        EventHeader {
            event: 1,
            run,
            lumi_block,
            bunch_crossing: 0,
            time: Some(1_600_000_000u64 << 32),
        }
    }

    #[test]
    fn test_first_event_latches_once() {
        let mut ctx = RunContext::new();
        assert!(!ctx.is_initialized());
        assert!(ctx.observe(&header(100, 5)));
        assert!(!ctx.observe(&header(101, 7)));
        assert!(!ctx.observe(&header(102, 2)));
        let info = ctx.info().unwrap();
        assert_eq!(info.run_begin, 100);
        assert_eq!(
            info.start_time,
            Some(OffsetDateTime::from_unix_timestamp(1_600_000_000).unwrap())
        );
        assert_eq!(ctx.n_events(), 3);
    }

    #[test]
    fn test_lumi_range_is_monotonic() {
        let mut ctx = RunContext::new();
        let mut last = (u32::MAX, 0);
        for lumi in [5, 3, 9, 4, 9, 1, 6] {
            ctx.observe(&header(1, lumi));
            let info = ctx.info().unwrap();
            assert!(info.lumi_min <= last.0);
            assert!(info.lumi_max >= last.1);
            last = (info.lumi_min, info.lumi_max);
        }
        assert_eq!(last, (1, 9));
    }

    #[test]
    fn test_finish() {
        let ctx = RunContext::new();
        assert_eq!(
            ctx.finish(),
            RunSummary {
                n_events: 0,
                run: None
            }
        );

        let mut ctx = RunContext::new();
        ctx.observe(&header(42, 8));
        let summary = ctx.finish();
        assert_eq!(summary.n_events, 1);
        assert_eq!(summary.run.unwrap().lumi_min, 8);
        assert_eq!(summary.run.unwrap().lumi_max, 8);
    }

    #[test]
    fn test_start_time_string() {
        let mut info = RunInfo::from_first_event(&header(1, 1));
        assert_eq!(info.start_time_string(), "Sun, 13 Sep 2020 12:26:40 +0000");
        info.start_time = None;
        assert_eq!(info.start_time_string(), NO_START_TIME);
    }

    #[test]
    fn test_first_event_without_time() {
        let mut ctx = RunContext::new();
        ctx.observe(&EventHeader {
            time: None,
            ..header(3, 2)
        });
        // A later event with a time must not fill it in
        ctx.observe(&header(3, 4));
        let info = ctx.info().unwrap();
        assert_eq!(info.start_time, None);
        assert_eq!(info.start_time_string(), "NotAvailable");
    }
}
