/// Progress report sent from the processing thread to whoever is watching it
#[derive(Debug, Clone, Default)]
pub struct WorkerStatus {
    pub events_processed: u64,
    pub bytes_read: u64,
    pub total_bytes: u64,
    pub finished: bool,
}

impl WorkerStatus {
    pub fn new(events_processed: u64, bytes_read: u64, total_bytes: u64, finished: bool) -> Self {
        Self {
            events_processed,
            bytes_read,
            total_bytes,
            finished,
        }
    }

    /// Fraction of the input consumed, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.finished || self.total_bytes == 0 {
            return 1.0;
        }
        (self.bytes_read as f64 / self.total_bytes as f64).min(1.0) as f32
    }
}
