//! Upload progress (bytes sent of total) as a whole percentage.

/// Snapshot of upload progress reported by libcurl.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UploadProgress {
    /// Bytes sent so far.
    pub loaded: u64,
    /// Total bytes to send (0 while unknown).
    pub total: u64,
}

impl UploadProgress {
    /// Percentage in [0, 100], rounded; None while the total is unknown.
    pub fn percent(&self) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        let pct = (self.loaded as f64 / self.total as f64 * 100.0).round();
        Some(pct.clamp(0.0, 100.0) as u8)
    }
}

/// Filters the stream of libcurl progress callbacks down to percentage changes.
#[derive(Debug, Default)]
pub(crate) struct ProgressTracker {
    last: Option<u8>,
}

impl ProgressTracker {
    /// Returns the progress if its percentage differs from the last one reported.
    pub(crate) fn update(&mut self, loaded: f64, total: f64) -> Option<UploadProgress> {
        let progress = UploadProgress {
            loaded: loaded.max(0.0) as u64,
            total: total.max(0.0) as u64,
        };
        let pct = progress.percent()?;
        if self.last == Some(pct) {
            return None;
        }
        self.last = Some(pct);
        Some(progress)
    }
}
