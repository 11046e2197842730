//! Upload percentage on stderr, redrawn in place.

use gostlab_core::upload::UploadProgress;
use std::io::Write;

/// Redraws `uploading: NN%` on stderr each time the percentage changes.
pub(super) fn render(progress: UploadProgress) {
    if let Some(pct) = progress.percent() {
        let mut err = std::io::stderr().lock();
        let _ = write!(err, "\ruploading: {:>3}%", pct);
        if pct == 100 {
            let _ = writeln!(err, " (waiting for server)");
        }
        let _ = err.flush();
    }
}
