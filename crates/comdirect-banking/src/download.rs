use std::{path::PathBuf, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::BankingError;

/// Rate limit for bulk document downloads: pause for `pause` after every `batch_size` documents
/// while more remain. A `batch_size` of zero disables pausing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadThrottle {
    #[allow(missing_docs)]
    pub batch_size: usize,
    #[allow(missing_docs)]
    pub pause: Duration,
}

impl Default for DownloadThrottle {
    fn default() -> Self {
        Self {
            batch_size: 10,
            pause: Duration::from_secs(1),
        }
    }
}

impl DownloadThrottle {
    pub(crate) fn pause_after(&self, downloaded: usize, remaining: usize) -> bool {
        self.batch_size > 0 && remaining > 0 && downloaded % self.batch_size == 0
    }

    pub(crate) async fn pause(&self, cancel: &CancellationToken) -> Result<(), BankingError> {
        info!("pausing {}ms between download batches", self.pause.as_millis());
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(comdirect_core::ApiError::Cancelled.into()),
            _ = tokio::time::sleep(self.pause) => Ok(()),
        }
    }
}

/// Outcome of [`DocumentsClient::download_all`](crate::DocumentsClient::download_all).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Paths of the written files, in download order.
    pub files: Vec<PathBuf>,
    /// How often the throttle paused.
    pub pauses: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pauses_for(total: usize, throttle: DownloadThrottle) -> usize {
        (1..=total)
            .filter(|&downloaded| throttle.pause_after(downloaded, total - downloaded))
            .count()
    }

    #[test]
    fn pauses_between_batches_only() {
        let throttle = DownloadThrottle::default();

        assert_eq!(pauses_for(25, throttle), 2);
        assert_eq!(pauses_for(30, throttle), 2);
        assert_eq!(pauses_for(10, throttle), 0);
        assert_eq!(pauses_for(9, throttle), 0);
    }

    #[test]
    fn zero_batch_size_never_pauses() {
        let throttle = DownloadThrottle {
            batch_size: 0,
            pause: Duration::from_secs(1),
        };

        assert_eq!(pauses_for(25, throttle), 0);
    }
}
