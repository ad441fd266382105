//! Observable conversion session.
//!
//! A [`ConversionSession`] owns the [`ConversionState`] behind a
//! `tokio::sync::watch` channel. Fetches run as spawned tasks and apply their
//! result through the channel, so every mutation happens in one place and
//! subscribers always see a whole snapshot. Overlapping fetches are allowed;
//! whichever completes last wins.

use super::conversion::{ConversionRequest, ConversionResult, ConversionState};
use super::fetcher::RateFetcher;
use super::rates::FetchResult;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct ConversionSession {
    fetcher: Arc<dyn RateFetcher>,
    state: Arc<watch::Sender<ConversionState>>,
}

impl ConversionSession {
    pub fn new(fetcher: Arc<dyn RateFetcher>) -> Self {
        let (state, _) = watch::channel(ConversionState::new());
        ConversionSession {
            fetcher,
            state: Arc::new(state),
        }
    }

    /// Starts a fetch in the background and returns immediately. Awaiting the
    /// handle waits for the result to be applied; aborting it drops the
    /// in-flight request without touching the state.
    pub fn fetch_rates(&self) -> JoinHandle<()> {
        let session = self.clone();
        tokio::spawn(async move { session.refresh().await })
    }

    /// Fetches and applies the result on the current task.
    #[instrument(name = "RefreshRates", skip(self))]
    pub async fn refresh(&self) {
        let result = FetchResult::from(self.fetcher.fetch().await);
        self.apply_fetch_result(result);
    }

    pub fn apply_fetch_result(&self, result: FetchResult) {
        self.state.send_modify(|state| state.apply_fetch_result(result));
        debug!(revision = self.state.borrow().revision, "Applied fetch result");
    }

    /// Receiver notified every time a fetch result is applied.
    pub fn subscribe(&self) -> watch::Receiver<ConversionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ConversionState {
        self.state.borrow().clone()
    }

    pub fn convert(&self, request: &ConversionRequest) -> Option<ConversionResult> {
        self.state.borrow().convert(request)
    }

    pub fn convert_formatted(
        &self,
        source: &str,
        destination: &str,
        amount: &str,
    ) -> Option<String> {
        self.state
            .borrow()
            .convert_formatted(source, destination, amount)
    }
}
