//! Core business logic: rate tables, fetching, conversion state

pub mod config;
pub mod conversion;
pub mod fetcher;
pub mod log;
pub mod rates;
pub mod session;

// Re-export main types for cleaner imports
pub use conversion::{ConversionRequest, ConversionResult, ConversionState};
pub use fetcher::RateFetcher;
pub use rates::{FetchError, FetchResult, RateTable};
pub use session::ConversionSession;
