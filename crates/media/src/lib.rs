//! Media helpers: MIME resolution from filenames, bounded remote downloads.

pub mod fetch;
pub mod mime;

pub use fetch::Fetcher;
