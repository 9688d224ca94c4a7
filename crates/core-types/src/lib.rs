pub mod error;
pub mod quote;
pub mod slack;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use quote::{NewQuote, Quote, QuoteList, QuotePayload, QuoteUpdate};
pub use slack::SlackQuoteResponse;
