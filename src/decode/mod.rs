//! Response decoder module
//!
//! Turns a JSON response body into a `Page`: an array becomes a page of
//! its elements, a single object becomes a one-record page.

mod decoders;
mod types;

pub use decoders::{into_page, JsonDecoder};
pub use types::{Page, RecordDecoder};

#[cfg(test)]
mod tests;
