//! Outbound calls to the remote sorting service.

mod client;
mod error;

pub(crate) use client::SortClient;
pub(crate) use error::FetchError;
