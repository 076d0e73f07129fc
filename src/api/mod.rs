//! Submission API: wire types and the HTTP transport

mod client;
mod response;
mod traits;

pub use client::HttpTransport;
pub use response::SubmitResult;
pub use traits::SubmitTransport;

#[cfg(test)]
pub use traits::MockSubmitTransport;
