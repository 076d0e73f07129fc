//! Sign-up form component
//!
//! A form of validated fields bound to page elements, submitted as JSON to a
//! backend that may answer success, error or "try again later". The crate
//! also carries the terminal front end and the mock backend used to drive it.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod page;
pub mod platform;
pub mod server;
pub mod state;
pub mod ui;
