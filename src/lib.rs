//! Rotating stock and weather widgets for a five-panel desk display.
//!
//! Everything except the device shell (`wifi`, `time_sync`, `panel` and the
//! ESP HTTP client) builds on the host so the widget logic can be tested
//! with `cargo test`.

pub mod button;
pub mod clock;
pub mod conditions;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod framebuffer;
pub mod http_client;
pub mod json;
pub mod layout;
pub mod model;
pub mod stock;
pub mod supervisor;
pub mod views;
pub mod weather;
pub mod widgets;

#[cfg(feature = "espidf")]
pub mod panel;
#[cfg(feature = "espidf")]
pub mod time_sync;
#[cfg(feature = "espidf")]
pub mod wifi;

#[cfg(test)]
pub(crate) mod testing;
