//! jx402 - cross-border payments dashboard with a simulated remittance flow
//!
//! The binary drives the dashboard; the library exposes the flow engine,
//! remit client and config for embedding and integration tests.

pub mod api;
pub mod app;
pub mod config;
pub mod flow;
pub mod logging;
pub mod metrics;
pub mod rewards;
pub mod transactions;
pub mod ui;
