//! riskglobe library
//!
//! Weather risk core (normalization, scoring, live/simulated source
//! selection, reconciliation) plus the terminal dashboard built on it.

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod fetcher;
pub mod logging;
pub mod reconcile;
pub mod service;
pub mod ui;
