//! Reusable widgets

pub mod sparkline;
