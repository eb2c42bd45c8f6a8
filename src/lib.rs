//! salary-tax - salary slip tax calculator
//!
//! This library turns salary slip figures into a financial profile, computes
//! income tax under the old and new Indian regimes, and wraps a generative-AI
//! advisor for field extraction and follow-up advice.

pub mod advisor;
pub mod config;
pub mod db;
pub mod error;
pub mod intake;
pub mod profile;
pub mod tax;
pub mod utils;
