//! Request-level entry point for the TraduPay engine.
//!
//! This module provides [`CompensationEngine`], which owns the loaded
//! configuration and turns a [`ComparisonRequest`] into a
//! [`ComparisonReport`](crate::models::ComparisonReport).

mod engine;
mod request;

pub use engine::CompensationEngine;
pub use request::{ComparisonRequest, ProfessionalProfile};
