//! TraduPay Engine: Brazilian CLT vs PJ net income comparison
//!
//! This crate computes monthly take-home pay under the salaried (CLT) and
//! independent contractor (PJ, Simples Nacional) regimes from versioned
//! INSS, IRRF and Simples tables, and compares the two on a take-home or
//! benefit-adjusted basis.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
