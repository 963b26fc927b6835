//! Configuration loading and management for the TraduPay engine.
//!
//! This module loads versioned reference data from YAML files: INSS, IRRF
//! and Simples Nacional tables, the Fator R parameters, comparison settings
//! and the market salary reference table. Every table is validated at load
//! time; a malformed table stops the engine from starting.
//!
//! # Example
//!
//! ```no_run
//! use tradupay_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/brazil").unwrap();
//! println!("Loaded bundle: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ComparisonSettings, ContractorRules, EngineConfig, EngineMetadata, MarketRate, MarketRates,
    MarketRatesConfig, SalariedRules, TableSet, TableSetConfig, TablesConfig, TaxTableConfig,
};
