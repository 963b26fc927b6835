//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading reference
//! tables and engine settings from YAML files.

use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::Seniority;

use super::types::{
    ComparisonSettings, EngineConfig, EngineMetadata, MarketRate, MarketRates, MarketRatesConfig,
    TableSet, TableSetConfig,
};

/// Loads and provides access to the engine configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory,
/// validates every tax table, and provides methods to select the table set
/// in force on a date and to query the market reference table.
///
/// # Directory Structure
///
/// ```text
/// config/brazil/
/// ├── engine.yaml          # Bundle metadata
/// ├── comparison.yaml      # Tie epsilon, switch threshold, FGTS rate
/// ├── market_rates.yaml    # Optional market reference table
/// └── tables/
///     ├── 2024-02-01.yaml  # Tables effective from this date
///     └── 2025-05-01.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use tradupay_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/brazil").unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
/// let tables = loader.table_set(date).unwrap();
/// println!("INSS brackets: {}", tables.inss().brackets().len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/brazil")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any tax table fails partition validation (`MalformedTable`)
    /// - Two table sets share an effective date
    ///
    /// A missing `market_rates.yaml` is not an error: market benchmarks are
    /// simply unavailable.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<EngineMetadata>(&path.join("engine.yaml"))?;

        let comparison_path = path.join("comparison.yaml");
        let comparison = Self::load_yaml::<ComparisonSettings>(&comparison_path)?;
        comparison
            .validate()
            .map_err(|message| EngineError::ConfigParseError {
                path: comparison_path.display().to_string(),
                message,
            })?;

        let market = Self::load_market_rates(&path.join("market_rates.yaml"))?;

        let table_sets = Self::load_table_sets(&path.join("tables"))?;

        info!(
            bundle = %metadata.code,
            version = %metadata.version,
            table_sets = table_sets.len(),
            market_rates = market.entries().len(),
            "Loaded engine configuration"
        );

        Ok(Self {
            config: EngineConfig::new(metadata, comparison, market, table_sets),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn load_market_rates(path: &Path) -> EngineResult<MarketRates> {
        if !path.exists() {
            warn!(
                path = %path.display(),
                "Market reference table not found, benchmarks disabled"
            );
            return Ok(MarketRates::default());
        }

        let config = Self::load_yaml::<MarketRatesConfig>(path)?;
        Ok(MarketRates::new(config.market_rates))
    }

    /// Loads and validates all table set files from the tables directory.
    fn load_table_sets(tables_dir: &Path) -> EngineResult<Vec<TableSet>> {
        let tables_dir_str = tables_dir.display().to_string();

        if !tables_dir.exists() {
            return Err(EngineError::ConfigNotFound {
                path: tables_dir_str,
            });
        }

        let entries = fs::read_dir(tables_dir).map_err(|_| EngineError::ConfigNotFound {
            path: tables_dir_str.clone(),
        })?;

        let mut table_sets = Vec::new();
        let mut seen_dates = HashSet::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: tables_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let origin = path.display().to_string();
                let set_config = Self::load_yaml::<TableSetConfig>(&path)?;

                if !seen_dates.insert(set_config.effective_date) {
                    return Err(EngineError::ConfigParseError {
                        path: origin,
                        message: format!(
                            "duplicate table set for effective date {}",
                            set_config.effective_date
                        ),
                    });
                }

                table_sets.push(TableSet::from_config(set_config, &origin)?);
            }
        }

        if table_sets.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no table set files found)", tables_dir_str),
            });
        }

        Ok(table_sets)
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the bundle metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        self.config.metadata()
    }

    /// Returns the comparison settings.
    pub fn comparison_settings(&self) -> &ComparisonSettings {
        self.config.comparison()
    }

    /// Gets the table set in force on a given date.
    ///
    /// The method finds the most recent table set that is effective on or
    /// before the given date.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tradupay_engine::config::ConfigLoader;
    /// use chrono::NaiveDate;
    ///
    /// let loader = ConfigLoader::load("./config/brazil")?;
    /// let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    /// let tables = loader.table_set(date)?;
    /// assert_eq!(tables.effective_date(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    /// # Ok::<(), tradupay_engine::error::EngineError>(())
    /// ```
    pub fn table_set(&self, date: NaiveDate) -> EngineResult<&TableSet> {
        self.config
            .table_sets()
            .iter()
            .rfind(|set| set.effective_date() <= date)
            .ok_or(EngineError::TableSetNotFound { date })
    }

    /// Returns the most recent table set.
    pub fn latest_table_set(&self) -> &TableSet {
        // The loader refuses a directory without table sets.
        &self.config.table_sets()[self.config.table_sets().len() - 1]
    }

    /// Gets the market reference row for a professional context.
    pub fn market_rate(
        &self,
        area: &str,
        seniority: Seniority,
        location: &str,
    ) -> Option<&MarketRate> {
        self.config.market().lookup(area, seniority, location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/brazil"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "tradupay-{}-{}",
            name,
            uuid::Uuid::new_v4()
        ));
        fs::create_dir_all(dir.join("tables")).unwrap();
        fs::copy(
            Path::new(config_path()).join("engine.yaml"),
            dir.join("engine.yaml"),
        )
        .unwrap();
        fs::copy(
            Path::new(config_path()).join("comparison.yaml"),
            dir.join("comparison.yaml"),
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.metadata().code, "BR");
        assert_eq!(loader.config().table_sets().len(), 2);
    }

    #[test]
    fn test_table_sets_sorted_oldest_first() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let dates: Vec<NaiveDate> = loader
            .config()
            .table_sets()
            .iter()
            .map(|set| set.effective_date())
            .collect();

        assert_eq!(dates, vec![date(2024, 2, 1), date(2025, 5, 1)]);
    }

    #[test]
    fn test_table_set_selects_most_recent_effective() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let mid_2024 = loader.table_set(date(2024, 6, 1)).unwrap();
        assert_eq!(mid_2024.effective_date(), date(2024, 2, 1));
        assert_eq!(mid_2024.contractor().minimum_pro_labore, dec("1412.00"));

        let on_boundary = loader.table_set(date(2025, 5, 1)).unwrap();
        assert_eq!(on_boundary.effective_date(), date(2025, 5, 1));
        assert_eq!(on_boundary.contractor().minimum_pro_labore, dec("1518.00"));
    }

    #[test]
    fn test_table_set_before_first_effective_date_is_error() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        match loader.table_set(date(2020, 1, 1)) {
            Err(EngineError::TableSetNotFound { date: d }) => assert_eq!(d, date(2020, 1, 1)),
            other => panic!("Expected TableSetNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_latest_table_set() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let latest = loader.latest_table_set();

        assert_eq!(latest.effective_date(), date(2025, 5, 1));
        assert_eq!(latest.inss().base_ceiling(), Some(dec("8157.41")));
        assert_eq!(latest.irrf().brackets().len(), 5);
        assert_eq!(latest.salaried().dependent_deduction, dec("189.59"));
        assert_eq!(latest.contractor().fator_r_threshold, dec("0.28"));
    }

    #[test]
    fn test_comparison_settings_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let settings = loader.comparison_settings();

        assert_eq!(settings.tie_epsilon, dec("0.01"));
        assert_eq!(settings.switch_threshold, dec("200.00"));
        assert_eq!(settings.fgts_rate, dec("0.08"));
    }

    #[test]
    fn test_market_rate_lookup() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let rate = loader
            .market_rate("Desenvolvimento de Software", Seniority::Pleno, "São Paulo - SP")
            .unwrap();
        assert_eq!(rate.clt_average, dec("9500.00"));
        assert_eq!(rate.pj_average, Some(dec("13000.00")));

        assert!(
            loader
                .market_rate("Astronomia", Seniority::Pleno, "São Paulo - SP")
                .is_none()
        );
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("engine.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_malformed_table_is_fatal_at_load() {
        let dir = scratch_dir("malformed");
        let original =
            fs::read_to_string(Path::new(config_path()).join("tables/2025-05-01.yaml")).unwrap();
        // Open a gap in the IRRF table.
        let broken = original.replacen(
            "lower_bound: \"2826.65\"",
            "lower_bound: \"2900.00\"",
            1,
        );
        assert_ne!(original, broken);
        fs::write(dir.join("tables/2025-05-01.yaml"), broken).unwrap();

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).ok();

        match result {
            Err(EngineError::MalformedTable { table, message }) => {
                assert_eq!(table, "IRRF");
                assert!(message.contains("gap"), "unexpected message: {}", message);
            }
            other => panic!("Expected MalformedTable error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_effective_date_is_rejected() {
        let dir = scratch_dir("duplicate");
        let source = Path::new(config_path()).join("tables/2025-05-01.yaml");
        fs::copy(&source, dir.join("tables/a.yaml")).unwrap();
        fs::copy(&source, dir.join("tables/b.yaml")).unwrap();

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).ok();

        match result {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("duplicate"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_market_file_disables_benchmarks() {
        let dir = scratch_dir("no-market");
        fs::copy(
            Path::new(config_path()).join("tables/2025-05-01.yaml"),
            dir.join("tables/2025-05-01.yaml"),
        )
        .unwrap();

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).ok();

        let loader = result.unwrap();
        assert!(loader.config().market().is_empty());
    }

    #[test]
    fn test_empty_tables_directory_is_error() {
        let dir = scratch_dir("empty");

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).ok();

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("no table set files found"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }
}
