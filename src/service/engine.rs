//! The compensation engine facade.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::request::ComparisonRequest;
use crate::calculation::{
    ContractorOptions, SalariedOptions, assess_switch, benchmark, calculate_contractor,
    calculate_salaried, compare_with, summarize,
};
use crate::config::{ConfigLoader, TableSet};
use crate::error::EngineResult;
use crate::models::{ComparisonReport, ComparisonResult, MarketBenchmark, Regime, RegimeResult};

/// Entry point for callers of the engine.
///
/// Holds the loaded configuration behind an [`Arc`], so clones are cheap and
/// can be shared across threads. Every operation is a pure function of its
/// input and the immutable tables.
///
/// # Example
///
/// ```no_run
/// use tradupay_engine::service::{ComparisonRequest, CompensationEngine};
/// use tradupay_engine::models::Advantage;
/// use rust_decimal::Decimal;
///
/// let engine = CompensationEngine::load("./config/brazil")?;
/// let report = engine.evaluate(&ComparisonRequest::new(
///     Decimal::new(10000, 0),
///     Decimal::new(10000, 0),
/// ))?;
/// assert_eq!(report.comparison.advantage, Advantage::Contractor);
/// # Ok::<(), tradupay_engine::error::EngineError>(())
/// ```
#[derive(Clone)]
pub struct CompensationEngine {
    config: Arc<ConfigLoader>,
}

impl CompensationEngine {
    /// Creates an engine from a loaded configuration.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Loads the configuration directory and creates an engine.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        ConfigLoader::load(path).map(Self::new)
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Gets the table set in force on `date`.
    pub fn table_set(&self, date: NaiveDate) -> EngineResult<&TableSet> {
        self.config.table_set(date)
    }

    /// Gets the most recent table set.
    pub fn latest_table_set(&self) -> &TableSet {
        self.config.latest_table_set()
    }

    /// Calculates a CLT net income with the latest tables.
    pub fn calculate_salaried(
        &self,
        gross: Decimal,
        options: &SalariedOptions,
    ) -> EngineResult<RegimeResult> {
        calculate_salaried(gross, self.latest_table_set(), options)
    }

    /// Calculates a PJ net income with the latest tables.
    pub fn calculate_contractor(
        &self,
        gross: Decimal,
        options: &ContractorOptions,
    ) -> EngineResult<RegimeResult> {
        calculate_contractor(gross, self.latest_table_set(), options)
    }

    /// Compares the two regimes on the take-home basis with the latest tables.
    pub fn compare(
        &self,
        salaried_gross: Decimal,
        contractor_gross: Decimal,
    ) -> EngineResult<ComparisonResult> {
        compare_with(
            &ComparisonRequest::new(salaried_gross, contractor_gross).to_input(),
            self.latest_table_set(),
            self.config.comparison_settings(),
        )
    }

    /// Evaluates a full comparison request.
    ///
    /// The report carries the comparison, a switch assessment when the caller
    /// gave a current regime, and market benchmarks when a profile matches a
    /// reference row.
    ///
    /// # Errors
    ///
    /// Returns a caller error (see [`EngineError::is_caller_error`]) when the
    /// request is invalid or no tables cover `as_of`.
    ///
    /// [`EngineError::is_caller_error`]: crate::error::EngineError::is_caller_error
    pub fn evaluate(&self, request: &ComparisonRequest) -> EngineResult<ComparisonReport> {
        let correlation_id = Uuid::new_v4();
        info!(
            correlation_id = %correlation_id,
            basis = ?request.basis,
            "Processing comparison request"
        );

        let start_time = Instant::now();
        match self.build_report(request) {
            Ok(report) => {
                let duration = start_time.elapsed();
                info!(
                    correlation_id = %correlation_id,
                    table_version = %report.table_version,
                    advantage = ?report.comparison.advantage,
                    delta = %report.comparison.delta,
                    duration_us = duration.as_micros(),
                    "Comparison completed successfully"
                );
                Ok(report)
            }
            Err(err) => {
                warn!(
                    correlation_id = %correlation_id,
                    code = err.code(),
                    error = %err,
                    "Comparison failed"
                );
                Err(err)
            }
        }
    }

    fn build_report(&self, request: &ComparisonRequest) -> EngineResult<ComparisonReport> {
        let tables = match request.as_of {
            Some(date) => self.table_set(date)?,
            None => self.latest_table_set(),
        };
        let settings = self.config.comparison_settings();

        let comparison = compare_with(&request.to_input(), tables, settings)?;

        let switch_assessment = request
            .current_regime
            .map(|current| assess_switch(&comparison, current, settings.switch_threshold));

        let market_benchmarks = self.market_benchmarks(request);

        let mut summary = summarize(&comparison);
        if let Some(assessment) = &switch_assessment {
            summary.push(' ');
            summary.push_str(&assessment.message);
        }

        Ok(ComparisonReport {
            table_version: tables.effective_date(),
            comparison,
            switch_assessment,
            market_benchmarks,
            summary,
        })
    }

    fn market_benchmarks(&self, request: &ComparisonRequest) -> Vec<MarketBenchmark> {
        let Some(profile) = &request.profile else {
            return Vec::new();
        };

        let Some(rate) = self
            .config
            .market_rate(&profile.area, profile.seniority, &profile.location)
        else {
            debug!(
                area = %profile.area,
                seniority = %profile.seniority,
                location = %profile.location,
                "No market reference for profile"
            );
            return Vec::new();
        };

        [
            (Regime::Salaried, request.salaried_gross),
            (Regime::Contractor, request.contractor_gross),
        ]
        .into_iter()
        .filter_map(|(regime, proposal)| benchmark(regime, proposal, rate))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{Advantage, Seniority, SwitchVerdict};
    use crate::service::ProfessionalProfile;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn load_engine() -> CompensationEngine {
        CompensationEngine::load("./config/brazil").expect("Failed to load config")
    }

    #[test]
    fn test_engine_is_clone_send_sync() {
        fn assert_traits<T: Clone + Send + Sync>() {}
        assert_traits::<CompensationEngine>();
    }

    #[test]
    fn test_clones_share_configuration() {
        let engine = load_engine();
        let clone = engine.clone();

        assert!(std::ptr::eq(engine.config(), clone.config()));
    }

    #[test]
    fn test_evaluate_minimal_request() {
        let engine = load_engine();
        let report = engine
            .evaluate(&ComparisonRequest::new(dec("10000.00"), dec("10000.00")))
            .unwrap();

        assert_eq!(report.table_version, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        assert_eq!(report.comparison.advantage, Advantage::Contractor);
        assert!(report.switch_assessment.is_none());
        assert!(report.market_benchmarks.is_empty());
        assert!(report.summary.starts_with("PJ comes out ahead"));
    }

    #[test]
    fn test_evaluate_with_switch_assessment() {
        let engine = load_engine();
        let request = ComparisonRequest {
            current_regime: Some(Regime::Salaried),
            ..ComparisonRequest::new(dec("10000.00"), dec("10000.00"))
        };
        let report = engine.evaluate(&request).unwrap();

        let assessment = report.switch_assessment.unwrap();
        assert_eq!(assessment.verdict, SwitchVerdict::Favorable);
        assert!(report.summary.ends_with(&assessment.message));
    }

    #[test]
    fn test_evaluate_with_market_profile() {
        let engine = load_engine();
        let request = ComparisonRequest {
            profile: Some(ProfessionalProfile {
                area: "Desenvolvimento de Software".to_string(),
                seniority: Seniority::Pleno,
                location: "São Paulo - SP".to_string(),
            }),
            ..ComparisonRequest::new(dec("10000.00"), dec("10000.00"))
        };
        let report = engine.evaluate(&request).unwrap();

        assert_eq!(report.market_benchmarks.len(), 2);
        assert_eq!(report.market_benchmarks[0].regime, Regime::Salaried);
        assert!(report.market_benchmarks[0].is_above());
        assert!(!report.market_benchmarks[1].is_above());
    }

    #[test]
    fn test_unknown_profile_has_no_benchmarks() {
        let engine = load_engine();
        let request = ComparisonRequest {
            profile: Some(ProfessionalProfile {
                area: "Astronomia".to_string(),
                seniority: Seniority::Junior,
                location: "Manaus - AM".to_string(),
            }),
            ..ComparisonRequest::new(dec("10000.00"), dec("10000.00"))
        };

        assert!(engine.evaluate(&request).unwrap().market_benchmarks.is_empty());
    }

    #[test]
    fn test_evaluate_uses_tables_in_force() {
        let engine = load_engine();
        let request = ComparisonRequest {
            as_of: NaiveDate::from_ymd_opt(2024, 12, 31),
            ..ComparisonRequest::new(dec("10000.00"), dec("10000.00"))
        };
        let report = engine.evaluate(&request).unwrap();

        assert_eq!(report.table_version, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[test]
    fn test_evaluate_before_first_tables_fails() {
        let engine = load_engine();
        let request = ComparisonRequest {
            as_of: NaiveDate::from_ymd_opt(2020, 1, 1),
            ..ComparisonRequest::new(dec("10000.00"), dec("10000.00"))
        };

        let err = engine.evaluate(&request).unwrap_err();
        assert!(matches!(err, EngineError::TableSetNotFound { .. }));
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_oversized_contractor_gross_is_a_caller_error() {
        let engine = load_engine();
        let request = ComparisonRequest::from_json(
            r#"{"salaried_gross": "1000", "contractor_gross": "10000000000000000000000000000"}"#,
        )
        .unwrap();

        let err = engine.evaluate(&request).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidInput { ref field, .. } if field == "contractor_gross"
        ));
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_facade_matches_free_functions() {
        let engine = load_engine();

        assert_eq!(
            engine
                .calculate_salaried(dec("10000.00"), &SalariedOptions::default())
                .unwrap()
                .net_amount,
            dec("7468.80")
        );
        assert_eq!(
            engine
                .calculate_contractor(dec("10000.00"), &ContractorOptions::default())
                .unwrap()
                .net_amount,
            dec("9087.26")
        );
        assert_eq!(
            engine.compare(dec("10000.00"), dec("10000.00")).unwrap().delta,
            dec("1618.46")
        );
    }
}
