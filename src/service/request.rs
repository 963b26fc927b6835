//! Request types for the compensation engine.
//!
//! A [`ComparisonRequest`] is the JSON document a caller submits to
//! [`CompensationEngine::evaluate`](super::CompensationEngine::evaluate).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{ComparisonInput, ContractorOptions, SalariedOptions};
use crate::error::{EngineError, EngineResult};
use crate::models::{ComparisonBasis, Regime, Seniority};

/// A CLT vs PJ comparison request.
///
/// Only the two gross amounts are required.
///
/// # Example
///
/// ```
/// use tradupay_engine::service::ComparisonRequest;
/// use rust_decimal::Decimal;
///
/// let request = ComparisonRequest::from_json(
///     r#"{"salaried_gross": "10000.00", "contractor_gross": "12000.00", "current_regime": "clt"}"#,
/// )
/// .unwrap();
/// assert_eq!(request.contractor_gross, Decimal::new(12000, 0));
/// assert_eq!(request.dependents, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    /// Monthly CLT gross salary.
    pub salaried_gross: Decimal,
    /// Monthly PJ gross revenue.
    pub contractor_gross: Decimal,
    /// Number of IRRF dependents.
    #[serde(default)]
    pub dependents: u32,
    /// Use the simplified IRRF discount when it is larger.
    #[serde(default)]
    pub use_simplified_discount: bool,
    /// Share of PJ revenue spent on business costs.
    #[serde(default)]
    pub expenses_ratio: Decimal,
    /// Monthly value of CLT benefits (meal vouchers, health plan).
    #[serde(default)]
    pub extra_benefits: Decimal,
    /// The basis the regimes are ranked on.
    #[serde(default)]
    pub basis: ComparisonBasis,
    /// The caller's current regime, for the switch assessment.
    #[serde(default)]
    pub current_regime: Option<Regime>,
    /// Professional profile, for the market benchmark.
    #[serde(default)]
    pub profile: Option<ProfessionalProfile>,
    /// Date whose tables apply; the latest tables when absent.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// The key of the market reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionalProfile {
    /// Area of work, e.g. "Desenvolvimento de Software".
    pub area: String,
    /// Seniority level.
    pub seniority: Seniority,
    /// City and state, e.g. "São Paulo - SP".
    pub location: String,
}

impl ComparisonRequest {
    /// Creates a request for the two gross amounts with default options.
    pub fn new(salaried_gross: Decimal, contractor_gross: Decimal) -> Self {
        Self {
            salaried_gross,
            contractor_gross,
            dependents: 0,
            use_simplified_discount: false,
            expenses_ratio: Decimal::ZERO,
            extra_benefits: Decimal::ZERO,
            basis: ComparisonBasis::default(),
            current_regime: None,
            profile: None,
            as_of: None,
        }
    }

    /// Parses a request from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if the document is not valid JSON
    /// or a field has the wrong type.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::InvalidInput {
            field: "request".to_string(),
            message: e.to_string(),
        })
    }

    /// Converts the request into comparator input.
    pub fn to_input(&self) -> ComparisonInput {
        ComparisonInput {
            salaried_gross: self.salaried_gross,
            contractor_gross: self.contractor_gross,
            salaried: SalariedOptions {
                dependents: self.dependents,
                use_simplified_discount: self.use_simplified_discount,
            },
            contractor: ContractorOptions {
                expenses_ratio: self.expenses_ratio,
            },
            extra_benefits: self.extra_benefits,
            basis: self.basis,
        }
    }
}
