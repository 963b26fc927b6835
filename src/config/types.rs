//! Configuration types for the TraduPay engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and the validated forms
//! the calculators work with.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{AnnexKind, Seniority, TaxBracket, TaxTable};

/// Metadata about the reference data bundle.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineMetadata {
    /// Short identifier of the bundle (e.g., "BR").
    pub code: String,
    /// Human-readable name of the bundle.
    pub name: String,
    /// The version of the bundle.
    pub version: String,
    /// Where the tables were sourced from.
    pub source_url: String,
}

/// A tax table as written in a table set file, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxTableConfig {
    /// The table name (e.g., "INSS").
    pub name: String,
    /// The legal basis of the table.
    #[serde(default)]
    pub legal_ref: String,
    /// Optional cap applied to the amount before lookup.
    #[serde(default)]
    pub base_ceiling: Option<Decimal>,
    /// The brackets, ascending.
    pub brackets: Vec<TaxBracket>,
}

impl TaxTableConfig {
    /// Validates the brackets and builds the immutable table.
    pub fn into_table(self) -> EngineResult<TaxTable> {
        TaxTable::new(self.name, self.legal_ref, self.base_ceiling, self.brackets)
    }
}

/// The tables section of a table set file.
#[derive(Debug, Clone, Deserialize)]
pub struct TablesConfig {
    /// Employee social security contribution.
    pub inss: TaxTableConfig,
    /// Monthly income tax withholding.
    pub irrf: TaxTableConfig,
    /// Social security contribution on a partner's pró-labore.
    pub pro_labore_inss: TaxTableConfig,
    /// Simples Nacional Anexo III, over annual revenue.
    pub simples_anexo_iii: TaxTableConfig,
    /// Simples Nacional Anexo V, over annual revenue.
    pub simples_anexo_v: TaxTableConfig,
}

/// Salaried-regime parameters that are not brackets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SalariedRules {
    /// Monthly IRRF base deduction per dependent.
    #[serde(default)]
    pub dependent_deduction: Decimal,
    /// Monthly simplified discount that may replace the legal deductions.
    #[serde(default)]
    pub simplified_discount: Option<Decimal>,
}

impl SalariedRules {
    fn validate(&self) -> Result<(), String> {
        if self.dependent_deduction < Decimal::ZERO {
            return Err(format!(
                "dependent_deduction {} must not be negative",
                self.dependent_deduction
            ));
        }
        if let Some(discount) = self.simplified_discount.filter(|d| *d < Decimal::ZERO) {
            return Err(format!(
                "simplified_discount {} must not be negative",
                discount
            ));
        }
        Ok(())
    }
}

/// Contractor-regime parameters that drive the Fator R decision.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractorRules {
    /// Pró-labore to revenue ratio at which Anexo III applies (0.28).
    pub fator_r_threshold: Decimal,
    /// The lowest monthly pró-labore a partner may draw (minimum wage).
    pub minimum_pro_labore: Decimal,
    /// Annual revenue above which a company leaves the Simples Nacional.
    #[serde(default)]
    pub simples_revenue_ceiling: Option<Decimal>,
}

impl ContractorRules {
    fn validate(&self) -> Result<(), String> {
        if self.fator_r_threshold < Decimal::ZERO || self.fator_r_threshold > Decimal::ONE {
            return Err(format!(
                "fator_r_threshold {} must be between 0 and 1",
                self.fator_r_threshold
            ));
        }
        if self.minimum_pro_labore < Decimal::ZERO {
            return Err(format!(
                "minimum_pro_labore {} must not be negative",
                self.minimum_pro_labore
            ));
        }
        Ok(())
    }
}

/// A table set file as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct TableSetConfig {
    /// The date from which these tables apply.
    pub effective_date: NaiveDate,
    /// Free-form note on where the values come from.
    #[serde(default)]
    pub source: String,
    /// The progressive tables.
    pub tables: TablesConfig,
    /// Salaried parameters.
    pub salaried: SalariedRules,
    /// Contractor parameters.
    pub contractor: ContractorRules,
}

/// The validated reference data effective from a given date.
///
/// Built once at load time and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct TableSet {
    effective_date: NaiveDate,
    source: String,
    inss: TaxTable,
    irrf: TaxTable,
    pro_labore_inss: TaxTable,
    simples_anexo_iii: TaxTable,
    simples_anexo_v: TaxTable,
    salaried: SalariedRules,
    contractor: ContractorRules,
}

impl TableSet {
    /// Validates every table and rule in a table set file.
    ///
    /// Table problems surface as `MalformedTable`; rule problems as a
    /// `ConfigParseError` against `origin` (the file the set was read from).
    pub fn from_config(config: TableSetConfig, origin: &str) -> EngineResult<Self> {
        let TablesConfig {
            inss,
            irrf,
            pro_labore_inss,
            simples_anexo_iii,
            simples_anexo_v,
        } = config.tables;

        let inss = inss.into_table()?;
        let irrf = irrf.into_table()?;
        let pro_labore_inss = pro_labore_inss.into_table()?;
        let simples_anexo_iii = simples_anexo_iii.into_table()?;
        let simples_anexo_v = simples_anexo_v.into_table()?;

        config
            .salaried
            .validate()
            .and_then(|_| config.contractor.validate())
            .map_err(|message| EngineError::ConfigParseError {
                path: origin.to_string(),
                message,
            })?;

        Ok(Self {
            effective_date: config.effective_date,
            source: config.source,
            inss,
            irrf,
            pro_labore_inss,
            simples_anexo_iii,
            simples_anexo_v,
            salaried: config.salaried,
            contractor: config.contractor,
        })
    }

    /// Returns the date from which the set applies.
    pub fn effective_date(&self) -> NaiveDate {
        self.effective_date
    }

    /// Returns the source note.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the employee INSS table.
    pub fn inss(&self) -> &TaxTable {
        &self.inss
    }

    /// Returns the IRRF table.
    pub fn irrf(&self) -> &TaxTable {
        &self.irrf
    }

    /// Returns the pró-labore INSS table.
    pub fn pro_labore_inss(&self) -> &TaxTable {
        &self.pro_labore_inss
    }

    /// Returns the Simples Nacional table for an annex.
    pub fn annex(&self, kind: AnnexKind) -> &TaxTable {
        match kind {
            AnnexKind::AnexoIii => &self.simples_anexo_iii,
            AnnexKind::AnexoV => &self.simples_anexo_v,
        }
    }

    /// Returns the salaried parameters.
    pub fn salaried(&self) -> &SalariedRules {
        &self.salaried
    }

    /// Returns the contractor parameters.
    pub fn contractor(&self) -> &ContractorRules {
        &self.contractor
    }
}

/// Settings that shape the comparison rather than the taxes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComparisonSettings {
    /// Differences below this amount are reported as a tie.
    #[serde(default = "default_tie_epsilon")]
    pub tie_epsilon: Decimal,
    /// Differences within this amount make a switch "equivalent".
    #[serde(default = "default_switch_threshold")]
    pub switch_threshold: Decimal,
    /// Employer FGTS deposit as a fraction of gross salary.
    #[serde(default = "default_fgts_rate")]
    pub fgts_rate: Decimal,
}

fn default_tie_epsilon() -> Decimal {
    Decimal::new(1, 2)
}

fn default_switch_threshold() -> Decimal {
    Decimal::new(20000, 2)
}

fn default_fgts_rate() -> Decimal {
    Decimal::new(8, 2)
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            tie_epsilon: default_tie_epsilon(),
            switch_threshold: default_switch_threshold(),
            fgts_rate: default_fgts_rate(),
        }
    }
}

impl ComparisonSettings {
    /// Checks that every setting is within range.
    pub fn validate(&self) -> Result<(), String> {
        if self.tie_epsilon < Decimal::ZERO {
            return Err(format!("tie_epsilon {} must not be negative", self.tie_epsilon));
        }
        if self.switch_threshold < Decimal::ZERO {
            return Err(format!(
                "switch_threshold {} must not be negative",
                self.switch_threshold
            ));
        }
        if self.fgts_rate < Decimal::ZERO || self.fgts_rate > Decimal::ONE {
            return Err(format!("fgts_rate {} must be between 0 and 1", self.fgts_rate));
        }
        Ok(())
    }
}

/// One row of the market reference table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarketRate {
    /// Professional area (e.g., "Desenvolvimento de Software").
    pub area: String,
    /// Career level.
    pub seniority: Seniority,
    /// City and state (e.g., "São Paulo - SP").
    pub location: String,
    /// Average monthly CLT gross salary.
    pub clt_average: Decimal,
    /// Average monthly PJ gross revenue.
    #[serde(default)]
    pub pj_average: Option<Decimal>,
}

/// Market rates file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketRatesConfig {
    /// All rows of the reference table.
    #[serde(default)]
    pub market_rates: Vec<MarketRate>,
}

/// The market reference table, queried by (area, seniority, location).
#[derive(Debug, Clone, Default)]
pub struct MarketRates {
    entries: Vec<MarketRate>,
}

impl MarketRates {
    /// Creates the lookup table.
    pub fn new(entries: Vec<MarketRate>) -> Self {
        Self { entries }
    }

    /// Returns true if no reference data was loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all rows.
    pub fn entries(&self) -> &[MarketRate] {
        &self.entries
    }

    /// Finds the first row matching all three keys exactly.
    pub fn lookup(&self, area: &str, seniority: Seniority, location: &str) -> Option<&MarketRate> {
        self.entries
            .iter()
            .find(|r| r.area == area && r.seniority == seniority && r.location == location)
    }

    /// Returns the distinct areas, sorted.
    pub fn areas(&self) -> Vec<&str> {
        let mut areas: Vec<&str> = self.entries.iter().map(|r| r.area.as_str()).collect();
        areas.sort_unstable();
        areas.dedup();
        areas
    }

    /// Returns the distinct locations, sorted.
    pub fn locations(&self) -> Vec<&str> {
        let mut locations: Vec<&str> = self.entries.iter().map(|r| r.location.as_str()).collect();
        locations.sort_unstable();
        locations.dedup();
        locations
    }
}

/// The complete engine configuration loaded from YAML files.
///
/// This struct aggregates all configuration loaded from the various
/// YAML files in a configuration directory.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Bundle metadata.
    metadata: EngineMetadata,
    /// Comparison settings.
    comparison: ComparisonSettings,
    /// Market reference table.
    market: MarketRates,
    /// Table sets by effective date (sorted oldest first).
    table_sets: Vec<TableSet>,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(
        metadata: EngineMetadata,
        comparison: ComparisonSettings,
        market: MarketRates,
        table_sets: Vec<TableSet>,
    ) -> Self {
        let mut sorted_sets = table_sets;
        sorted_sets.sort_by_key(|set| set.effective_date());
        Self {
            metadata,
            comparison,
            market,
            table_sets: sorted_sets,
        }
    }

    /// Returns the bundle metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        &self.metadata
    }

    /// Returns the comparison settings.
    pub fn comparison(&self) -> &ComparisonSettings {
        &self.comparison
    }

    /// Returns the market reference table.
    pub fn market(&self) -> &MarketRates {
        &self.market
    }

    /// Returns all table sets, oldest first.
    pub fn table_sets(&self) -> &[TableSet] {
        &self.table_sets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn market() -> MarketRates {
        MarketRates::new(vec![
            MarketRate {
                area: "Marketing Digital".to_string(),
                seniority: Seniority::Pleno,
                location: "São Paulo - SP".to_string(),
                clt_average: dec("7000.00"),
                pj_average: Some(dec("9500.00")),
            },
            MarketRate {
                area: "Desenvolvimento de Software".to_string(),
                seniority: Seniority::Pleno,
                location: "Santa Catarina - SC".to_string(),
                clt_average: dec("9000.00"),
                pj_average: None,
            },
            MarketRate {
                area: "Desenvolvimento de Software".to_string(),
                seniority: Seniority::Senior,
                location: "São Paulo - SP".to_string(),
                clt_average: dec("15000.00"),
                pj_average: Some(dec("19000.00")),
            },
        ])
    }

    #[test]
    fn test_comparison_settings_defaults() {
        let settings = ComparisonSettings::default();

        assert_eq!(settings.tie_epsilon, dec("0.01"));
        assert_eq!(settings.switch_threshold, dec("200.00"));
        assert_eq!(settings.fgts_rate, dec("0.08"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_comparison_settings_partial_yaml_uses_defaults() {
        let settings: ComparisonSettings =
            serde_yaml::from_str("switch_threshold: \"150.00\"").unwrap();

        assert_eq!(settings.switch_threshold, dec("150.00"));
        assert_eq!(settings.tie_epsilon, dec("0.01"));
    }

    #[test]
    fn test_comparison_settings_reject_fgts_rate_above_one() {
        let settings = ComparisonSettings {
            fgts_rate: dec("8"),
            ..ComparisonSettings::default()
        };

        assert!(settings.validate().unwrap_err().contains("fgts_rate"));
    }

    #[test]
    fn test_contractor_rules_reject_threshold_above_one() {
        let rules = ContractorRules {
            fator_r_threshold: dec("28"),
            minimum_pro_labore: dec("1518.00"),
            simples_revenue_ceiling: None,
        };

        assert!(rules.validate().unwrap_err().contains("fator_r_threshold"));
    }

    #[test]
    fn test_salaried_rules_reject_negative_deduction() {
        let rules = SalariedRules {
            dependent_deduction: dec("-1"),
            simplified_discount: None,
        };

        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_market_lookup_matches_all_keys() {
        let market = market();

        let found = market
            .lookup("Desenvolvimento de Software", Seniority::Senior, "São Paulo - SP")
            .unwrap();
        assert_eq!(found.clt_average, dec("15000.00"));

        assert!(
            market
                .lookup("Desenvolvimento de Software", Seniority::Junior, "São Paulo - SP")
                .is_none()
        );
    }

    #[test]
    fn test_market_areas_and_locations_are_sorted_and_unique() {
        let market = market();

        assert_eq!(
            market.areas(),
            vec!["Desenvolvimento de Software", "Marketing Digital"]
        );
        assert_eq!(
            market.locations(),
            vec!["Santa Catarina - SC", "São Paulo - SP"]
        );
    }

    #[test]
    fn test_table_config_into_table_validates() {
        let config = TaxTableConfig {
            name: "BROKEN".to_string(),
            legal_ref: String::new(),
            base_ceiling: None,
            brackets: vec![],
        };

        assert!(config.into_table().is_err());
    }
}
