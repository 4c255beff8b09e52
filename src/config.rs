use std::fs;
use std::path::Path;

use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumString};

use crate::eligibility::CooldownDays;
use crate::error::{DonorError, Result};

const DEFAULT_SEED: u64 = 42;
fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_n_estimators() -> usize {
    300
}

fn default_min_samples_split() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_test_size() -> f64 {
    0.2
}

fn default_cooldown_days() -> u32 {
    90
}

fn default_sample_size() -> usize {
    200
}

fn default_export_size() -> usize {
    50
}

fn default_transfusion_rows() -> usize {
    748
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DegeneratePolicy {
    /// Constant features scale to 0.0.
    #[default]
    Zero,
    /// Constant features abort fitting.
    Reject,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MaxFeatures {
    #[default]
    Sqrt,
    Log2,
    All,
}

impl MaxFeatures {
    /// Number of candidate features examined at each split, never below one.
    pub fn resolve(self, n_features: usize) -> usize {
        let n = n_features as f64;
        let k = match self {
            MaxFeatures::Sqrt => n.sqrt() as usize,
            MaxFeatures::Log2 => n.log2() as usize,
            MaxFeatures::All => n_features,
        };
        k.clamp(1, n_features.max(1))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ClassWeight {
    None,
    Balanced,
    #[default]
    BalancedSubsample,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ForestParams {
    #[schemars(
        title = "Trees",
        description = "Number of trees in the forest",
        range(min = 1)
    )]
    pub n_estimators: usize,

    #[schemars(
        title = "Max Depth",
        description = "Maximum tree depth (None = grow until leaves are pure)",
        range(min = 1)
    )]
    pub max_depth: Option<usize>,

    #[schemars(
        title = "Min Samples Split",
        description = "Minimum distinct samples a node needs before it is split",
        range(min = 2)
    )]
    pub min_samples_split: usize,

    #[schemars(title = "Max Features", description = "Features examined per split")]
    pub max_features: MaxFeatures,

    #[schemars(title = "Bootstrap", description = "Draw a bootstrap sample for each tree")]
    pub bootstrap: bool,

    #[schemars(title = "Class Weight", description = "none / balanced / balanced-subsample")]
    pub class_weight: ClassWeight,

    #[schemars(title = "Seed", description = "PRNG seed for bootstraps and feature draws")]
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: default_n_estimators(),
            max_depth: None,
            min_samples_split: default_min_samples_split(),
            max_features: MaxFeatures::default(),
            bootstrap: default_true(),
            class_weight: ClassWeight::default(),
            seed: default_seed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScoringParams {
    pub forest: ForestParams,

    #[schemars(
        title = "Test Size",
        description = "Fraction of records held out for evaluation",
        range(min = 0.0, max = 1.0)
    )]
    pub test_size: f64,

    #[schemars(title = "Split Seed", description = "PRNG seed for the stratified split")]
    pub split_seed: u64,

    #[schemars(
        title = "Degenerate Features",
        description = "zero: constant features scale to 0.0; reject: fail training"
    )]
    pub degenerate_policy: DegeneratePolicy,

    #[schemars(
        title = "Synthetic Rows",
        description = "Rows generated when no transfusion dataset can be loaded",
        range(min = 2)
    )]
    pub synthetic_rows: usize,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            forest: ForestParams::default(),
            test_size: default_test_size(),
            split_seed: default_seed(),
            degenerate_policy: DegeneratePolicy::default(),
            synthetic_rows: default_transfusion_rows(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EligibilityParams {
    #[schemars(
        title = "Cooldown Days",
        description = "Demo-only minimum interval between donations",
        range(min = 30, max = 200)
    )]
    pub cooldown_days: u32,
}

impl Default for EligibilityParams {
    fn default() -> Self {
        Self {
            cooldown_days: default_cooldown_days(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RosterParams {
    #[schemars(
        title = "Sample Size",
        description = "Rows in the synthetic roster used when none is uploaded"
    )]
    pub sample_size: usize,

    #[schemars(title = "Seed", description = "PRNG seed for the synthetic roster")]
    pub seed: u64,

    #[schemars(
        title = "Export Size",
        description = "Rows written by the sample roster export"
    )]
    pub export_size: usize,
}

impl Default for RosterParams {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            seed: default_seed(),
            export_size: default_export_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    pub scoring: ScoringParams,
    pub eligibility: EligibilityParams,
    pub roster: RosterParams,
}

impl AppConfig {
    /// Reads an optional JSON file, applies `key.path=value` overrides on top,
    /// fills the gaps with defaults and validates the result.
    pub fn load(path: Option<&Path>, overrides: &[KeyValue]) -> Result<Self> {
        let mut raw = match path {
            Some(p) => {
                let text = fs::read_to_string(p)?;
                serde_json::from_str::<Value>(&text).map_err(|e| {
                    DonorError::Config(format!("failed to parse {}: {e}", p.display()))
                })?
            }
            None => Value::Object(Map::new()),
        };

        apply_overrides(&mut raw, overrides)?;

        let config: AppConfig =
            serde_json::from_value(raw).map_err(|e| DonorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let forest = &self.scoring.forest;
        if forest.n_estimators == 0 {
            return Err(DonorError::Config("n_estimators must be > 0".into()));
        }
        if forest.min_samples_split < 2 {
            return Err(DonorError::Config("min_samples_split must be >= 2".into()));
        }
        if forest.max_depth == Some(0) {
            return Err(DonorError::Config("max_depth must be > 0".into()));
        }
        let ts = self.scoring.test_size;
        if !(ts > 0.0 && ts < 1.0) {
            return Err(DonorError::Config(format!(
                "test_size must be in (0, 1), got {ts}"
            )));
        }
        if self.scoring.synthetic_rows < 2 {
            return Err(DonorError::Config("synthetic_rows must be >= 2".into()));
        }
        CooldownDays::new(self.eligibility.cooldown_days as i64)?;
        Ok(())
    }

    pub fn cooldown(&self) -> CooldownDays {
        // validated on load; clamp keeps a hand-built config usable
        CooldownDays::saturating(self.eligibility.cooldown_days)
    }

    pub fn schema() -> Schema {
        schema_for!(AppConfig)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue {
    key: String,
    value: Value,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

pub fn parse_key_value(raw: &str) -> std::result::Result<KeyValue, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| "expected KEY=VALUE".to_string())?;
    let key = key.trim();
    if key.is_empty() {
        return Err("key cannot be empty".to_string());
    }

    Ok(KeyValue {
        key: key.to_string(),
        value: parse_literal(value.trim()),
    })
}

fn parse_literal(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }

    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn apply_overrides(target: &mut Value, overrides: &[KeyValue]) -> Result<()> {
    for kv in overrides {
        set_path(target, &kv.key, kv.value.clone())?;
    }
    Ok(())
}

fn set_path(target: &mut Value, path: &str, new_value: Value) -> Result<()> {
    let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        return Err(DonorError::Config("empty key is not allowed".into()));
    };

    let mut current = target;
    for seg in parents {
        current = ensure_object(current, path)?
            .entry((*seg).to_string())
            .or_insert(Value::Null);
    }

    ensure_object(current, path)?.insert((*last).to_string(), new_value);
    Ok(())
}

fn ensure_object<'a>(value: &'a mut Value, path: &str) -> Result<&'a mut Map<String, Value>> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DonorError::Config(format!(
            "cannot set '{path}': {other} is not an object"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_demo() {
        let c = AppConfig::default();
        assert_eq!(c.scoring.forest.n_estimators, 300);
        assert_eq!(c.scoring.forest.max_depth, None);
        assert_eq!(c.scoring.forest.seed, 42);
        assert_eq!(c.scoring.forest.class_weight, ClassWeight::BalancedSubsample);
        assert_eq!(c.scoring.test_size, 0.2);
        assert_eq!(c.eligibility.cooldown_days, 90);
        assert_eq!(c.roster.sample_size, 200);
        assert_eq!(c.roster.seed, 42);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn overrides_set_nested_fields() {
        let overrides = vec![
            parse_key_value("scoring.forest.n_estimators=25").unwrap(),
            parse_key_value("scoring.forest.class_weight=balanced").unwrap(),
            parse_key_value("eligibility.cooldown_days=120").unwrap(),
        ];
        let c = AppConfig::load(None, &overrides).unwrap();
        assert_eq!(c.scoring.forest.n_estimators, 25);
        assert_eq!(c.scoring.forest.class_weight, ClassWeight::Balanced);
        assert_eq!(c.eligibility.cooldown_days, 120);
        assert_eq!(c.roster.sample_size, 200);
    }

    #[test]
    fn file_values_are_merged_with_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"roster": {{"sample_size": 10}}}}"#).unwrap();
        let over = vec![parse_key_value("roster.seed=7").unwrap()];
        let c = AppConfig::load(Some(f.path()), &over).unwrap();
        assert_eq!(c.roster.sample_size, 10);
        assert_eq!(c.roster.seed, 7);
        assert_eq!(c.roster.export_size, 50);
    }

    #[test]
    fn out_of_range_cooldown_is_rejected() {
        let over = vec![parse_key_value("eligibility.cooldown_days=10").unwrap()];
        let err = AppConfig::load(None, &over).unwrap_err();
        assert!(matches!(err, DonorError::InvalidCooldown { value: 10, .. }));
    }

    #[test]
    fn zero_test_size_is_rejected() {
        let over = vec![parse_key_value("scoring.test_size=0").unwrap()];
        assert!(matches!(
            AppConfig::load(None, &over),
            Err(DonorError::Config(_))
        ));
    }

    #[test]
    fn setting_through_scalar_fails() {
        let over = vec![
            parse_key_value("roster=3").unwrap(),
            parse_key_value("roster.seed=1").unwrap(),
        ];
        assert!(AppConfig::load(None, &over).is_err());
    }

    #[test]
    fn parse_key_value_keeps_strings_and_parses_json() {
        let kv = parse_key_value("a.b = hello").unwrap();
        assert_eq!(kv, KeyValue::new("a.b", Value::String("hello".into())));
        let kv = parse_key_value("n=12").unwrap();
        assert_eq!(kv, KeyValue::new("n", Value::from(12)));
        assert!(parse_key_value("=1").is_err());
        assert!(parse_key_value("novalue").is_err());
    }

    #[test]
    fn max_features_resolution() {
        assert_eq!(MaxFeatures::Sqrt.resolve(4), 2);
        assert_eq!(MaxFeatures::Log2.resolve(4), 2);
        assert_eq!(MaxFeatures::All.resolve(4), 4);
        assert_eq!(MaxFeatures::Log2.resolve(1), 1);
    }

    #[test]
    fn schema_lists_sections() {
        let v = serde_json::to_value(AppConfig::schema()).unwrap();
        let props = v.get("properties").and_then(Value::as_object).unwrap();
        for k in ["scoring", "eligibility", "roster"] {
            assert!(props.contains_key(k), "missing {k}");
        }
    }
}
