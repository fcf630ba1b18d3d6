//! Scenario loading (TOML or JSON payloads), built-in presets, and input validation.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::dispatch::DispatchRequest;
use crate::plant::{Fuels, Unit};

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"powerplants[2].pmin"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Largest load or unit bound accepted, in MW.
pub const MAX_MW: f64 = 1e12;

/// The six-unit fleet shared by the `calm`, `windy` and `peaker` presets.
fn mixed_fleet() -> Vec<Unit> {
    vec![
        Unit::gas("gasfiredbig1", 0.53, 100.0, 460.0),
        Unit::gas("gasfiredbig2", 0.53, 100.0, 460.0),
        Unit::gas("gasfiredsomewhatsmaller", 0.37, 40.0, 210.0),
        Unit::turbojet("tj1", 0.3, 0.0, 16.0),
        Unit::wind("windpark1", 150.0),
        Unit::wind("windpark2", 36.0),
    ]
}

impl DispatchRequest {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["reference", "calm", "windy", "peaker"];

    /// One gas unit, one turbojet and one wind unit at 60% wind.
    pub fn reference() -> Self {
        Self::new(
            480.0,
            Fuels::new(13.4, 50.8, 20.0, 60.0),
            vec![
                Unit::gas("gas1", 0.53, 100.0, 460.0),
                Unit::turbojet("jet1", 0.3, 0.0, 100.0),
                Unit::wind("wind1", 100.0),
            ],
        )
    }

    /// Mixed fleet without wind; the second large gas unit must start at its
    /// minimum, pushing the first one back.
    pub fn calm() -> Self {
        Self::new(480.0, Fuels::new(13.4, 50.8, 20.0, 0.0), mixed_fleet())
    }

    /// Mixed fleet at 60% wind.
    pub fn windy() -> Self {
        Self::new(480.0, Fuels::new(13.4, 50.8, 20.0, 60.0), mixed_fleet())
    }

    /// Mixed fleet at 60% wind, loaded close enough to capacity that the
    /// turbojet has to run.
    pub fn peaker() -> Self {
        Self::new(1250.0, Fuels::new(13.4, 50.8, 20.0, 60.0), mixed_fleet())
    }

    /// Loads a request from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "reference" => Ok(Self::reference()),
            "calm" => Ok(Self::calm()),
            "windy" => Ok(Self::windy()),
            "peaker" => Ok(Self::peaker()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Loads a request from a file, as JSON for `.json` files and as TOML
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Parses a request from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Parses a request from a production-plan JSON payload.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the JSON is invalid or contains unknown fields.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::new("json", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the request is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !self.load.is_finite() || self.load < 0.0 {
            errors.push(ConfigError::new("load", "must be a finite number >= 0"));
        } else if self.load > MAX_MW {
            errors.push(ConfigError::new("load", format!("must be <= {MAX_MW:e} MW")));
        }

        let fuels = &self.fuels;
        let prices = [
            ("fuels.gas(euro/MWh)", fuels.gas_euro_per_mwh),
            ("fuels.kerosine(euro/MWh)", fuels.kerosine_euro_per_mwh),
            ("fuels.co2(euro/ton)", fuels.co2_euro_per_ton),
        ];
        for (field, price) in prices {
            if !price.is_finite() || price < 0.0 {
                errors.push(ConfigError::new(field, "must be a finite number >= 0"));
            }
        }
        if !(0.0..=100.0).contains(&fuels.wind_pct) {
            errors.push(ConfigError::new("fuels.wind(%)", "must be in [0, 100]"));
        }

        if self.powerplants.is_empty() {
            errors.push(ConfigError::new("powerplants", "must not be empty"));
        }

        let mut seen = HashSet::new();
        for (i, unit) in self.powerplants.iter().enumerate() {
            let field = |name: &str| format!("powerplants[{i}].{name}");

            if unit.name.trim().is_empty() {
                errors.push(ConfigError::new(field("name"), "must not be empty"));
            } else if !seen.insert(unit.name.as_str()) {
                errors.push(ConfigError::new(
                    field("name"),
                    format!("duplicate name \"{}\"", unit.name),
                ));
            }
            if !unit.pmin.is_finite() || unit.pmin < 0.0 {
                errors.push(ConfigError::new(field("pmin"), "must be a finite number >= 0"));
            }
            if !unit.pmax.is_finite() || unit.pmax < 0.0 {
                errors.push(ConfigError::new(field("pmax"), "must be a finite number >= 0"));
            } else if unit.pmax > MAX_MW {
                errors.push(ConfigError::new(field("pmax"), format!("must be <= {MAX_MW:e} MW")));
            } else if unit.pmin > unit.pmax {
                errors.push(ConfigError::new(field("pmin"), "must be <= pmax"));
            }
            if unit.kind.is_thermal() && !(unit.efficiency.is_finite() && unit.efficiency > 0.0)
            {
                errors.push(ConfigError::new(
                    field("efficiency"),
                    format!("must be > 0 for {} units", unit.kind),
                ));
            }
        }

        errors
    }
}
