use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Lowercased, trimmed form used for every categorical lookup.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_ascii_lowercase()
}

/// Multipliers keyed by a categorical label, with a fallback for labels not in the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorTable {
    pub factors: BTreeMap<String, f64>,
    pub fallback: f64,
}

impl FactorTable {
    pub fn new<I, K>(entries: I, fallback: f64) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let factors = entries
            .into_iter()
            .map(|(label, factor)| (normalize_label(label.as_ref()), factor))
            .collect();
        Self { factors, fallback }
    }

    pub fn factor(&self, label: &str) -> f64 {
        self.factors
            .get(&normalize_label(label))
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn is_known(&self, label: &str) -> bool {
        self.factors.contains_key(&normalize_label(label))
    }

    fn normalized(self) -> Self {
        Self::new(self.factors, self.fallback)
    }
}

/// Every constant the premium formula uses.
///
/// Thresholds are strict: a driver is "young" below `young_driver_age` and "senior" above
/// `senior_driver_age`; a vehicle is "older" above `older_vehicle_years` and "newer" below
/// `newer_vehicle_years`. Missing fields in a JSON table take the default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingTable {
    pub base_premium: f64,
    pub minimum_premium: f64,
    pub young_driver_age: u32,
    pub young_driver_factor: f64,
    pub senior_driver_age: u32,
    pub senior_driver_factor: f64,
    pub older_vehicle_years: i32,
    pub older_vehicle_factor: f64,
    pub newer_vehicle_years: i32,
    pub newer_vehicle_factor: f64,
    pub vehicle_types: FactorTable,
    pub driving_history: FactorTable,
    pub coverage_levels: FactorTable,
    pub accident_weight: f64,
    pub violation_weight: f64,
    pub safe_driver_factor: f64,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            base_premium: 100.0,
            minimum_premium: 30.0,
            young_driver_age: 25,
            young_driver_factor: 1.25,
            senior_driver_age: 65,
            senior_driver_factor: 1.15,
            older_vehicle_years: 10,
            older_vehicle_factor: 0.85,
            newer_vehicle_years: 3,
            newer_vehicle_factor: 1.1,
            vehicle_types: FactorTable::new(
                [("sedan", 1.0), ("suv", 1.15), ("truck", 1.2), ("van", 1.1)],
                1.05,
            ),
            driving_history: FactorTable::new(
                [("clean", 1.0), ("minor", 1.15), ("major", 1.4)],
                1.0,
            ),
            coverage_levels: FactorTable::new(
                [
                    ("basic", 1.0),
                    ("standard", 1.2),
                    ("full", 1.35),
                    ("premium", 1.5),
                ],
                1.0,
            ),
            accident_weight: 0.2,
            violation_weight: 0.1,
            safe_driver_factor: 0.85,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PricingTableError {
    #[error("pricing factor '{name}' must be a positive finite number, found {value}")]
    InvalidFactor { name: String, value: f64 },
    #[error("incident weight '{name}' must be a non-negative finite number, found {value}")]
    InvalidWeight { name: &'static str, value: f64 },
    #[error("safe driver factor must not exceed 1.0, found {0}")]
    SafeDriverSurcharge(f64),
    #[error("minimum premium must be a non-negative finite number, found {0}")]
    InvalidFloor(f64),
    #[error("young driver age {young} must not exceed senior driver age {senior}")]
    OverlappingAgeBrackets { young: u32, senior: u32 },
    #[error("newer vehicle threshold {newer} must not exceed older vehicle threshold {older}")]
    OverlappingVehicleAges { newer: i32, older: i32 },
    #[error("failed to read pricing table {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid pricing table JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl PricingTable {
    /// Parse a (possibly partial) JSON table and validate it.
    pub fn from_json(raw: &str) -> Result<Self, PricingTableError> {
        let table: PricingTable = serde_json::from_str(raw)?;
        let table = table.normalized();
        table.validate()?;
        Ok(table)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PricingTableError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| PricingTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<(), PricingTableError> {
        let scalars = [
            ("base_premium", self.base_premium),
            ("young_driver_factor", self.young_driver_factor),
            ("senior_driver_factor", self.senior_driver_factor),
            ("older_vehicle_factor", self.older_vehicle_factor),
            ("newer_vehicle_factor", self.newer_vehicle_factor),
            ("safe_driver_factor", self.safe_driver_factor),
        ];
        for (name, value) in scalars {
            check_factor(name, value)?;
        }

        for (table_name, table) in [
            ("vehicle_types", &self.vehicle_types),
            ("driving_history", &self.driving_history),
            ("coverage_levels", &self.coverage_levels),
        ] {
            check_factor(&format!("{table_name}.fallback"), table.fallback)?;
            for (label, value) in &table.factors {
                check_factor(&format!("{table_name}.{label}"), *value)?;
            }
        }

        for (name, value) in [
            ("accident_weight", self.accident_weight),
            ("violation_weight", self.violation_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PricingTableError::InvalidWeight { name, value });
            }
        }

        // Incidents must never lower the premium.
        if self.safe_driver_factor > 1.0 {
            return Err(PricingTableError::SafeDriverSurcharge(self.safe_driver_factor));
        }

        if !self.minimum_premium.is_finite() || self.minimum_premium < 0.0 {
            return Err(PricingTableError::InvalidFloor(self.minimum_premium));
        }

        if self.young_driver_age > self.senior_driver_age {
            return Err(PricingTableError::OverlappingAgeBrackets {
                young: self.young_driver_age,
                senior: self.senior_driver_age,
            });
        }

        if self.newer_vehicle_years > self.older_vehicle_years {
            return Err(PricingTableError::OverlappingVehicleAges {
                newer: self.newer_vehicle_years,
                older: self.older_vehicle_years,
            });
        }

        Ok(())
    }

    fn normalized(mut self) -> Self {
        self.vehicle_types = self.vehicle_types.normalized();
        self.driving_history = self.driving_history.normalized();
        self.coverage_levels = self.coverage_levels.normalized();
        self
    }
}

fn check_factor(name: &str, value: f64) -> Result<(), PricingTableError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PricingTableError::InvalidFactor {
            name: name.to_string(),
            value,
        })
    }
}
