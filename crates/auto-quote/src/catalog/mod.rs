//! Static vehicle reference data and the type → make → model filter built on it.
//!
//! A model is offered for a type only when both the model and its make support that type. How a
//! model's own type list is matched is controlled by [`TypeMatchPolicy`].

pub mod loader;
mod selection;
mod standard;

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use loader::CatalogLoadError;
pub use selection::{SelectionField, SelectionOptions, SelectionState, SelectionTransition};

/// Body style offered in the first dropdown (sedan, suv, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleType {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleMake {
    pub id: String,
    pub name: String,
    pub supported_types: BTreeSet<String>,
}

/// Inclusive range of model years. A missing `end` means the model is still in production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i32>,
}

impl YearRange {
    pub const fn since(start: i32) -> Self {
        Self { start, end: None }
    }

    pub const fn between(start: i32, end: i32) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn contains(self, year: i32) -> bool {
        year >= self.start && self.end.map_or(true, |end| year <= end)
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}-{}", self.start, end),
            None => write!(f, "{}-present", self.start),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleModel {
    pub id: String,
    pub name: String,
    pub make_id: String,
    pub supported_types: BTreeSet<String>,
    pub years: YearRange,
}

/// How a model's supported types are compared against the requested type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeMatchPolicy {
    /// The requested type is one of the model's supported types.
    #[default]
    Includes,
    /// The model supports the requested type and nothing else.
    Exclusive,
}

impl TypeMatchPolicy {
    pub fn matches(self, supported: &BTreeSet<String>, type_id: &str) -> bool {
        match self {
            TypeMatchPolicy::Includes => supported.contains(type_id),
            TypeMatchPolicy::Exclusive => supported.len() == 1 && supported.contains(type_id),
        }
    }
}

/// Referential problems detected while assembling a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("vehicle type '{0}' is defined more than once")]
    DuplicateType(String),
    #[error("make '{0}' is defined more than once")]
    DuplicateMake(String),
    #[error("model '{model_id}' is defined more than once for make '{make_id}'")]
    DuplicateModel { make_id: String, model_id: String },
    #[error("model '{model_id}' references unknown make '{make_id}'")]
    UnknownMake { model_id: String, make_id: String },
    #[error("'{owner}' references unknown vehicle type '{type_id}'")]
    UnknownType { owner: String, type_id: String },
    #[error("model '{model_id}' has an inverted year range {start}-{end}")]
    InvalidYearRange {
        model_id: String,
        start: i32,
        end: i32,
    },
}

/// Immutable type/make/model reference tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleCatalog {
    types: Vec<VehicleType>,
    makes: Vec<VehicleMake>,
    models: Vec<VehicleModel>,
    policy: TypeMatchPolicy,
}

impl VehicleCatalog {
    /// Assemble a catalog, rejecting dangling references and duplicate ids.
    pub fn new(
        types: Vec<VehicleType>,
        makes: Vec<VehicleMake>,
        models: Vec<VehicleModel>,
        policy: TypeMatchPolicy,
    ) -> Result<Self, CatalogError> {
        let mut type_ids = HashSet::new();
        for vehicle_type in &types {
            if !type_ids.insert(vehicle_type.id.as_str()) {
                return Err(CatalogError::DuplicateType(vehicle_type.id.clone()));
            }
        }

        let mut make_ids = HashSet::new();
        for make in &makes {
            if !make_ids.insert(make.id.as_str()) {
                return Err(CatalogError::DuplicateMake(make.id.clone()));
            }
            check_types(&type_ids, &make.id, &make.supported_types)?;
        }

        let mut model_keys = HashSet::new();
        for model in &models {
            if !make_ids.contains(model.make_id.as_str()) {
                return Err(CatalogError::UnknownMake {
                    model_id: model.id.clone(),
                    make_id: model.make_id.clone(),
                });
            }
            if !model_keys.insert((model.make_id.as_str(), model.id.as_str())) {
                return Err(CatalogError::DuplicateModel {
                    make_id: model.make_id.clone(),
                    model_id: model.id.clone(),
                });
            }
            if let Some(end) = model.years.end.filter(|end| *end < model.years.start) {
                return Err(CatalogError::InvalidYearRange {
                    model_id: model.id.clone(),
                    start: model.years.start,
                    end,
                });
            }
            check_types(&type_ids, &model.id, &model.supported_types)?;
        }

        Ok(Self {
            types,
            makes,
            models,
            policy,
        })
    }

    /// The built-in catalog shipped with the quote form.
    pub fn standard() -> Self {
        standard::catalog()
    }

    pub fn with_policy(mut self, policy: TypeMatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> TypeMatchPolicy {
        self.policy
    }

    pub fn types(&self) -> &[VehicleType] {
        &self.types
    }

    pub fn makes(&self) -> &[VehicleMake] {
        &self.makes
    }

    pub fn vehicle_type(&self, type_id: &str) -> Option<&VehicleType> {
        self.types.iter().find(|vehicle_type| vehicle_type.id == type_id)
    }

    pub fn make(&self, make_id: &str) -> Option<&VehicleMake> {
        self.makes.iter().find(|make| make.id == make_id)
    }

    pub fn model(&self, make_id: &str, model_id: &str) -> Option<&VehicleModel> {
        self.models
            .iter()
            .find(|model| model.make_id == make_id && model.id == model_id)
    }

    /// Every model belonging to the make, regardless of type.
    pub fn all_models_of(&self, make_id: &str) -> Vec<&VehicleModel> {
        self.models
            .iter()
            .filter(|model| model.make_id == make_id)
            .collect()
    }

    /// Makes offering at least one model selectable for `type_id`.
    pub fn makes_for_type(&self, type_id: &str) -> Vec<&VehicleMake> {
        if type_id.trim().is_empty() {
            return Vec::new();
        }

        let makes: Vec<&VehicleMake> = self
            .makes
            .iter()
            .filter(|make| {
                self.models
                    .iter()
                    .any(|model| model.make_id == make.id && self.offers(make, model, type_id))
            })
            .collect();

        debug!(
            type_id,
            policy = ?self.policy,
            makes = makes.len(),
            "filtered makes for vehicle type"
        );
        makes
    }

    /// Models of `make_id` selectable for `type_id`; empty when either key is unknown.
    pub fn models_for_make_and_type(&self, make_id: &str, type_id: &str) -> Vec<&VehicleModel> {
        if make_id.trim().is_empty() || type_id.trim().is_empty() {
            return Vec::new();
        }
        let Some(make) = self.make(make_id) else {
            return Vec::new();
        };

        let models: Vec<&VehicleModel> = self
            .models
            .iter()
            .filter(|model| model.make_id == make.id && self.offers(make, model, type_id))
            .collect();

        debug!(
            make_id,
            type_id,
            models = models.len(),
            "filtered models for make and type"
        );
        models
    }

    /// Whether the type/make/model triple is a valid selection.
    pub fn is_selectable(&self, type_id: &str, make_id: &str, model_id: &str) -> bool {
        match (self.make(make_id), self.model(make_id, model_id)) {
            (Some(make), Some(model)) => self.offers(make, model, type_id),
            _ => false,
        }
    }

    pub fn year_range(&self, make_id: &str, model_id: &str) -> Option<YearRange> {
        self.model(make_id, model_id).map(|model| model.years)
    }

    fn offers(&self, make: &VehicleMake, model: &VehicleModel, type_id: &str) -> bool {
        make.supported_types.contains(type_id)
            && self.policy.matches(&model.supported_types, type_id)
    }

    pub(crate) fn from_parts(
        types: Vec<VehicleType>,
        makes: Vec<VehicleMake>,
        models: Vec<VehicleModel>,
    ) -> Self {
        Self {
            types,
            makes,
            models,
            policy: TypeMatchPolicy::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn into_parts(self) -> (Vec<VehicleType>, Vec<VehicleMake>, Vec<VehicleModel>) {
        (self.types, self.makes, self.models)
    }
}

impl Default for VehicleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn check_types(
    known: &HashSet<&str>,
    owner: &str,
    supported: &BTreeSet<String>,
) -> Result<(), CatalogError> {
    match supported
        .iter()
        .find(|type_id| !known.contains(type_id.as_str()))
    {
        Some(type_id) => Err(CatalogError::UnknownType {
            owner: owner.to_string(),
            type_id: type_id.clone(),
        }),
        None => Ok(()),
    }
}
