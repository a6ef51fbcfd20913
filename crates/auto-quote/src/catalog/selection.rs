use serde::{Deserialize, Serialize};

use super::{VehicleCatalog, VehicleMake, VehicleModel};

/// Partial type → make → model selection held by a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub vehicle_make: Option<String>,
    #[serde(default)]
    pub vehicle_model: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionField {
    VehicleType,
    VehicleMake,
    VehicleModel,
}

/// Result of applying one change: the new state and the fields that were cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionTransition {
    pub state: SelectionState,
    pub invalidated: Vec<SelectionField>,
}

/// Choices available for the next dropdowns given a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionOptions<'a> {
    pub makes: Vec<&'a VehicleMake>,
    pub models: Vec<&'a VehicleModel>,
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl VehicleCatalog {
    /// Select a new type, clearing a make or model that the type no longer allows.
    pub fn on_type_change(
        &self,
        current: &SelectionState,
        type_id: Option<&str>,
    ) -> SelectionTransition {
        let mut state = current.clone();
        state.vehicle_type = normalized(type_id);
        let mut invalidated = Vec::new();

        let make_valid = match (state.vehicle_type.as_deref(), state.vehicle_make.as_deref()) {
            (Some(type_id), Some(make_id)) => self
                .makes_for_type(type_id)
                .iter()
                .any(|make| make.id == make_id),
            (_, None) => true,
            (None, Some(_)) => false,
        };
        if !make_valid {
            state.vehicle_make = None;
            invalidated.push(SelectionField::VehicleMake);
        }

        if !self.model_still_valid(&state) {
            state.vehicle_model = None;
            invalidated.push(SelectionField::VehicleModel);
        }

        SelectionTransition { state, invalidated }
    }

    /// Select a new make, clearing a model that is not offered for (make, type).
    pub fn on_make_change(
        &self,
        current: &SelectionState,
        make_id: Option<&str>,
    ) -> SelectionTransition {
        let mut state = current.clone();
        state.vehicle_make = normalized(make_id);
        let mut invalidated = Vec::new();

        if !self.model_still_valid(&state) {
            state.vehicle_model = None;
            invalidated.push(SelectionField::VehicleModel);
        }

        SelectionTransition { state, invalidated }
    }

    /// Select a model; nothing downstream depends on it.
    pub fn on_model_change(
        &self,
        current: &SelectionState,
        model_id: Option<&str>,
    ) -> SelectionTransition {
        let mut state = current.clone();
        state.vehicle_model = normalized(model_id);
        SelectionTransition {
            state,
            invalidated: Vec::new(),
        }
    }

    pub fn selection_options(&self, state: &SelectionState) -> SelectionOptions<'_> {
        let makes = state
            .vehicle_type
            .as_deref()
            .map(|type_id| self.makes_for_type(type_id))
            .unwrap_or_default();
        let models = match (state.vehicle_type.as_deref(), state.vehicle_make.as_deref()) {
            (Some(type_id), Some(make_id)) => self.models_for_make_and_type(make_id, type_id),
            _ => Vec::new(),
        };
        SelectionOptions { makes, models }
    }

    fn model_still_valid(&self, state: &SelectionState) -> bool {
        match (
            state.vehicle_type.as_deref(),
            state.vehicle_make.as_deref(),
            state.vehicle_model.as_deref(),
        ) {
            (_, _, None) => true,
            (Some(type_id), Some(make_id), Some(model_id)) => {
                self.is_selectable(type_id, make_id, model_id)
            }
            _ => false,
        }
    }
}
