use std::collections::BTreeMap;
use std::time::Duration;

use crate::view_model::{AppViewModel, ControlView};
use crate::Preferences;

pub type ControlId = u64;

/// How long a successful auto save shows "Saved!" before reverting.
pub const SAVED_REVERT: Duration = Duration::from_secs(2);
/// How long a failed save shows "Error!" before reverting.
pub const ERROR_REVERT: Duration = Duration::from_secs(3);

/// Lifecycle of one injected save control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Idle,
    Saving,
    Saved,
    Error,
}

impl ControlState {
    pub fn label(self) -> &'static str {
        match self {
            ControlState::Idle => "Save",
            ControlState::Saving => "Saving...",
            ControlState::Saved => "Saved!",
            ControlState::Error => "Error!",
        }
    }

    /// The control accepts clicks only while idle; every other state keeps
    /// it disabled until the revert tick fires.
    pub fn enabled(self) -> bool {
        self == ControlState::Idle
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    prefs: Preferences,
    controls: BTreeMap<ControlId, ControlState>,
}

impl AppState {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            prefs,
            controls: BTreeMap::new(),
        }
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn control(&self, id: ControlId) -> Option<ControlState> {
        self.controls.get(&id).copied()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            controls: self
                .controls
                .iter()
                .map(|(&control_id, &state)| ControlView {
                    control_id,
                    label: state.label(),
                    enabled: state.enabled(),
                })
                .collect(),
        }
    }

    pub(crate) fn register_control(&mut self, id: ControlId) -> bool {
        if self.controls.contains_key(&id) {
            return false;
        }
        self.controls.insert(id, ControlState::Idle);
        true
    }

    pub(crate) fn set_control(&mut self, id: ControlId, state: ControlState) {
        self.controls.insert(id, state);
    }
}
