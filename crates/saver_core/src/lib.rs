//! Saver core: pure state machine for the injected save control.
mod effect;
mod msg;
mod prefs;
mod sref;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{Msg, SaveResultKind, StageResultKind};
pub use prefs::{ImageFormat, Preferences, StorageMethod, Theme};
pub use sref::{extract_sref, SrefCode, SrefError};
pub use state::{AppState, ControlId, ControlState, ERROR_REVERT, SAVED_REVERT};
pub use update::update;
pub use view_model::{AppViewModel, ControlView};
