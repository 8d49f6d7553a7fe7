use crate::{
    AppState, ControlState, Effect, Msg, SaveResultKind, StageResultKind, StorageMethod,
    ERROR_REVERT, SAVED_REVERT,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ControlInjected { control_id } => {
            state.register_control(control_id);
            Vec::new()
        }
        Msg::SaveClicked { control_id } => {
            match state.control(control_id) {
                // Unknown control or a control that is busy; the button is
                // disabled outside Idle, so a stray click is ignored.
                None => Vec::new(),
                Some(ControlState::Saving)
                | Some(ControlState::Saved)
                | Some(ControlState::Error) => Vec::new(),
                Some(ControlState::Idle) => {
                    state.set_control(control_id, ControlState::Saving);
                    // The dual path is decided exactly once per click.
                    let effect = match state.prefs().storage_method {
                        StorageMethod::Auto => Effect::RunAutoDownload { control_id },
                        StorageMethod::Prompt => Effect::StageDownload { control_id },
                    };
                    vec![effect]
                }
            }
        }
        Msg::AutoDownloadFinished { control_id, result } => {
            if state.control(control_id) != Some(ControlState::Saving) {
                return (state, Vec::new());
            }
            match result {
                SaveResultKind::Archived => {
                    state.set_control(control_id, ControlState::Saved);
                    vec![Effect::ScheduleRevert {
                        control_id,
                        after: SAVED_REVERT,
                    }]
                }
                SaveResultKind::Failed => {
                    state.set_control(control_id, ControlState::Error);
                    vec![Effect::ScheduleRevert {
                        control_id,
                        after: ERROR_REVERT,
                    }]
                }
            }
        }
        Msg::StageFinished { control_id, result } => {
            if state.control(control_id) != Some(ControlState::Saving) {
                return (state, Vec::new());
            }
            match result {
                // The helper session takes over from here; the control goes
                // straight back to idle with no "Saved!" flash.
                StageResultKind::Accepted => {
                    state.set_control(control_id, ControlState::Idle);
                    Vec::new()
                }
                StageResultKind::Rejected => {
                    state.set_control(control_id, ControlState::Error);
                    vec![Effect::ScheduleRevert {
                        control_id,
                        after: ERROR_REVERT,
                    }]
                }
            }
        }
        Msg::RevertElapsed { control_id } => {
            match state.control(control_id) {
                Some(ControlState::Saved) | Some(ControlState::Error) => {
                    state.set_control(control_id, ControlState::Idle);
                }
                // A revert racing a fresh click must not clobber Saving.
                _ => {}
            }
            Vec::new()
        }
    };

    (state, effects)
}
