use std::sync::Once;

use saver_core::{
    update, AppState, ControlState, Effect, Msg, Preferences, SaveResultKind, StageResultKind,
    StorageMethod, ERROR_REVERT, SAVED_REVERT,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(saver_logging::initialize_for_tests);
}

fn state_with(storage_method: StorageMethod) -> AppState {
    let prefs = Preferences {
        storage_method,
        ..Preferences::default()
    };
    let state = AppState::new(prefs);
    let (state, effects) = update(state, Msg::ControlInjected { control_id: 1 });
    assert!(effects.is_empty());
    state
}

#[test]
fn click_on_idle_control_starts_auto_download() {
    init_logging();
    let state = state_with(StorageMethod::Auto);

    let (state, effects) = update(state, Msg::SaveClicked { control_id: 1 });

    assert_eq!(state.control(1), Some(ControlState::Saving));
    assert_eq!(effects, vec![Effect::RunAutoDownload { control_id: 1 }]);

    let view = state.view();
    assert_eq!(view.controls.len(), 1);
    assert_eq!(view.controls[0].label, "Saving...");
    assert!(!view.controls[0].enabled);
}

#[test]
fn click_dispatches_staging_when_prompt_is_preferred() {
    init_logging();
    let state = state_with(StorageMethod::Prompt);

    let (state, effects) = update(state, Msg::SaveClicked { control_id: 1 });

    assert_eq!(state.control(1), Some(ControlState::Saving));
    assert_eq!(effects, vec![Effect::StageDownload { control_id: 1 }]);
}

#[test]
fn click_while_saving_is_ignored() {
    init_logging();
    let state = state_with(StorageMethod::Auto);
    let (state, _) = update(state, Msg::SaveClicked { control_id: 1 });

    let (state, effects) = update(state, Msg::SaveClicked { control_id: 1 });

    assert_eq!(state.control(1), Some(ControlState::Saving));
    assert!(effects.is_empty());
}

#[test]
fn click_on_unknown_control_is_ignored() {
    init_logging();
    let state = state_with(StorageMethod::Auto);

    let (state, effects) = update(state, Msg::SaveClicked { control_id: 99 });

    assert_eq!(state.control(99), None);
    assert!(effects.is_empty());
}

#[test]
fn auto_success_shows_saved_and_schedules_revert() {
    init_logging();
    let state = state_with(StorageMethod::Auto);
    let (state, _) = update(state, Msg::SaveClicked { control_id: 1 });

    let (state, effects) = update(
        state,
        Msg::AutoDownloadFinished {
            control_id: 1,
            result: SaveResultKind::Archived,
        },
    );

    assert_eq!(state.control(1), Some(ControlState::Saved));
    assert_eq!(state.view().controls[0].label, "Saved!");
    assert_eq!(
        effects,
        vec![Effect::ScheduleRevert {
            control_id: 1,
            after: SAVED_REVERT,
        }]
    );
}

#[test]
fn auto_failure_shows_error_and_schedules_revert() {
    init_logging();
    let state = state_with(StorageMethod::Auto);
    let (state, _) = update(state, Msg::SaveClicked { control_id: 1 });

    let (state, effects) = update(
        state,
        Msg::AutoDownloadFinished {
            control_id: 1,
            result: SaveResultKind::Failed,
        },
    );

    assert_eq!(state.control(1), Some(ControlState::Error));
    assert_eq!(state.view().controls[0].label, "Error!");
    assert_eq!(
        effects,
        vec![Effect::ScheduleRevert {
            control_id: 1,
            after: ERROR_REVERT,
        }]
    );
}

#[test]
fn stage_acceptance_returns_control_to_idle_without_revert() {
    init_logging();
    let state = state_with(StorageMethod::Prompt);
    let (state, _) = update(state, Msg::SaveClicked { control_id: 1 });

    let (state, effects) = update(
        state,
        Msg::StageFinished {
            control_id: 1,
            result: StageResultKind::Accepted,
        },
    );

    assert_eq!(state.control(1), Some(ControlState::Idle));
    assert!(state.view().controls[0].enabled);
    assert!(effects.is_empty());
}

#[test]
fn stage_rejection_surfaces_transient_error() {
    init_logging();
    let state = state_with(StorageMethod::Prompt);
    let (state, _) = update(state, Msg::SaveClicked { control_id: 1 });

    let (state, effects) = update(
        state,
        Msg::StageFinished {
            control_id: 1,
            result: StageResultKind::Rejected,
        },
    );

    assert_eq!(state.control(1), Some(ControlState::Error));
    assert_eq!(
        effects,
        vec![Effect::ScheduleRevert {
            control_id: 1,
            after: ERROR_REVERT,
        }]
    );
}

#[test]
fn revert_elapsed_restores_idle_and_reenables() {
    init_logging();
    let state = state_with(StorageMethod::Auto);
    let (state, _) = update(state, Msg::SaveClicked { control_id: 1 });
    let (state, _) = update(
        state,
        Msg::AutoDownloadFinished {
            control_id: 1,
            result: SaveResultKind::Failed,
        },
    );

    let (state, effects) = update(state, Msg::RevertElapsed { control_id: 1 });

    assert_eq!(state.control(1), Some(ControlState::Idle));
    assert!(state.view().controls[0].enabled);
    assert!(effects.is_empty());

    // The control accepts a fresh click after recovering from the error.
    let (state, effects) = update(state, Msg::SaveClicked { control_id: 1 });
    assert_eq!(state.control(1), Some(ControlState::Saving));
    assert_eq!(effects.len(), 1);
}

#[test]
fn stale_revert_does_not_clobber_a_fresh_save() {
    init_logging();
    let state = state_with(StorageMethod::Auto);
    let (state, _) = update(state, Msg::SaveClicked { control_id: 1 });

    // Revert tick arriving while the control is busy must be a no-op.
    let (state, effects) = update(state, Msg::RevertElapsed { control_id: 1 });

    assert_eq!(state.control(1), Some(ControlState::Saving));
    assert!(effects.is_empty());
}

#[test]
fn duplicate_injection_keeps_existing_control_state() {
    init_logging();
    let state = state_with(StorageMethod::Auto);
    let (state, _) = update(state, Msg::SaveClicked { control_id: 1 });

    let (state, effects) = update(state, Msg::ControlInjected { control_id: 1 });

    assert_eq!(state.control(1), Some(ControlState::Saving));
    assert!(effects.is_empty());
}

#[test]
fn stale_completion_after_revert_is_ignored() {
    init_logging();
    let state = state_with(StorageMethod::Auto);

    let (state, effects) = update(
        state,
        Msg::AutoDownloadFinished {
            control_id: 1,
            result: SaveResultKind::Archived,
        },
    );

    assert_eq!(state.control(1), Some(ControlState::Idle));
    assert!(effects.is_empty());
}
