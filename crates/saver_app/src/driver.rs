use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context};
use saver_core::{
    update, AppState, ControlId, Effect, Msg, Preferences, SaveResultKind, StageResultKind,
};
use saver_engine::{
    resolve_group, DownloadOrchestrator, EngineEvent, EngineHandle, FetchSettings, GridDetector,
    HelperSession, JsonFileStagingStore, PageDom, ReqwestFetcher,
};
use saver_logging::{saver_error, saver_info, saver_warn};

use crate::cli::{FormatArg, StorageArg, ThemeArg};
use crate::prefs_file;

/// Parses the page snapshot, injects save controls and drives each one
/// through a full save, honoring the configured storage method.
pub fn run_save(
    page: &Path,
    out: &Path,
    staging: &Path,
    prefs: Preferences,
) -> anyhow::Result<()> {
    let html = fs::read_to_string(page)
        .with_context(|| format!("read page snapshot {:?}", page))?;
    let mut dom = PageDom::parse(&html);
    let scan_root = dom
        .descendant_elements(dom.root(), "body")
        .into_iter()
        .next()
        .unwrap_or_else(|| dom.root());

    let detector = GridDetector::new();
    let controls = detector.nodes_added(&mut dom, &[scan_root]);
    if controls.is_empty() {
        bail!("no qualifying anchor found in {:?}", page);
    }
    saver_info!("Injected {} save control(s)", controls.len());

    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::default())?);
    let store = Arc::new(JsonFileStagingStore::new(staging.to_path_buf()));
    let orchestrator = DownloadOrchestrator::new(fetcher, store, out.to_path_buf());
    let engine = EngineHandle::new(orchestrator);

    let mut state = AppState::new(prefs);
    let mut pending = 0usize;
    let mut reverts: Vec<(ControlId, Instant)> = Vec::new();

    for (index, &control) in controls.iter().enumerate() {
        let control_id = index as ControlId;
        let (next, _) = update(state, Msg::ControlInjected { control_id });
        state = next;
        let (next, effects) = update(state, Msg::SaveClicked { control_id });
        state = next;

        for effect in effects {
            match effect {
                Effect::RunAutoDownload { control_id } => match resolve_group(&dom, control) {
                    Ok(group) => {
                        engine.run_auto(control_id, group, state.prefs().format);
                        pending += 1;
                    }
                    Err(err) => {
                        saver_error!("Save aborted: {err}");
                        let msg = Msg::AutoDownloadFinished {
                            control_id,
                            result: SaveResultKind::Failed,
                        };
                        state = apply(state, msg, &mut reverts);
                    }
                },
                Effect::StageDownload { control_id } => match resolve_group(&dom, control) {
                    Ok(group) => {
                        engine.stage(control_id, group);
                        pending += 1;
                    }
                    Err(err) => {
                        saver_error!("Save aborted: {err}");
                        let msg = Msg::StageFinished {
                            control_id,
                            result: StageResultKind::Rejected,
                        };
                        state = apply(state, msg, &mut reverts);
                    }
                },
                Effect::ScheduleRevert { control_id, after } => {
                    reverts.push((control_id, Instant::now() + after));
                }
            }
        }
    }

    while pending > 0 {
        let Some(event) = engine.recv() else {
            saver_warn!("Engine stopped with {pending} save(s) still pending");
            break;
        };
        pending -= 1;
        let msg = match event {
            EngineEvent::AutoFinished { control_id, result } => {
                let result = match result {
                    Ok(path) => {
                        println!("Saved archive: {}", path.display());
                        SaveResultKind::Archived
                    }
                    Err(err) => {
                        saver_error!("Automatic save failed: {err}");
                        SaveResultKind::Failed
                    }
                };
                Msg::AutoDownloadFinished { control_id, result }
            }
            EngineEvent::StageFinished { control_id, result } => {
                let result = match result {
                    Ok(handoff) => {
                        println!(
                            "Staged for confirmation; run: sref_saver confirm \"{}\"",
                            handoff.helper_url
                        );
                        StageResultKind::Accepted
                    }
                    Err(err) => {
                        saver_error!("Staging failed: {err}");
                        StageResultKind::Rejected
                    }
                };
                Msg::StageFinished { control_id, result }
            }
        };
        state = apply(state, msg, &mut reverts);
    }

    for view in state.view().controls {
        saver_info!(
            "control {}: {} ({})",
            view.control_id,
            view.label,
            if view.enabled { "enabled" } else { "disabled" }
        );
    }

    // Let the transient "Saved!"/"Error!" labels run their course so the
    // machine ends idle, mirroring the on-page behavior.
    reverts.sort_by_key(|&(_, deadline)| deadline);
    for (control_id, deadline) in reverts {
        let now = Instant::now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        let (next, _) = update(state, Msg::RevertElapsed { control_id });
        state = next;
    }

    Ok(())
}

fn apply(state: AppState, msg: Msg, reverts: &mut Vec<(ControlId, Instant)>) -> AppState {
    let (state, effects) = update(state, msg);
    for effect in effects {
        if let Effect::ScheduleRevert { control_id, after } = effect {
            reverts.push((control_id, Instant::now() + after));
        }
    }
    state
}

/// Claims a staged request through its helper URL and confirms the
/// download, delivering the archive into `out`.
pub fn run_confirm(
    url: &str,
    out: &Path,
    staging: &Path,
    prefs: Preferences,
) -> anyhow::Result<()> {
    let store = JsonFileStagingStore::new(staging.to_path_buf());
    let fetcher = ReqwestFetcher::new(FetchSettings::default())?;

    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    runtime.block_on(async {
        let session = HelperSession::open(&store, url).await?;
        println!(
            "Confirming download of {} ({} images)",
            session.file_name(),
            session.request().images.len()
        );
        let path = session.confirm(&fetcher, prefs.format, out).await?;
        println!("Saved archive: {}", path.display());
        Ok(())
    })
}

/// Shows the stored preferences, persisting any overrides first.
pub fn run_prefs(
    path: &Path,
    prefs: Preferences,
    theme: Option<ThemeArg>,
    format: Option<FormatArg>,
    storage: Option<StorageArg>,
) -> anyhow::Result<()> {
    let mut prefs = prefs;
    let mut changed = false;
    if let Some(theme) = theme {
        prefs.theme = theme.into();
        changed = true;
    }
    if let Some(format) = format {
        prefs.format = format.into();
        changed = true;
    }
    if let Some(storage) = storage {
        prefs.storage_method = storage.into();
        changed = true;
    }
    if changed {
        prefs_file::save_preferences(path, &prefs)?;
    }

    println!("theme: {:?}", prefs.theme);
    println!("format: {:?}", prefs.format);
    println!("storage method: {:?}", prefs.storage_method);
    Ok(())
}
