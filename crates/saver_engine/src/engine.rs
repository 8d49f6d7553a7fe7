use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use saver_core::{ControlId, ImageFormat};

use crate::broker::HelperHandoff;
use crate::orchestrate::DownloadOrchestrator;
use crate::resolve::StyleGroup;

enum EngineCommand {
    RunAuto {
        control_id: ControlId,
        group: StyleGroup,
        format: ImageFormat,
    },
    Stage {
        control_id: ControlId,
        group: StyleGroup,
    },
}

/// Completion notifications from the engine worker. Errors are flattened
/// to their display form; the state machine only needs success/failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    AutoFinished {
        control_id: ControlId,
        result: Result<PathBuf, String>,
    },
    StageFinished {
        control_id: ControlId,
        result: Result<HelperHandoff, String>,
    },
}

/// Handle to a worker thread that owns the async runtime. Commands go in
/// over one channel, completion events come back over another, so the
/// synchronous caller never blocks on network IO.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(orchestrator: DownloadOrchestrator) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let orchestrator = Arc::new(orchestrator);

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let orchestrator = orchestrator.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(orchestrator.as_ref(), command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn run_auto(&self, control_id: ControlId, group: StyleGroup, format: ImageFormat) {
        let _ = self.cmd_tx.send(EngineCommand::RunAuto {
            control_id,
            group,
            format,
        });
    }

    pub fn stage(&self, control_id: ControlId, group: StyleGroup) {
        let _ = self.cmd_tx.send(EngineCommand::Stage { control_id, group });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next event arrives. Returns `None` once the
    /// worker thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

async fn handle_command(
    orchestrator: &DownloadOrchestrator,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::RunAuto {
            control_id,
            group,
            format,
        } => {
            let result = orchestrator
                .run_auto(&group, format)
                .await
                .map_err(|err| err.to_string());
            let _ = event_tx.send(EngineEvent::AutoFinished { control_id, result });
        }
        EngineCommand::Stage { control_id, group } => {
            let result = orchestrator
                .run_prompted(&group)
                .await
                .map_err(|err| err.to_string());
            let _ = event_tx.send(EngineEvent::StageFinished { control_id, result });
        }
    }
}
