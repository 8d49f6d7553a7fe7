/// Outcome of an automatic download run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResultKind {
    Archived,
    Failed,
}

/// Outcome of handing a request to the staging broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageResultKind {
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The detector injected a new save control next to an anchor.
    ControlInjected { control_id: crate::ControlId },
    /// User clicked an injected control.
    SaveClicked { control_id: crate::ControlId },
    /// Engine finished the automatic archive path.
    AutoDownloadFinished {
        control_id: crate::ControlId,
        result: SaveResultKind,
    },
    /// Broker responded to a staging request.
    StageFinished {
        control_id: crate::ControlId,
        result: StageResultKind,
    },
    /// A scheduled revert delay elapsed for a control.
    RevertElapsed { control_id: crate::ControlId },
}
