use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Resolve the control's style group and run the automatic
    /// fetch/convert/archive path.
    RunAutoDownload { control_id: crate::ControlId },
    /// Resolve the control's style group and hand the request to the
    /// staging broker.
    StageDownload { control_id: crate::ControlId },
    /// Deliver `Msg::RevertElapsed` for the control after the delay.
    ScheduleRevert {
        control_id: crate::ControlId,
        after: Duration,
    },
}
