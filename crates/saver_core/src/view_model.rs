use crate::ControlId;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub controls: Vec<ControlView>,
}

/// Render-ready snapshot of one injected control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub control_id: ControlId,
    pub label: &'static str,
    pub enabled: bool,
}
