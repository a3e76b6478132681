use crate::domain::RawEvent;

#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    NavigateUp,
    NavigateDown,
    NavigateTop,
    NavigateBottom,
    PageUp,
    PageDown,
    Back,

    // Vim chord
    EnterPendingG,

    // Timeline
    ToggleExpand,
    FacetLeft,
    FacetRight,
    ToggleFacetAtCursor,
    ToggleFacet(usize),
    ClearFilter,

    // UI
    OpenCommandInput,
    CloseOverlay,
    SubmitCommandInput(String),
    UpdateInputBuffer(String),
    ToggleHelp,

    // Data responses
    EventsLoaded(Vec<RawEvent>),

    // App control
    Refresh,
    Quit,
    Tick,
    Error(String),
}
