pub mod race_viewer;

pub enum GuiEvent {
    Refresh,
}
