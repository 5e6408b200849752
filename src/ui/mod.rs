/// Presentation layer: egui widgets over the pipeline outcome.
///
/// Nothing here filters or counts; it reads `AppState` and forwards
/// control changes back through the state setters.

pub mod charts;
pub mod panels;
