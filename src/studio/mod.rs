pub mod compose;
pub mod history;
pub mod metadata;
pub mod settings;
pub mod state;

pub use state::{Action, ActionError, Mode, StudioState};
