use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::studio::StudioState;

#[derive(Clone)]
pub struct AppState {
    pub studio: Arc<Mutex<StudioState>>,
    pub output_dir: PathBuf,
}

impl AppState {
    pub fn new(output_dir: PathBuf) -> Self {
        AppState {
            studio: Arc::new(Mutex::new(StudioState::default())),
            output_dir,
        }
    }
}
