//! Service container for dependency injection
//!
//! Wires up services with their dependencies.

use std::sync::Arc;

use crate::application::services::BlockService;
use crate::config::Settings;
use crate::infrastructure::traits::{CommandEditor, Editor, FileSystem, RealFileSystem};

/// Container holding settings and the I/O implementations services run on.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Editor used for interactive outline editing
    pub editor: Arc<dyn Editor>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let editor = Arc::new(CommandEditor::new(settings.editor.clone()));
        Self::with_deps(settings, Arc::new(RealFileSystem), editor)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>, editor: Arc<dyn Editor>) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            editor,
        }
    }

    /// Block service configured with the current block defaults.
    pub fn block_service(&self) -> BlockService {
        BlockService::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.editor),
            self.settings.block_defaults(),
        )
    }
}
