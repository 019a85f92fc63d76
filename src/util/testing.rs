use std::collections::HashMap;
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::infrastructure::traits::{Editor, FileSystem};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// In-memory filesystem for service tests.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.into(), content.into());
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .cloned()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.get(path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no such file: {}", path.display()))
        })
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.insert(path, content);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.get(path).is_some()
    }
}

/// Editor that records what it was shown and replaces it with fixed text.
pub struct ScriptedEditor {
    fs: Arc<dyn FileSystem>,
    replacement: Option<String>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedEditor {
    /// Editor that writes `replacement` over the opened file.
    pub fn replacing(fs: Arc<dyn FileSystem>, replacement: impl Into<String>) -> Self {
        Self {
            fs,
            replacement: Some(replacement.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Editor that leaves the opened file as it is.
    pub fn unchanged(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            replacement: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Contents of every file opened so far.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Editor for ScriptedEditor {
    fn open(&self, path: &Path) -> io::Result<()> {
        let current = self.fs.read_to_string(path)?;
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(current);
        if let Some(text) = &self.replacement {
            self.fs.write(path, text)?;
        }
        Ok(())
    }
}

/// Editor that always fails, like a non-zero editor exit.
#[derive(Debug, Default)]
pub struct FailingEditor;

impl Editor for FailingEditor {
    fn open(&self, _path: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "editor exited with status: 1"))
    }
}
