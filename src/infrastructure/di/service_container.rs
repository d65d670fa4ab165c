//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{GuideService, PathRecorder, PathReplayer, ResourceLoader};
use crate::config::Settings;
use crate::infrastructure::navigator::{CommandNavigator, Navigator};
use crate::infrastructure::store::{FileKeyValueStore, KeyValueStore};
use crate::infrastructure::traits::{
    CommandRunner, FileSystem, RealCommandRunner, RealFileSystem, Selector, SkimSelector,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,

    /// Storage for the recorded path
    pub store: Arc<dyn KeyValueStore>,

    /// Outbound navigation
    pub navigator: Arc<dyn Navigator>,

    /// Interactive selection
    pub selector: Arc<dyn Selector>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let cmd: Arc<dyn CommandRunner> = Arc::new(RealCommandRunner);
        let store = Arc::new(FileKeyValueStore::new(fs.clone(), settings.state_dir.clone()));
        let navigator = Arc::new(CommandNavigator::new(cmd.clone(), settings.opener.clone()));

        Self::with_deps(settings, fs, cmd, store, navigator, Arc::new(SkimSelector))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
        selector: Arc<dyn Selector>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            cmd,
            store,
            navigator,
            selector,
        }
    }

    /// Replace the navigator (e.g. print instead of open).
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn path_recorder(&self) -> PathRecorder {
        PathRecorder::new(
            self.store.clone(),
            self.navigator.clone(),
            self.settings.path_key.clone(),
        )
    }

    pub fn path_replayer(&self) -> PathReplayer {
        PathReplayer::new(self.store.clone(), self.settings.path_key.clone())
    }

    pub fn guide_service(&self) -> GuideService {
        GuideService::new(
            ResourceLoader::new(self.fs.clone()),
            Arc::new(self.path_recorder()),
            self.path_replayer(),
            self.settings.tree_path(),
            self.settings.recommendations_path(),
            self.settings.placeholder_url.clone(),
        )
    }
}
