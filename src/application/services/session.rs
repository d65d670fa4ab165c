//! Page sessions: a loaded tree with its initial visibility, driven by clicks.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::services::{
    ClickOutcome, InteractionController, PathRecorder, PathReplayer, ReplayedPath,
    ResourceLoader, Resources,
};
use crate::application::ApplicationResult;
use crate::domain::{
    resolve, DecisionTree, InitPolicy, Mode, NodeId, PathMembershipSet, RecommendationRecord,
    RecommendationView, RenderFrame, TreeBuilder,
};

/// State of one page: the tree, its visibility, and the replayed path.
pub struct Session {
    tree: DecisionTree,
    records: Vec<RecommendationRecord>,
    replayed: ReplayedPath,
    controller: InteractionController,
}

impl Session {
    /// Entry page: first decision layer visible, nothing highlighted.
    pub fn entry(resources: Resources, controller: InteractionController) -> Self {
        let mut tree = TreeBuilder::new().build(&resources.document);
        tree.apply_policy(InitPolicy::CollapseBelowRoot);
        Self {
            tree,
            records: resources.records,
            replayed: ReplayedPath::default(),
            controller,
        }
    }

    /// Replay page: only the recorded path is open and highlighted.
    pub fn replay(
        resources: Resources,
        controller: InteractionController,
        replayed: ReplayedPath,
    ) -> Self {
        let mut tree = TreeBuilder::new().build(&resources.document);
        tree.apply_policy(InitPolicy::ExpandAlongPath(&replayed.members));
        Self {
            tree,
            records: resources.records,
            replayed,
            controller,
        }
    }

    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    pub fn replayed(&self) -> &ReplayedPath {
        &self.replayed
    }

    pub fn members(&self) -> &PathMembershipSet {
        &self.replayed.members
    }

    pub fn click(&mut self, id: NodeId) -> ApplicationResult<ClickOutcome> {
        self.controller.click(&mut self.tree, id)
    }

    /// Current visible structure for the rendering collaborator.
    pub fn frame(&self, focus: Option<NodeId>) -> RenderFrame {
        RenderFrame::capture(
            &self.tree,
            self.mode(),
            &self.replayed.members,
            self.controller.placeholder(),
            focus,
        )
    }

    /// Recommendations for the replayed terminal node. Empty on the entry
    /// page, without a recorded path, or for a stale terminal id.
    pub fn recommendations(&self) -> Vec<RecommendationView> {
        match (self.mode(), self.replayed.terminal()) {
            (Mode::Replay, Some(terminal)) => resolve(terminal, &self.tree, &self.records),
            _ => Vec::new(),
        }
    }
}

/// Opens page sessions from the configured resources.
pub struct GuideService {
    loader: ResourceLoader,
    recorder: Arc<PathRecorder>,
    replayer: PathReplayer,
    tree_path: PathBuf,
    recommendations_path: PathBuf,
    placeholder: String,
}

impl GuideService {
    pub fn new(
        loader: ResourceLoader,
        recorder: Arc<PathRecorder>,
        replayer: PathReplayer,
        tree_path: PathBuf,
        recommendations_path: PathBuf,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            loader,
            recorder,
            replayer,
            tree_path,
            recommendations_path,
            placeholder: placeholder.into(),
        }
    }

    /// Load both resources and set up the page for `mode`.
    #[instrument(level = "debug", skip(self))]
    pub fn open(&self, mode: Mode) -> ApplicationResult<Session> {
        let resources = self.loader.load(&self.tree_path, &self.recommendations_path)?;
        let controller =
            InteractionController::new(mode, self.placeholder.clone(), self.recorder.clone());
        let session = match mode {
            Mode::Entry => Session::entry(resources, controller),
            Mode::Replay => {
                let replayed = self.replayer.replay();
                info!("open: replaying {}", replayed.path);
                Session::replay(resources, controller, replayed)
            }
        };
        debug!("open: {} nodes loaded", session.tree().len());
        Ok(session)
    }
}
