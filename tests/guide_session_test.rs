//! End-to-end tests: entry page walk, path recording, replay page.

use std::path::PathBuf;
use std::sync::Arc;

use decision_guide::application::services::{ClickOutcome, GuideService};
use decision_guide::application::ApplicationError;
use decision_guide::config::Settings;
use decision_guide::domain::{DomainError, Mode, NodeId, TreeDocument};
use decision_guide::infrastructure::di::ServiceContainer;
use decision_guide::infrastructure::navigator::RecordingNavigator;
use decision_guide::infrastructure::store::{KeyValueStore, MemoryKeyValueStore};
use decision_guide::infrastructure::traits::{RealCommandRunner, RealFileSystem, SkimSelector};
use decision_guide::util::testing;

struct Harness {
    store: Arc<MemoryKeyValueStore>,
    navigator: Arc<RecordingNavigator>,
    service: GuideService,
}

fn harness() -> Harness {
    testing::init_test_setup();
    let settings = Settings {
        data_dir: PathBuf::from("tests/resources/guide"),
        ..Settings::default()
    };
    let store = Arc::new(MemoryKeyValueStore::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let container = ServiceContainer::with_deps(
        settings,
        Arc::new(RealFileSystem),
        Arc::new(RealCommandRunner),
        store.clone(),
        navigator.clone(),
        Arc::new(SkimSelector),
    );
    Harness {
        service: container.guide_service(),
        store,
        navigator,
    }
}

fn visible(session: &decision_guide::application::services::Session) -> Vec<usize> {
    session.frame(None).nodes.iter().map(|n| n.id.0).collect()
}

fn ids(raw: &[usize]) -> Vec<NodeId> {
    raw.iter().copied().map(NodeId).collect()
}

// ============================================================
// Entry page
// ============================================================

#[test]
fn given_entry_page_when_opened_then_only_first_decision_layer_is_visible() {
    let h = harness();
    let session = h.service.open(Mode::Entry).unwrap();

    assert_eq!(visible(&session), vec![0, 1, 5]);
    assert!(session.frame(None).highlighted_ids().is_empty());
    assert!(session.recommendations().is_empty());
}

#[test]
fn given_branch_when_clicked_then_toggles_and_refocuses() {
    let h = harness();
    let mut session = h.service.open(Mode::Entry).unwrap();

    let outcome = session.click(NodeId(1)).unwrap();

    assert_eq!(
        outcome,
        ClickOutcome::Toggled {
            node: NodeId(1),
            expanded: true
        }
    );
    assert_eq!(visible(&session), vec![0, 1, 2, 5]);
}

#[test]
fn given_branch_when_clicked_twice_then_returns_to_collapsed() {
    let h = harness();
    let mut session = h.service.open(Mode::Entry).unwrap();

    session.click(NodeId(1)).unwrap();
    let second = session.click(NodeId(1)).unwrap();

    assert_eq!(
        second,
        ClickOutcome::Toggled {
            node: NodeId(1),
            expanded: false
        }
    );
    assert_eq!(visible(&session), vec![0, 1, 5]);
}

#[test]
fn given_placeholder_url_when_clicked_then_toggles_instead_of_navigating() {
    let h = harness();
    let mut session = h.service.open(Mode::Entry).unwrap();
    session.click(NodeId(1)).unwrap();

    let outcome = session.click(NodeId(2)).unwrap();

    assert!(matches!(outcome, ClickOutcome::Toggled { expanded: true, .. }));
    assert!(h.navigator.visited().is_empty());
    assert_eq!(visible(&session), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn given_terminal_when_clicked_then_records_path_and_navigates() {
    let h = harness();
    let mut session = h.service.open(Mode::Entry).unwrap();
    session.click(NodeId(1)).unwrap();
    session.click(NodeId(2)).unwrap();

    let outcome = session.click(NodeId(3)).unwrap();

    match outcome {
        ClickOutcome::Navigated { url, path } => {
            assert_eq!(url, "recommendations.html");
            assert_eq!(path.ids(), ids(&[0, 1, 2, 3]).as_slice());
        }
        other => panic!("expected navigation, got {other:?}"),
    }
    assert_eq!(h.navigator.visited(), vec!["recommendations.html".to_string()]);
    assert_eq!(
        h.store.get("decisionPath").unwrap().as_deref(),
        Some("[0,1,2,3]")
    );
}

#[test]
fn given_second_terminal_click_when_recording_then_overwrites_previous_path() {
    let h = harness();
    let mut session = h.service.open(Mode::Entry).unwrap();
    session.click(NodeId(5)).unwrap();

    let mut session = h.service.open(Mode::Entry).unwrap();
    session.click(NodeId(1)).unwrap();
    session.click(NodeId(2)).unwrap();
    session.click(NodeId(4)).unwrap();

    assert_eq!(
        h.store.get("decisionPath").unwrap().as_deref(),
        Some("[0,1,2,4]")
    );
}

#[test]
fn given_hidden_node_when_clicked_then_rejected() {
    let h = harness();
    let mut session = h.service.open(Mode::Entry).unwrap();

    let err = session.click(NodeId(3)).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NodeNotVisible(NodeId(3)))
    ));
    assert!(h.navigator.visited().is_empty());
}

#[test]
fn given_unknown_node_when_clicked_then_rejected() {
    let h = harness();
    let mut session = h.service.open(Mode::Entry).unwrap();

    let err = session.click(NodeId(77)).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::UnknownNode(NodeId(77)))
    ));
}

// ============================================================
// Replay page
// ============================================================

#[test]
fn given_recorded_path_when_replaying_then_path_is_open_and_highlighted() {
    let h = harness();
    let mut entry = h.service.open(Mode::Entry).unwrap();
    for id in [1, 2, 3] {
        entry.click(NodeId(id)).unwrap();
    }

    let replay = h.service.open(Mode::Replay).unwrap();
    let frame = replay.frame(None);

    assert_eq!(replay.members().len(), 4);
    assert_eq!(frame.highlighted_ids(), ids(&[0, 1, 2, 3]));
    assert_eq!(visible(&replay), vec![0, 1, 2, 3, 4, 5]);
    assert!(!frame.node(NodeId(4)).unwrap().highlighted);
    assert!(!frame.node(NodeId(5)).unwrap().highlighted);
}

#[test]
fn given_recorded_path_when_replaying_then_recommendations_follow_record_order() {
    let h = harness();
    h.store.set("decisionPath", "[0,1,2,3]").unwrap();

    let replay = h.service.open(Mode::Replay).unwrap();
    let titles: Vec<String> = replay
        .recommendations()
        .into_iter()
        .map(|r| r.title)
        .collect();

    // node 3 lists [3, 1]; records are ordered 1, 2, 3, backup
    assert_eq!(
        titles,
        vec![
            "Enable multi-factor authentication".to_string(),
            "Review cloud sharing settings".to_string()
        ]
    );
}

#[test]
fn given_string_recommendation_ids_when_replaying_then_they_match() {
    let h = harness();
    h.store.set("decisionPath", "[0,1,2,4]").unwrap();

    let replay = h.service.open(Mode::Replay).unwrap();
    let recommendations = replay.recommendations();

    assert_eq!(recommendations.len(), 2);
    assert_eq!(recommendations[0].title, "Patch regularly");
    assert_eq!(recommendations[1].title, "Keep offline backups");
    assert_eq!(
        recommendations[1].actions,
        Some(vec!["Test restores quarterly".to_string()])
    );
}

#[test]
fn given_replay_page_when_terminal_clicked_then_only_toggles() {
    let h = harness();
    h.store.set("decisionPath", "[0,1,2,3]").unwrap();
    let mut replay = h.service.open(Mode::Replay).unwrap();

    let on_terminal = replay.click(NodeId(3)).unwrap();
    let on_branch = replay.click(NodeId(2)).unwrap();

    assert!(matches!(on_terminal, ClickOutcome::Toggled { .. }));
    assert_eq!(
        on_branch,
        ClickOutcome::Toggled {
            node: NodeId(2),
            expanded: false
        }
    );
    assert!(h.navigator.visited().is_empty());
    assert_eq!(visible(&replay), vec![0, 1, 2, 5]);
}

#[test]
fn given_no_recorded_path_when_replaying_then_empty_without_error() {
    let h = harness();

    let replay = h.service.open(Mode::Replay).unwrap();

    assert!(replay.members().is_empty());
    assert!(replay.recommendations().is_empty());
    assert_eq!(visible(&replay), vec![0]);
}

#[test]
fn given_stale_terminal_id_when_replaying_then_no_recommendations() {
    let h = harness();
    h.store.set("decisionPath", "[0,1,99]").unwrap();

    let replay = h.service.open(Mode::Replay).unwrap();

    assert!(replay.recommendations().is_empty());
    assert_eq!(replay.frame(None).highlighted_ids(), ids(&[0, 1]));
}

#[test]
fn given_garbage_stored_path_when_replaying_then_treated_as_empty() {
    let h = harness();
    h.store.set("decisionPath", "{not json").unwrap();

    let replay = h.service.open(Mode::Replay).unwrap();

    assert!(replay.replayed().path.is_empty());
    assert!(replay.recommendations().is_empty());
}

// ============================================================
// Walk-then-replay scenario on an inline document
// ============================================================

#[test]
fn given_small_tree_when_walked_and_replayed_then_only_path_branch_is_open() {
    testing::init_test_setup();
    let temp = tempfile::TempDir::new().unwrap();
    let document = TreeDocument::decision(
        "root",
        vec![
            TreeDocument::decision("A", vec![TreeDocument::outcome("A1", "X")]),
            TreeDocument::outcome("B", "Y"),
        ],
    );
    std::fs::write(
        temp.path().join("data.json"),
        serde_json::to_string(&document).unwrap(),
    )
    .unwrap();
    std::fs::write(temp.path().join("recommendations.json"), "[]").unwrap();

    let settings = Settings {
        data_dir: temp.path().to_path_buf(),
        ..Settings::default()
    };
    let navigator = Arc::new(RecordingNavigator::new());
    let container = ServiceContainer::with_deps(
        settings,
        Arc::new(RealFileSystem),
        Arc::new(RealCommandRunner),
        Arc::new(MemoryKeyValueStore::new()),
        navigator.clone(),
        Arc::new(SkimSelector),
    );
    let service = container.guide_service();

    let mut entry = service.open(Mode::Entry).unwrap();
    assert!(matches!(
        entry.click(NodeId(1)).unwrap(),
        ClickOutcome::Toggled { expanded: true, .. }
    ));
    let outcome = entry.click(NodeId(2)).unwrap();
    assert!(matches!(outcome, ClickOutcome::Navigated { ref url, .. } if url == "X"));
    assert_eq!(navigator.visited(), vec!["X".to_string()]);

    let replay = service.open(Mode::Replay).unwrap();
    let frame = replay.frame(None);

    assert_eq!(replay.members().len(), 3);
    assert!(frame.node(NodeId(0)).unwrap().expanded);
    assert!(frame.node(NodeId(1)).unwrap().expanded);
    assert!(frame.node(NodeId(2)).unwrap().highlighted);
    assert!(!frame.node(NodeId(3)).unwrap().highlighted);
    assert!(replay.recommendations().is_empty());
}
