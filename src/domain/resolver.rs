//! Recommendation resolver: terminal node id to ordered recommendation views.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::domain::arena::DecisionTree;
use crate::domain::{NodeId, RecommendationRecord, RecommendationView};

/// Resolve the recommendations of the node with `terminal`.
///
/// Looks the node up in the full hierarchy (collapse state does not hide it),
/// then keeps the records whose id the node lists. Result order is the order of
/// `records`, not the order of the node's list. An unknown id or a node without
/// recommendations yields an empty result.
pub fn resolve(
    terminal: NodeId,
    tree: &DecisionTree,
    records: &[RecommendationRecord],
) -> Vec<RecommendationView> {
    let Some((_, node, _)) = tree.iter().find(|(_, node, _)| node.id == terminal) else {
        warn!("resolve: node {} not found in tree", terminal);
        return Vec::new();
    };
    let Some(wanted) = &node.data.recommendations else {
        debug!("resolve: node {} has no recommendations", terminal);
        return Vec::new();
    };

    let wanted: HashSet<_> = wanted.iter().collect();
    let views: Vec<RecommendationView> = records
        .iter()
        .filter(|record| wanted.contains(&record.id))
        .map(RecommendationView::from)
        .collect();
    debug!(
        "resolve: node {} lists {} ids, {} records matched",
        terminal,
        wanted.len(),
        views.len()
    );
    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::TreeBuilder;
    use crate::domain::{RecommendationId, TreeDocument};

    fn record(id: i64, title: &str) -> RecommendationRecord {
        RecommendationRecord {
            id: RecommendationId::Number(id),
            title: title.to_string(),
            description: format!("{title} description"),
            actions: None,
            summary: None,
            link: None,
        }
    }

    fn tree_with(recommendations: Option<Vec<RecommendationId>>) -> DecisionTree {
        let mut leaf = TreeDocument::outcome("leaf", "done.html");
        leaf.recommendations = recommendations;
        TreeBuilder::new().build(&TreeDocument::decision("root", vec![leaf]))
    }

    #[test]
    fn given_request_order_differs_when_resolving_then_keeps_record_order() {
        let tree = tree_with(Some(vec![
            RecommendationId::Number(3),
            RecommendationId::Number(1),
        ]));
        let records = vec![record(1, "A"), record(2, "B"), record(3, "C")];

        let result = resolve(NodeId(1), &tree, &records);

        let titles: Vec<&str> = result.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[test]
    fn given_collapsed_terminal_when_resolving_then_still_found() {
        let mut tree = tree_with(Some(vec![RecommendationId::Number(2)]));
        tree.collapse_all();
        let records = vec![record(1, "A"), record(2, "B")];

        let result = resolve(NodeId(1), &tree, &records);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "B");
    }

    #[test]
    fn given_unknown_terminal_when_resolving_then_empty() {
        let tree = tree_with(Some(vec![RecommendationId::Number(1)]));
        assert!(resolve(NodeId(42), &tree, &[record(1, "A")]).is_empty());
    }

    #[test]
    fn given_terminal_without_recommendations_when_resolving_then_empty() {
        let tree = tree_with(None);
        assert!(resolve(NodeId(1), &tree, &[record(1, "A")]).is_empty());
    }

    #[test]
    fn given_ids_absent_from_records_when_resolving_then_skipped() {
        let tree = tree_with(Some(vec![
            RecommendationId::Text("mfa".into()),
            RecommendationId::Number(2),
        ]));
        let result = resolve(NodeId(1), &tree, &[record(1, "A"), record(2, "B")]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].description, "B description");
    }
}
