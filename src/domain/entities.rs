//! Domain entities: core data structures

use std::collections::HashSet;
use std::fmt;

use itertools::Itertools;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Stable node identifier, assigned once per document load in pre-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Styling class of a node. Does not affect structure.
///
/// Unknown names style as `Decision`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Outcome,
    #[default]
    #[serde(other)]
    Decision,
}

/// Reads `type` without ever failing the document: null, numbers and other
/// non-string values fall back to the default kind.
fn lenient_kind<'de, D>(deserializer: D) -> Result<NodeKind, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Known(NodeKind),
        Other(IgnoredAny),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Known(kind) => kind,
        Raw::Other(_) => NodeKind::default(),
    })
}

/// Recommendation identifier as it appears in the documents (number or string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecommendationId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecommendationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendationId::Number(n) => write!(f, "{n}"),
            RecommendationId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Node of the raw tree document, as loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDocument {
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_kind")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<RecommendationId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeDocument>>,
}

impl TreeDocument {
    pub fn decision(name: impl Into<String>, children: Vec<TreeDocument>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Decision,
            url: None,
            recommendations: None,
            children: Some(children),
        }
    }

    pub fn outcome(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Outcome,
            url: Some(url.into()),
            recommendations: None,
            children: None,
        }
    }

    pub fn with_recommendations(mut self, ids: Vec<RecommendationId>) -> Self {
        self.recommendations = Some(ids);
        self
    }
}

/// Recommendation record from the external recommendation document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub id: RecommendationId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub actions: Option<Vec<String>>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Resolved recommendation, in display field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationView {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl From<&RecommendationRecord> for RecommendationView {
    fn from(record: &RecommendationRecord) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            actions: record.actions.clone(),
            summary: record.summary.clone(),
            link: record.link.clone(),
        }
    }
}

/// Root-to-terminal sequence of node ids (root included).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraversalPath(Vec<NodeId>);

impl TraversalPath {
    pub fn new(ids: Vec<NodeId>) -> Self {
        Self(ids)
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Last id of the path: the node the traversal ended on.
    pub fn terminal(&self) -> Option<NodeId> {
        self.0.last().copied()
    }

    pub fn membership(&self) -> PathMembershipSet {
        PathMembershipSet(self.0.iter().copied().collect())
    }
}

impl fmt::Display for TraversalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().join(" → "))
    }
}

/// Set form of a traversal path. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMembershipSet(HashSet<NodeId>);

impl PathMembershipSet {
    pub fn contains(&self, id: NodeId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
