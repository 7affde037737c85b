use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::graph::{Edge, Graph};
use super::weight::ScalarWeight;
use crate::search::EdgeWeigher;

fn default_link_weight() -> ScalarWeight {
    ScalarWeight::ONE
}

/// Directed link between two network nodes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Link {
    pub src: u32,
    pub dst: u32,
    #[serde(default = "default_link_weight")]
    pub weight: ScalarWeight,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_group: Option<String>,
}

impl Link {
    pub fn new(src: u32, dst: u32, weight: f64) -> Self {
        Self {
            src,
            dst,
            weight: ScalarWeight::new(weight),
            risk_group: None,
        }
    }

    pub fn with_risk_group(mut self, group: impl Into<String>) -> Self {
        self.risk_group = Some(group.into());
        self
    }
}

impl Edge for Link {
    type Vertex = u32;

    fn src(&self) -> &u32 {
        &self.src
    }

    fn dst(&self) -> &u32 {
        &self.dst
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LinkWeigher;

impl EdgeWeigher<Link> for LinkWeigher {
    fn weight(&self, link: &Link) -> ScalarWeight {
        link.weight
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub nodes: Vec<u32>,
    pub links: Vec<Link>,
}

impl Topology {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("failed to parse topology json")
    }

    pub fn node_ids(&self) -> BTreeSet<u32> {
        self.nodes
            .iter()
            .copied()
            .chain(self.links.iter().flat_map(|link| [link.src, link.dst]))
            .collect()
    }

    pub fn to_graph(&self) -> Graph<Link> {
        Graph::new(self.nodes.iter().copied(), self.links.iter().cloned())
    }

    /// Risk group name of every link that declares one.
    pub fn risk_grouping(&self) -> BTreeMap<Link, String> {
        self.links
            .iter()
            .filter_map(|link| {
                link.risk_group
                    .as_ref()
                    .map(|group| (link.clone(), group.clone()))
            })
            .collect()
    }
}

pub fn load_topology(path: &Path) -> Result<Topology> {
    let raw_text = fs::read_to_string(path)
        .with_context(|| format!("failed to read topology file {}", path.display()))?;
    Topology::from_json_str(&raw_text)
        .with_context(|| format!("invalid topology in {}", path.display()))
}
