//! Group configuration — the public roster every participant agrees on.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::pair::{Identity, PublicToml};
use crate::error::{Result, StoreError};
use crate::storage::Tomler;

/// Default beacon period when none is configured.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(60);

/// The set of participants running the protocol together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Nodes in index order.
    pub nodes: Vec<Identity>,
    /// Number of shares needed to produce a beacon.
    pub threshold: usize,
    /// Time between two beacons.
    pub period: Duration,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            threshold: 0,
            period: DEFAULT_PERIOD,
        }
    }
}

impl Group {
    /// Build a group from its parts.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Decode` if the roster is empty, a node has no
    /// address, or `threshold` is zero or above the node count.
    pub fn new(nodes: Vec<Identity>, threshold: usize, period: Duration) -> Result<Self> {
        let group = Self {
            nodes,
            threshold,
            period,
        };
        group.validate()?;
        Ok(group)
    }

    /// Smallest safe threshold for `n` nodes: a strict majority.
    pub fn minimum_threshold(n: usize) -> usize {
        n / 2 + 1
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the group lists no node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True if `identity` is a member (same key and address).
    pub fn contains(&self, identity: &Identity) -> bool {
        self.index_of(identity).is_some()
    }

    /// Position of `identity` in the roster.
    pub fn index_of(&self, identity: &Identity) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.key == identity.key && n.address == identity.address)
    }

    /// Hex SHA-256 fingerprint over threshold, period and node keys.
    pub fn hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.threshold as u64).to_be_bytes());
        hasher.update(self.period.as_nanos().to_be_bytes());
        for node in &self.nodes {
            hasher.update(node.key);
            hasher.update(node.address.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// On-disk view of a [`Group`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupToml {
    #[serde(rename = "Threshold")]
    pub threshold: usize,
    /// Time between beacons, e.g. `"30s"` or `"1m 500ms"`.
    #[serde(rename = "Period", with = "humantime_serde")]
    pub period: Duration,
    #[serde(rename = "Nodes", default)]
    pub nodes: Vec<PublicToml>,
}

impl Tomler for Group {
    type Toml = GroupToml;
    const NAME: &'static str = "group";

    fn to_toml(&self) -> GroupToml {
        GroupToml {
            threshold: self.threshold,
            period: self.period,
            nodes: self.nodes.iter().map(|n| n.to_toml()).collect(),
        }
    }

    fn from_toml(&mut self, value: GroupToml) -> Result<()> {
        check_roster(value.threshold, value.nodes.len())?;

        let mut nodes = Vec::with_capacity(value.nodes.len());
        for node in value.nodes {
            let mut identity = Identity::default();
            identity.from_toml(node)?;
            nodes.push(identity);
        }

        self.nodes = nodes;
        self.threshold = value.threshold;
        self.period = value.period;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        check_roster(self.threshold, self.nodes.len())?;
        self.nodes.iter().try_for_each(Identity::validate)
    }
}

fn check_roster(threshold: usize, nodes: usize) -> Result<()> {
    if nodes == 0 {
        return Err(StoreError::decode(Group::NAME, "no nodes"));
    }
    if threshold == 0 || threshold > nodes {
        return Err(StoreError::decode(
            Group::NAME,
            format!("threshold {threshold} out of range for {nodes} nodes"),
        ));
    }
    Ok(())
}
