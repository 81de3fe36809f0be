//! Host selection by id.

use std::collections::BTreeSet;

use tie_core::{Host, HostId};

/// Which hosts a query is interested in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HostFilter {
    /// Every host in the inventory.
    #[default]
    All,
    /// Hosts whose id is a member of the set.
    Ids(BTreeSet<HostId>),
}

impl HostFilter {
    /// Filter for a set of ids. An empty set selects everything.
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<HostId>,
    {
        let ids: BTreeSet<HostId> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            HostFilter::All
        } else {
            HostFilter::Ids(ids)
        }
    }

    /// Filter for a single host.
    pub fn one(id: impl Into<HostId>) -> Self {
        HostFilter::Ids(BTreeSet::from([id.into()]))
    }

    pub fn matches(&self, host: &Host) -> bool {
        match self {
            HostFilter::All => true,
            HostFilter::Ids(ids) => ids.is_empty() || ids.contains(&host.id),
        }
    }

    /// Keep matching hosts, preserving inventory order.
    pub fn apply(&self, hosts: Vec<Host>) -> Vec<Host> {
        match self {
            HostFilter::All => hosts,
            HostFilter::Ids(_) => hosts.into_iter().filter(|h| self.matches(h)).collect(),
        }
    }
}
