//! Pre-flight checks for meshsnr
//!
//! Confirms the target is a direct neighbor before any traceroute is sent.
//! A target that is unknown, relayed, or listed with an unreadable hop count
//! stops the run here with a distinct error.

use crate::domain::{NodeId, ReachabilityError};
use crate::link::RadioLink;
use crate::node_table::{find_node, NodeRecord};
use log::info;

/// Column holding the hop distance.
pub const HOPS_COLUMN: &str = "Hops";

/// Column holding the canonical node ID.
pub const ID_COLUMN: &str = "ID";

/// A verified direct neighbor.
#[derive(Debug, Clone)]
pub struct Target {
    /// ID as the node table spells it, used for every probe
    pub id: NodeId,
    pub record: NodeRecord,
}

/// Query the node table and verify `wanted` is one hop away.
///
/// `inspect` sees the located row before it is verified, so a relayed
/// target's row can still be shown.
pub async fn run_preflight_checks<L, F>(
    link: &L,
    wanted: &NodeId,
    inspect: F,
) -> Result<Target, ReachabilityError>
where
    L: RadioLink,
    F: FnOnce(&NodeRecord),
{
    let table = link.node_table().await?;
    let record = locate_target(&table, wanted)?;
    inspect(&record);
    verify_target(record, wanted)
}

/// Find the row for `wanted` in a node table snapshot.
pub fn locate_target(table: &str, wanted: &NodeId) -> Result<NodeRecord, ReachabilityError> {
    find_node(table, &wanted.search_key())
        .ok_or_else(|| ReachabilityError::TargetNotFound(wanted.clone()))
}

/// Check a located row and pull out the ID to probe.
pub fn verify_target(record: NodeRecord, wanted: &NodeId) -> Result<Target, ReachabilityError> {
    check_direct(&record, wanted)?;
    let id = canonical_id(&record, wanted)?;
    info!("{id} verified as 0 hops away");
    Ok(Target { id, record })
}

/// Hop distance as listed in the table.
pub fn hops_away(record: &NodeRecord, wanted: &NodeId) -> Result<i64, ReachabilityError> {
    let value = record
        .get(HOPS_COLUMN)
        .ok_or_else(|| ReachabilityError::MissingField { id: wanted.clone(), field: HOPS_COLUMN })?;

    value.trim().parse::<i64>().map_err(|_| ReachabilityError::MalformedHops {
        id: wanted.clone(),
        value: value.to_string(),
    })
}

/// `true` only for a hop distance of exactly zero.
pub fn is_direct(record: &NodeRecord, wanted: &NodeId) -> Result<bool, ReachabilityError> {
    Ok(hops_away(record, wanted)? == 0)
}

fn check_direct(record: &NodeRecord, wanted: &NodeId) -> Result<(), ReachabilityError> {
    let hops = hops_away(record, wanted)?;
    if hops != 0 {
        return Err(ReachabilityError::NotDirect { id: wanted.clone(), hops });
    }
    Ok(())
}

fn canonical_id(record: &NodeRecord, wanted: &NodeId) -> Result<NodeId, ReachabilityError> {
    record
        .get(ID_COLUMN)
        .map(NodeId::from)
        .ok_or_else(|| ReachabilityError::MissingField { id: wanted.clone(), field: ID_COLUMN })
}
