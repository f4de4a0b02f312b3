//! Utility fns for dealing with branch strings (e.g. "Branchpoint.branch+X.y").

use anyhow::Result;

use intern::{GetStr, InternStr};

use crate::Workflow;
use crate::{BranchpointId, IdentId, BRANCH_DELIM, BRANCH_KV_DELIM};

use super::{BranchSpec, Error};

const BASELINE_STR: &str = "Baseline.baseline";
const BASELINE_STR_PLUS: &str = "Baseline.baseline+";

/// Canonical realization name for an all-baseline branch.
const REALIZATION_BASELINE_STR: &str = "baseline";
/// Delimiter joining branch value names in a canonical realization name.
const REALIZATION_DELIM: char = '-';

// TODO make a zero-size struct to hold these fns, add it to Workflow.

/// Branch string with all branches specified, even if they are baseline.
/// If there are no branches at all, uses "Baseline.baseline".
pub fn make_full_string(branch: &BranchSpec, wf: &Workflow, buf: &mut String) -> Result<()> {
    let mut first = true;
    for (k, _) in wf.strings.baselines.iter() {
        if k >= branch.len() {
            break;
        }
        let k: BranchpointId = k.into();
        if let Some(v) = branch.get_specified(k) {
            if first {
                first = false;
            } else {
                buf.push(BRANCH_DELIM);
            }
            push_branch_pair(k, v, wf, buf)?;
        }
    }
    if buf.is_empty() {
        buf.push_str(BASELINE_STR);
    }
    Ok(())
}

/// Canonical realization name: branches sorted by their branch-point's name,
/// joined with `-`, with baseline branches omitted unless the realization
/// is all-baseline (in which case it renders as "baseline").
/// These strings will always stay valid between runs, as long
/// as the branch ordering doesn't change (specified in branchpoints.txt).
pub fn make_compact_string(branch: &BranchSpec, wf: &Workflow, buf: &mut String) -> Result<()> {
    let mut non_baseline = Vec::with_capacity(branch.len());
    for (k, baseline_v) in wf.strings.baselines.iter() {
        if k >= branch.len() {
            break;
        }
        let k: BranchpointId = k.into();
        if let Some(v) = branch.get_specified(k) {
            if v != *baseline_v {
                non_baseline.push((wf.strings.branchpoints.get(k)?, v));
            }
        }
    }
    non_baseline.sort_by_key(|(bp_name, _)| *bp_name);

    for (i, (_, v)) in non_baseline.iter().enumerate() {
        if i > 0 {
            buf.push(REALIZATION_DELIM);
        }
        buf.push_str(wf.strings.idents.get(*v)?);
    }

    if buf.is_empty() {
        buf.push_str(REALIZATION_BASELINE_STR);
    }
    Ok(())
}

fn push_branch_pair(k: BranchpointId, v: IdentId, wf: &Workflow, buf: &mut String) -> Result<()> {
    buf.push_str(wf.strings.branchpoints.get(k)?);
    buf.push(BRANCH_KV_DELIM);
    buf.push_str(wf.strings.idents.get(v)?);
    Ok(())
}

/// Parse a string of the kind created by `make_compact_string` into a `BranchSpec`.
pub fn parse_compact_branch_str(wf: &mut Workflow, s: &str) -> Result<BranchSpec> {
    let mut branch = BranchSpec::default();
    if s != REALIZATION_BASELINE_STR {
        for name in s.split(REALIZATION_DELIM) {
            let v = wf.strings.idents.intern(name)?;
            let k = wf
                .strings
                .find_branchpoint_for_branch(v)
                .ok_or_else(|| Error::InvalidBranchString(name.to_owned()))?;
            branch.insert(k, v);
        }
    }
    for (k, v) in wf.strings.baselines.iter() {
        let id: BranchpointId = k.into();
        if branch.is_unspecified(id) {
            branch.insert(id, *v);
        }
    }
    Ok(branch)
}
