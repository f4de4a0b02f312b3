use anyhow::Result;

use intern::GetStr;
use util::IdVec;
use workflow::{BranchStrs, IdentId, RealInput, RealOutputOrParam, RealValueId, Workflow};

use super::{bfs, cleanup, RealTaskKey};

/// Represents a specific traversal through the tasks in the workflow.
/// When this struct is returned from `create`, it may contain duplicates,
/// but it is guaranteed to be ordered in run/dependency order and fully resolved
/// with clean branches.
pub struct Traversal {
    pub nodes: Vec<super::Node>,
    pub inputs: IdVec<RealValueId, RealInput>,
    pub outputs_params: IdVec<RealValueId, RealOutputOrParam>,
    /// number of nodes with no antecedents (`is_root`); used by `cleanup::clean_branches`
    /// to know how many root-to-goal paths to walk.
    pub num_roots: usize,
    pub branch_strs: BranchStrs,
}

impl Traversal {
    /// Create a traversal for the plan named `plan`, found among `wf`'s plans.
    pub fn create(wf: &Workflow, plan: IdentId, verbose: bool) -> Result<Self> {
        let plan = wf.get_plan(plan)?;

        let mut traverser = bfs::BfsTraverser::new(wf, verbose);
        for cross_product in &plan.cross_products {
            for goal in &cross_product.goals {
                for branch in &cross_product.branches {
                    let key = RealTaskKey {
                        abstract_task_id: *goal,
                        branch: branch.clone(),
                    };
                    traverser.traverse(key)?;
                }
            }
        }

        let mut traversal = traverser.into_traversal();

        log::debug!(
            "created unpruned traversal with {} nodes",
            traversal.nodes.len()
        );
        for node in &traversal.nodes {
            log::trace!(
                "{}[{}]",
                wf.strings.tasks.get(node.key.abstract_task_id)?,
                traversal.branch_strs.get(&node.key.branch)?,
            );
        }

        // step 2: reverse, so we're in forward/run order:
        cleanup::reverse(&mut traversal);

        // step 3: step forward, pruning branchpoints that have been grafted out:
        cleanup::clean_branches(&mut traversal, wf)?;

        Ok(traversal)
    }
}
