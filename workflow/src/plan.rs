use anyhow::Result;

use intern::InternStr;
use syntax::ast;

use crate::{AbstractTaskId, BranchSpec, BranchpointId, IdentId, WorkflowStrings};

/// One `reach ... via ...` clause: a set of goal tasks, plus the full
/// cross-product of concrete branch combinations to build them under.
#[derive(Debug)]
pub struct CrossProduct {
    /// Tasks we want to reach.
    pub goals: Vec<AbstractTaskId>,
    /// Every concrete combination of branches named by this clause's `via`.
    /// Empty `via` clauses produce a single baseline `BranchSpec`.
    pub branches: Vec<BranchSpec>,
}

/// A plan defined in a config file: one or more cross-products.
#[derive(Debug)]
pub struct Plan {
    pub cross_products: Vec<CrossProduct>,
}

impl Plan {
    pub fn create(
        strings: &mut WorkflowStrings,
        cross_products: Vec<ast::CrossProduct>,
    ) -> Result<Self> {
        let mut out = Vec::with_capacity(cross_products.len());
        for ast::CrossProduct { goals, branches } in cross_products {
            let goal_ids = goals
                .into_iter()
                .map(|g| strings.tasks.intern(g))
                .collect::<Result<Vec<_>>>()?;

            let mut axes: Vec<Vec<(BranchpointId, IdentId)>> = Vec::with_capacity(branches.len());
            for (k, vs) in branches {
                let k = strings.branchpoints.intern(k)?;
                let vals: Vec<IdentId> = match vs {
                    ast::Branches::Specified(vec) => {
                        vec.into_iter().map(|v| strings.idents.intern(v)).collect::<Result<_>>()?
                    }
                    ast::Branches::Glob => strings.branches_of(k).to_vec(),
                };
                axes.push(vals.into_iter().map(|v| (k, v)).collect());
            }

            let branches = cross_product(&axes)
                .into_iter()
                .map(|combo| {
                    let mut spec = BranchSpec::default();
                    for (k, v) in combo {
                        spec.insert(k, v);
                    }
                    spec
                })
                .collect();

            out.push(CrossProduct {
                goals: goal_ids,
                branches,
            });
        }
        Ok(Self {
            cross_products: out,
        })
    }
}

/// Cartesian product of a list of axes. An empty `axes` list produces a
/// single empty combination (so a `reach` clause with no `via` still
/// yields exactly one, baseline, branch combination).
fn cross_product<T: Clone>(axes: &[Vec<T>]) -> Vec<Vec<T>> {
    axes.iter().fold(vec![Vec::new()], |acc, axis| {
        acc.into_iter()
            .flat_map(|prefix| {
                axis.iter().map(move |item| {
                    let mut next = prefix.clone();
                    next.push(item.clone());
                    next
                })
            })
            .collect()
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cross_product_empty_axes_yields_one_empty_combo() {
        let axes: Vec<Vec<u8>> = vec![];
        assert_eq!(cross_product(&axes), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn test_cross_product_multiple_axes() {
        let axes = vec![vec![1u8, 2], vec![10u8, 20]];
        let combos = cross_product(&axes);
        assert_eq!(combos.len(), 4);
        assert!(combos.contains(&vec![1, 10]));
        assert!(combos.contains(&vec![2, 20]));
    }
}
