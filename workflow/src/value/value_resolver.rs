use anyhow::Result;

use util::HashSet;

use crate::{BranchSpec, Error, IdentId, Workflow, NULL_IDENT};

use super::abstract_value::{BaseValue, DirectValue, Value};
use super::{BranchMasks, RealValueLike};
use super::Error as ValueError;

/// Just a convenience to keep Workflow's impls from growing too large.
#[derive(Debug)]
pub struct ValueResolver;

impl ValueResolver {
    /// Resolve the given `Value` for use in a task realized by `branch`.
    pub fn resolve<T: RealValueLike>(
        &self,
        value: &Value,
        branch: &BranchSpec,
        wf: &Workflow,
    ) -> Result<(T, BranchMasks)> {
        let mut visited = HashSet::default();
        self.resolve_tracked(value, branch, wf, &mut visited)
    }

    fn resolve_tracked<T: RealValueLike>(
        &self,
        value: &Value,
        branch: &BranchSpec,
        wf: &Workflow,
        visited: &mut HashSet<IdentId>,
    ) -> Result<(T, BranchMasks)> {
        match value {
            Value::Direct(v) => self.resolve_direct(v, branch, wf, visited),
            Value::Branched(vals) => {
                for (val_branch, val) in vals {
                    if val_branch.is_compatible(branch) {
                        let (mut real_val, mut masks) =
                            self.resolve_direct::<T>(val, branch, wf, visited)?;
                        masks.add.insert_all(val_branch);
                        real_val.update_branch(val_branch);
                        return Ok((real_val, masks));
                    }
                }
                Err(ValueError::BranchNotFound(format!("{:?}", value), format!("{branch:?}")).into())
            }
        }
    }

    fn resolve_direct<T: RealValueLike>(
        &self,
        value: &DirectValue,
        branch: &BranchSpec,
        wf: &Workflow,
        visited: &mut HashSet<IdentId>,
    ) -> Result<(T, BranchMasks)> {
        match value {
            DirectValue::Simple(v) => self.resolve_base(v, branch, wf, visited),
            DirectValue::Graft(v, graft_branch) => {
                let mut new_branch = branch.clone();
                new_branch.insert_all(graft_branch);
                let (real_val, mut masks) = self.resolve_base::<T>(v, &new_branch, wf, visited)?;
                for (k, v) in graft_branch.iter().enumerate() {
                    if *v != NULL_IDENT {
                        masks.rm.insert(k.into());
                    }
                }
                Ok((real_val, masks))
            }
        }
    }

    fn resolve_base<T: RealValueLike>(
        &self,
        value: &BaseValue,
        branch: &BranchSpec,
        wf: &Workflow,
        visited: &mut HashSet<IdentId>,
    ) -> Result<(T, BranchMasks)> {
        use BaseValue::*;
        match value {
            Literal(v) => Ok((T::literal(*v)?, BranchMasks::default())),
            Task(abstract_task, v) => {
                let source = wf
                    .get_task_opt(*abstract_task)
                    .ok_or(Error::SourceTaskNotFound(*abstract_task))?;
                if !source.vars.outputs.iter().any(|(name, _)| name == v) {
                    return Err(Error::SourceSlotNotFound(*abstract_task, *v).into());
                }
                Ok((
                    T::task(*abstract_task, *v, branch.clone())?,
                    BranchMasks::default(),
                ))
            }
            Config(v) => self.get_config_val_and_resolve(*v, branch, wf, visited),
            Interp(v, vars) => {
                let mut outer_masks = BranchMasks::default();
                let mut var_literals = Vec::with_capacity(vars.len());
                for var in vars {
                    let (val, masks) =
                        self.get_config_val_and_resolve::<T>(*var, branch, wf, visited)?;
                    // so... we can't chain interp vars? hm.
                    // could simplify this by just sticking a value id in there instead.
                    // except, where does the value go? we can't store it anywhere from here.
                    // we can't even match on it anymore, since it's hidden by a type param... geez.
                    let var_lit_id = val.get_literal_id()?;
                    var_literals.push((*var, var_lit_id));
                    outer_masks.or_eq(&masks);
                }
                Ok((T::interp(*v, var_literals)?, outer_masks))
            }
        }
    }

    fn get_config_val_and_resolve<T: RealValueLike>(
        &self,
        ident: IdentId,
        branch: &BranchSpec,
        wf: &Workflow,
        visited: &mut HashSet<IdentId>,
    ) -> Result<(T, BranchMasks)> {
        if !visited.insert(ident) {
            let name = intern::GetStr::get(&wf.strings.idents, ident)?;
            return Err(ValueError::ResolutionCycle(name.to_owned()).into());
        }
        let val_id = if let Some(val_id) = wf.get_config_value(ident) {
            val_id
        } else {
            let name = intern::GetStr::get(&wf.strings.idents, ident)?;
            return Err(ValueError::NonexistentConfigValue(name.to_owned()).into());
        };
        let val = wf.get_value(val_id);
        let result = self.resolve_tracked(val, branch, wf, visited);
        visited.remove(&ident);
        result
    }
}
