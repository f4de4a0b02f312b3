use anyhow::Result;

use intern::InternStr;
use syntax::ast;

use crate::{BranchSpec, Error, IdentId, WorkflowStrings};

use super::{BaseValue, DirectValue, Value};

// TODO these cd be added to a zero-sized struct...

/// Which kind of spec a value is being created for.
/// Params have stricter rules than inputs/outputs: they must always be
/// bound, and must ultimately resolve to a literal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMode {
    Input,
    Output,
    Param,
}

/// Create a `Value` from the left-hand and right-hand side ast representations.
/// `pos` is the declaration position of the enclosing spec, used to give
/// `UnboundParam`/`NonLiteralParam` fatal errors source-position context.
pub fn create_value(
    strings: &mut WorkflowStrings,
    lhs: ast::Ident,
    rhs: ast::Rhs,
    mode: ValueMode,
    pos: ast::SourcePos,
) -> Result<Value> {
    use ast::Rhs::*;
    match rhs {
        Branchpoint { branchpoint, vals } => {
            let outer_k = strings.branchpoints.intern(branchpoint)?;
            let mut outer_vs = Vec::with_capacity(vals.len());
            for (branch_lhs, _) in &vals {
                outer_vs.push(strings.idents.intern(branch_lhs)?);
            }
            strings.record_branchpoint_declaration(outer_k, branchpoint, &outer_vs)?;

            let mut flattened_vals = Vec::with_capacity(vals.len());
            for (branch_lhs, val) in vals {
                let outer_v = strings.idents.intern(branch_lhs)?;
                strings.baselines.add(outer_k, outer_v);
                match create_value(strings, branch_lhs, val, mode, pos)? {
                    Value::Branched(nested_vals) => {
                        for (mut nested_branch, nested_val) in nested_vals {
                            nested_branch.insert(outer_k, outer_v);
                            flattened_vals.push((nested_branch, nested_val));
                        }
                    }
                    Value::Direct(val) => {
                        let branch = BranchSpec::simple(outer_k, outer_v);
                        flattened_vals.push((branch, val));
                    }
                }
            }
            Ok(Value::Branched(flattened_vals))
        }
        direct_rhs => Ok(Value::Direct(create_direct(strings, lhs, direct_rhs, mode, pos)?)),
    }
}

fn create_direct(
    strings: &mut WorkflowStrings,
    lhs: ast::Ident,
    rhs: ast::Rhs,
    mode: ValueMode,
    pos: ast::SourcePos,
) -> Result<DirectValue> {
    use ast::Rhs::*;
    match rhs {
        GraftedVariable { name, branch } => {
            let name = strings.idents.intern(name)?;
            let value = BaseValue::Config(name);
            let branch = create_branch(strings, branch)?;
            Ok(DirectValue::Graft(value, branch))
        }
        GraftedTaskOutput {
            task,
            output,
            branch,
        } => {
            if mode == ValueMode::Param {
                let name = strings.idents.intern(lhs)?;
                return Err(Error::NonLiteralParam(name, pos).into());
            }
            let task = strings.tasks.intern(task)?;
            let output = strings.idents.intern(output)?;
            let value = BaseValue::Task(task, output);
            let branch = create_branch(strings, branch)?;
            Ok(DirectValue::Graft(value, branch))
        }
        ShorthandGraftedTaskOutput { task, branch } => {
            if mode == ValueMode::Param {
                let name = strings.idents.intern(lhs)?;
                return Err(Error::NonLiteralParam(name, pos).into());
            }
            let task = strings.tasks.intern(task)?;
            let output = strings.idents.intern(lhs)?;
            let value = BaseValue::Task(task, output);
            let branch = create_branch(strings, branch)?;
            Ok(DirectValue::Graft(value, branch))
        }
        _ => Ok(DirectValue::Simple(create_base(strings, lhs, rhs, mode, pos)?)),
    }
}

#[rustfmt::skip]
fn create_base(
    strings: &mut WorkflowStrings,
    lhs: ast::Ident,
    rhs: ast::Rhs,
    mode: ValueMode,
    pos: ast::SourcePos,
) -> Result<BaseValue> {
    use ast::Rhs::*;
    match rhs {
        Unbound => {
            if mode == ValueMode::Param {
                let name = strings.idents.intern(lhs)?;
                return Err(Error::UnboundParam(name, pos).into());
            }
            strings.literals.intern(lhs).map(BaseValue::Literal)
        }
        Literal { val }     => strings.literals.intern(val).map(BaseValue::Literal),
        Variable { name }   => strings.idents.intern(name).map(BaseValue::Config),
        ShorthandVariable   => strings.idents.intern(lhs).map(BaseValue::Config),
        TaskOutput { task, output } => {
            if mode == ValueMode::Param {
                let name = strings.idents.intern(lhs)?;
                return Err(Error::NonLiteralParam(name, pos).into());
            }
            let task = strings.tasks.intern(task)?;
            let output = strings.idents.intern(output)?;
            Ok(BaseValue::Task(task, output))
        }
        ShorthandTaskOutput { task } => {
            if mode == ValueMode::Param {
                let name = strings.idents.intern(lhs)?;
                return Err(Error::NonLiteralParam(name, pos).into());
            }
            let task = strings.tasks.intern(task)?;
            let output = strings.idents.intern(lhs)?;
            Ok(BaseValue::Task(task, output))
        }
        Interp { text, vars } => {
            let val = strings.literals.intern(text)?;
            let mut vars: Vec<IdentId> = vars
                .into_iter()
                .map(|var| strings.idents.intern(var))
                .collect::<Result<_, _>>()?;
            // our parser puts interp vars in reverse order,
            // but we want them ordered so we can optimize interpolation down the line:
            vars.reverse();
            Ok(BaseValue::Interp(val, vars))
        }
        _ => {
            Err(Error::UnexpectedBranchPoint.into())
        }
    }
}

fn create_branch(strings: &mut WorkflowStrings, branch: ast::Branch) -> Result<BranchSpec> {
    let mut spec = BranchSpec::default();
    for (k, v) in branch {
        let k = strings.branchpoints.intern(k)?;
        let v = strings.idents.intern(v)?;
        spec.insert(k, v);
    }
    Ok(spec)
}
