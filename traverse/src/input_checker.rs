use std::path::Path;

use anyhow::Result;

use intern::GetStr;
use workflow::{Errors, Recapper, SourcePos, Workflow};

use super::{RealInput, Traversal, ValueContext};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no files found matching input pattern {0:?}, declared at {1}")]
    InputFileNotFound(String, SourcePos),
}

/// Glob-check every literal (not task-produced) input in `traversal` against the
/// filesystem, relative to `workflow_dir`. Every miss is accumulated rather than
/// raised immediately, so the caller sees every missing input in one pass.
pub fn check_inputs(traversal: &Traversal, wf: &Workflow, workflow_dir: &Path) -> Result<()> {
    let mut errors = Errors::default();

    for node in &traversal.nodes {
        for (ident, val_id) in &node.vars.inputs {
            if let RealInput::Literal(lit_id) = traversal.inputs.get(*val_id) {
                let pattern = wf.strings.literals.get(*lit_id)?;
                let declaration_pos = wf.strings.spec_position(node.key.abstract_task_id, *ident);
                if let Err(e) = check_one(pattern, workflow_dir, declaration_pos) {
                    let e = e.context(Recapper::new(ValueContext {
                        ty: "input".to_owned(),
                        ident: *ident,
                        task: node.key.clone(),
                        pos: declaration_pos,
                    }));
                    errors.add(e);
                }
            }
        }
    }

    errors.print_recap("checking inputs", &wf.strings)
}

/// Expand `pattern` as a glob relative to `workflow_dir` (unless it's already
/// absolute), and check that at least one file matches. A literal with no glob
/// metacharacters is just a pattern that can only match itself, so this also
/// covers the plain missing-file case. `declaration_pos` is where the input
/// spec using this pattern was declared, carried through for error context.
fn check_one(pattern: &str, workflow_dir: &Path, declaration_pos: SourcePos) -> Result<()> {
    let full_pattern = if Path::new(pattern).is_absolute() {
        pattern.to_owned()
    } else {
        workflow_dir.join(pattern).to_string_lossy().into_owned()
    };

    let mut found_any = false;
    for entry in glob::glob(&full_pattern)? {
        entry?;
        found_any = true;
    }

    if found_any {
        Ok(())
    } else {
        Err(Error::InputFileNotFound(full_pattern, declaration_pos).into())
    }
}
