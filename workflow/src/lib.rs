mod strings;
pub use strings::WorkflowStrings;

pub use syntax::ast::SourcePos;

mod value;
pub use value::{
    BaseValue, BranchMasks, DirectValue, PartialRealInput, RealInput, RealOutput,
    RealOutputOrParam, RealParam, RealValueLike, Value, ValueMode,
};

mod task;
pub use task::{Task, TaskVars};

mod plan;
pub use plan::{CrossProduct, Plan};

mod branch;
pub use branch::{BaselineBranches, BranchSpec, BranchStrs};

mod id;
pub use id::{
    AbstractTaskId, AbstractValueId, BranchpointId, IdentId, LiteralId, ModuleId, RealTaskId,
    RealValueId, RunStrId, NULL_IDENT,
};

mod error;
pub use error::{Errors, Recap, Recapper};

mod workflow;
pub use workflow::{SizeHints, Workflow};

mod string_cache;
pub use string_cache::{StringCache, StringMaker};

mod real_task;
pub use real_task::{RealTaskKey, RealTaskStrings};

mod version;
pub use version::{
    UnionWorkflowVersionInfo, VersionedTaskId, WorkflowVersionHistory, WorkflowVersionInfo,
};

// used to separate branchpoint from branch value e.g. "Profile.debug"
pub const BRANCH_KV_DELIM: char = '.';
// used to separate multiple branchpoint/value pairs e.g. "Profile.debug+Os.windows"
pub const BRANCH_DELIM: char = '+';

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unsupported feature: {0}")]
    Unsupported(String),
    #[error("Plan not found: {0:?}")]
    PlanNotFound(IdentId),
    #[error("Task defines multiple modules with '@'. Only one module is allowed.")]
    MultipleModulesDefined,
    #[error("Dot parameters (\".var\") are not yet supported")]
    DotParamsUnsupported,
    #[error("Unable to interpolate \"{0}\" into \"{1}\"")]
    Interp(String, String),
    #[error("Plan is empty: '{0}'")]
    EmptyPlan(String),
    #[error("Module not found: {0:?}")]
    ModuleNotFound(ModuleId),
    #[error("Task not found: {0:?}")]
    TaskNotFound(AbstractTaskId),
    #[error("Value not found: {0:?}")]
    ValueNotFound(AbstractValueId),
    #[error("Duplicate task name: {0:?}, declared at {1}")]
    DuplicateTaskName(AbstractTaskId, SourcePos),
    #[error("Referenced source task does not exist: {0:?}")]
    SourceTaskNotFound(AbstractTaskId),
    #[error("Referenced source task {0:?} has no output named {1:?}")]
    SourceSlotNotFound(AbstractTaskId, IdentId),
    #[error("Internal error: encountered a branch point while resolving a value that should already have been flattened to a single branch")]
    UnexpectedBranchPoint,
    #[error("Param {0:?} is unbound; params must always have a value, declared at {1}")]
    UnboundParam(IdentId, SourcePos),
    #[error("Param {0:?} does not resolve to a literal value, declared at {1}")]
    NonLiteralParam(IdentId, SourcePos),
    #[error("Branch point {0:?} is in scope but has no branch assigned")]
    MissingBranchForBranchPoint(BranchpointId),
}

impl Recap for Error {
    fn recap(&self, wf: &WorkflowStrings) -> anyhow::Result<Option<String>> {
        use intern::GetStr;
        match self {
            Self::ModuleNotFound(id) => {
                Ok(Some(format!("Module not found: {}", wf.modules.get(*id)?)))
            }
            Self::TaskNotFound(id) => Ok(Some(format!("Task not found: {}", wf.tasks.get(*id)?))),
            Self::PlanNotFound(id) => Ok(Some(format!(
                "Plan not found in config file: {}",
                wf.idents.get(*id)?
            ))),
            Self::DuplicateTaskName(id, pos) => Ok(Some(format!(
                "Duplicate task name: {}, declared at {}",
                wf.tasks.get(*id)?,
                pos
            ))),
            Self::SourceTaskNotFound(source) => Ok(Some(format!(
                "Referenced source task does not exist: {}",
                wf.tasks.get(*source)?
            ))),
            Self::SourceSlotNotFound(source, slot) => Ok(Some(format!(
                "Referenced source task {} has no output named {}",
                wf.tasks.get(*source)?,
                wf.idents.get(*slot)?
            ))),
            Self::UnboundParam(id, pos) => Ok(Some(format!(
                "Param {} is unbound; params must always have a value, declared at {}",
                wf.idents.get(*id)?,
                pos
            ))),
            Self::NonLiteralParam(id, pos) => Ok(Some(format!(
                "Param {} does not resolve to a literal value, declared at {}",
                wf.idents.get(*id)?,
                pos
            ))),
            _ => Ok(None),
        }
    }
}
