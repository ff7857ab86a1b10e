//! Tasks: the entity model, batch merging, complexity assessment, search
//! and the JSON-backed store that ties them together.

pub mod batch;
pub mod complexity;
pub mod model;
pub mod search;
pub mod store;

pub use complexity::{ComplexityAssessment, ComplexityLevel};
pub use model::{
    NewTask, RelatedFile, RelatedFileType, Task, TaskContentUpdate, TaskDependency, TaskInput,
    TaskPatch, TaskStatus, UpdateMode,
};
pub use search::{SearchOptions, SearchPage};
pub use store::{ClearOutcome, DeleteOutcome, ExecutionCheck, TaskStore, UpdateOutcome};
