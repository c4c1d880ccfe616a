//! Agent tool adapters.

mod project_brief;

pub use project_brief::{
    submit_project_brief_tool, SubmitProjectBriefParams, SubmitProjectBriefResult,
    SubmitProjectBriefTool, SUBMIT_PROJECT_BRIEF,
};
