//! Application services for checklist tasks.

mod service;

pub use service::{
    ChecklistService, ChecklistServiceError, ChecklistServiceResult, CompletionReport,
    CreateChecklistTaskRequest,
};
