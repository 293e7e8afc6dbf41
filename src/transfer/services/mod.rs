//! Application services for transfer planning and execution.

mod error;
mod lifecycle;
mod planning;

pub use error::{TransferServiceError, TransferServiceResult};
pub use lifecycle::ExecutionReport;
pub use planning::{AddTaskOutcome, AddTransferTaskRequest, CreatePlanRequest, TransferPlanService};
