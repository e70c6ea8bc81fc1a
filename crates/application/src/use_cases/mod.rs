//! Application use cases (business logic orchestration).

mod run_checklist;

pub use run_checklist::RunChecklist;
