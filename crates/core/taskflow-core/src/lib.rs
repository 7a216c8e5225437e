//! Core records and pure projections for the TaskFlow client.
//!
//! Everything in this crate is free of I/O: the task and user records as the
//! backend stores them, the client-side filter predicates, the status ring used
//! by task cards, and the read-only dashboard statistics.

mod filter;
mod stats;
mod types;

pub use filter::{DateRange, FilterPatch, TaskFilters};
pub use stats::{DashboardStats, completion_rate};
pub use types::{
    CreateTaskData, NewTask, ParseError, Task, TaskId, TaskPriority, TaskStatus, TaskUpdate,
    User, UserId, due_date, parse_due_date,
};
