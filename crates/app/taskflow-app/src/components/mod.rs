//! View-models for the parts of the TaskFlow screen.

mod auth_modal;
mod dashboard;
mod filters;
mod header;
mod task_card;
mod task_list;
mod task_modal;

pub use auth_modal::AuthModal;
pub use dashboard::{Dashboard, StatCard};
pub use filters::FilterControls;
pub use header::Header;
pub use task_card::{TaskCard, TaskCardView, format_date};
pub use task_list::{TaskList, TaskListState};
pub use task_modal::{TaskForm, TaskModal};
