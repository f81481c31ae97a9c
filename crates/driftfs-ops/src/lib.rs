//! Transfer planning and execution engine for driftfs.
//!
//! Planners turn a move, copy, delete or trash request into a lazy,
//! ordered sequence of sized tasks; the executor runs them one at a
//! time, stopping on the first failure. Callers that need a progress
//! bar realize the plan with [`measure`] first; callers that just
//! want the work done use the convenience wrappers.

mod copy;
mod delete;
mod executor;
mod move_op;
mod plan;
mod precondition;

pub use copy::{CopyFile, plan_copy};
pub use delete::{plan_delete, plan_trash};
pub use executor::{copy_entry, delete, execute, move_entry, move_to_trash};
pub use move_op::plan_move;
pub use plan::{StatCache, TaskPlan, measure};
pub use precondition::check_transfer;
