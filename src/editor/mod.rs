//! Interactive plan editing
//!
//! [`PlanSession`] applies [`PlanEdit`] messages to a year's budget plan and
//! saves it through a [`Debouncer`], so a burst of edits costs one write.

pub mod debounce;
pub mod session;

pub use debounce::Debouncer;
pub use session::{PlanEdit, PlanSession};
