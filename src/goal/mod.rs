//! Savings goals and spending limits, and the pages for managing them.

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod goals_page;

pub use core::{
    Goal, GoalForm, GoalId, GoalKind, adjust_goal_amount, create_goal, create_goal_table,
    get_all_goals, get_goal, recompute_goal_amount,
};
pub use create_endpoint::create_goal_endpoint;
pub use create_page::get_create_goal_page;
pub use delete_endpoint::delete_goal_endpoint;
pub use edit_endpoint::edit_goal_endpoint;
pub use edit_page::get_edit_goal_page;
pub use goals_page::get_goals_page;
