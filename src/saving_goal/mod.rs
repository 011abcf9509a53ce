//! Saving goals that family members are working towards.

mod api;
mod core;
mod db;
mod page;

pub use api::{
    create_saving_goal_endpoint, delete_saving_goal_endpoint, list_saving_goals_endpoint,
    update_saving_goal_endpoint,
};
pub use core::{GoalStatus, SavingGoal, create_saving_goal_table};
pub use page::get_savings_goals_page;

#[cfg(test)]
pub use core::GoalType;
