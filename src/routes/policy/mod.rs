mod handler;
mod model;

pub use handler::{create_policy, delete_policy, get_policy, list_policies, update_policy};
