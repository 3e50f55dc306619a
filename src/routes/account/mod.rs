mod handler;
mod model;

pub use handler::{
    delete_account, list_accounts, login, me, register_candidate, register_employer,
};
pub(crate) use model::require_name;
pub use model::seed_admin;
