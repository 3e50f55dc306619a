mod handler;
mod model;

pub use handler::{
    admin_list_jobs, create_job, delete_job, expire_job, get_job, list_jobs, purge_expired,
    set_lock, update_job,
};
pub(crate) use model::{blank_to_none, find_job, managed_job};
pub use model::JobCard;
