mod handler;
mod model;

pub use handler::{
    get_employer, get_my_profile, list_employer_jobs, list_employers, list_my_jobs,
    update_my_profile, upload_avatar,
};
pub(crate) use model::current_employer;
