mod handler;
mod model;

pub use handler::{
    get_candidate, get_my_profile, list_my_applications, update_my_profile, upload_avatar,
    upload_cv,
};
pub(crate) use model::current_candidate;
