mod handler;
mod model;

pub use handler::{create_sample_cv, delete_sample_cv, list_sample_cvs};
