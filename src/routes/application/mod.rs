mod handler;
mod model;

pub use handler::{apply, list_job_applications, review, withdraw};
