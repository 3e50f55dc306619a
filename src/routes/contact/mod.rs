mod handler;
mod model;

pub use handler::{create_contact, list_contacts};
