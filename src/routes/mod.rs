pub mod account;
pub mod application;
pub mod candidate;
pub mod contact;
pub mod employer;
pub mod job;
pub mod policy;
pub mod sample_cv;
