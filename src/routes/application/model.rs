use serde::{Deserialize, Serialize};

use crate::models::{ApplyForm, ApplyStatus, Candidate};

#[derive(Debug, Default, Deserialize)]
pub struct ApplyRequest {
    #[serde(default)]
    pub cover_letter: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub status: ApplyStatus,
}

#[derive(Debug, Deserialize)]
pub struct ApplicantsQuery {
    pub status: Option<ApplyStatus>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// An application as seen by the employer, with the applicant's profile.
#[derive(Debug, Serialize)]
pub struct Applicant {
    #[serde(flatten)]
    pub application: ApplyForm,
    pub candidate: Option<Candidate>,
}

pub(super) const MAX_COVER_LETTER_CHARS: usize = 5000;
