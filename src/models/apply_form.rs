use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i16)]
pub enum ApplyStatus {
    NotReviewed = 0,
    Suitable = 1,
    NotSuitable = 2,
}

/// A candidate's application to a job posting, keyed by the pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplyForm {
    pub job_posting_id: String,
    pub candidate_id: String,
    pub cover_letter: String,
    pub cv: Option<String>,
    pub status: ApplyStatus,
    pub applied_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewApplyForm {
    pub job_posting_id: String,
    pub candidate_id: String,
    pub cover_letter: String,
    pub cv: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ApplicationCounts {
    pub total: i64,
    pub not_reviewed: i64,
    pub suitable: i64,
    pub not_suitable: i64,
}

impl ApplicationCounts {
    pub fn tally<'a>(forms: impl IntoIterator<Item = &'a ApplyForm>) -> Self {
        forms.into_iter().fold(Self::default(), |mut counts, form| {
            counts.total += 1;
            match form.status {
                ApplyStatus::NotReviewed => counts.not_reviewed += 1,
                ApplyStatus::Suitable => counts.suitable += 1,
                ApplyStatus::NotSuitable => counts.not_suitable += 1,
            }
            counts
        })
    }
}
