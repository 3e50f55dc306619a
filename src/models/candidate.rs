use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: String,
    pub account_id: String,
    pub full_name: String,
    pub phone: String,
    pub location: String,
    pub experience: String,
    pub industry: String,
    pub description: String,
    pub avatar: Option<String>,
    pub cv: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Editable part of a candidate profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub description: String,
}

impl Candidate {
    pub fn apply_profile(&mut self, profile: CandidateProfile) {
        self.full_name = profile.full_name;
        self.phone = profile.phone;
        self.location = profile.location;
        self.experience = profile.experience;
        self.industry = profile.industry;
        self.description = profile.description;
    }
}
