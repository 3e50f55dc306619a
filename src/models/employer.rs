use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employer {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub industry: String,
    pub location: String,
    pub size: String,
    pub description: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Editable part of an employer profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployerProfile {
    pub name: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub description: String,
}

/// Company card embedded in job detail responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployerSummary {
    pub id: String,
    pub name: String,
    pub industry: String,
    pub location: String,
    pub avatar: Option<String>,
}

impl Employer {
    pub fn apply_profile(&mut self, profile: EmployerProfile) {
        self.name = profile.name;
        self.industry = profile.industry;
        self.location = profile.location;
        self.size = profile.size;
        self.description = profile.description;
    }
}

impl From<Employer> for EmployerSummary {
    fn from(employer: Employer) -> Self {
        Self {
            id: employer.id,
            name: employer.name,
            industry: employer.industry,
            location: employer.location,
            avatar: employer.avatar,
        }
    }
}
