use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{CandidateProfile, EmployerProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[repr(i16)]
pub enum Role {
    Admin = 0,
    Employer = 1,
    Candidate = 2,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Employer => "Employer",
            Role::Candidate => "Candidate",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Profile created in the same transaction as its owning account.
#[derive(Debug, Clone)]
pub enum ProfileDraft {
    Candidate(CandidateProfile),
    Employer(EmployerProfile),
}

impl ProfileDraft {
    pub fn role(&self) -> Role {
        match self {
            ProfileDraft::Candidate(_) => Role::Candidate,
            ProfileDraft::Employer(_) => Role::Employer,
        }
    }
}
