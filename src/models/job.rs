use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPosting {
    pub id: String,
    pub employer_id: String,
    pub title: String,
    pub position: String,
    pub description: String,
    pub location: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub experience: String,
    pub quantity: i32,
    pub industry: String,
    pub expires_at: DateTime<Utc>,
    pub lock_flg: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields an employer supplies when creating or editing a posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    #[serde(default)]
    pub experience: String,
    pub quantity: i32,
    #[serde(default)]
    pub industry: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Open,
    Expired,
    Locked,
}

/// Display value derived from a posting's expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRemaining {
    Days(i64),
    Hours(i64),
    Minutes(i64),
    Expired,
}

impl TimeRemaining {
    pub fn between(now: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        let left = expires_at - now;
        if left.num_days() >= 1 {
            TimeRemaining::Days(left.num_days())
        } else if left.num_hours() >= 1 {
            TimeRemaining::Hours(left.num_hours())
        } else if left.num_minutes() >= 1 {
            TimeRemaining::Minutes(left.num_minutes())
        } else if left.num_seconds() > 0 {
            TimeRemaining::Minutes(1)
        } else {
            TimeRemaining::Expired
        }
    }
}

impl std::fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (n, unit) = match *self {
            TimeRemaining::Days(n) => (n, "day"),
            TimeRemaining::Hours(n) => (n, "hour"),
            TimeRemaining::Minutes(n) => (n, "minute"),
            TimeRemaining::Expired => return f.write_str("Expired"),
        };
        let plural = if n == 1 { "" } else { "s" };
        write!(f, "{} {}{} left", n, unit, plural)
    }
}

impl Serialize for TimeRemaining {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl JobPosting {
    pub fn is_locked(&self) -> bool {
        self.lock_flg != 0
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> JobStatus {
        if self.is_locked() {
            JobStatus::Locked
        } else if self.expires_at <= now {
            JobStatus::Expired
        } else {
            JobStatus::Open
        }
    }

    pub fn time_remaining_at(&self, now: DateTime<Utc>) -> TimeRemaining {
        TimeRemaining::between(now, self.expires_at)
    }

    pub fn apply_draft(&mut self, draft: JobDraft) {
        self.title = draft.title;
        self.position = draft.position;
        self.description = draft.description;
        self.location = draft.location;
        self.salary_min = draft.salary_min;
        self.salary_max = draft.salary_max;
        self.experience = draft.experience;
        self.quantity = draft.quantity;
        self.industry = draft.industry;
        self.expires_at = draft.expires_at;
    }
}

/// Listing criteria. Text filters are case-insensitive substring matches.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub employer_id: Option<String>,
    pub status: Option<JobStatus>,
    pub lock_flg: Option<i16>,
    /// Matches title or location.
    pub search: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
}

impl JobFilter {
    pub fn open() -> Self {
        Self {
            status: Some(JobStatus::Open),
            ..Default::default()
        }
    }

    pub fn matches(&self, job: &JobPosting, now: DateTime<Utc>) -> bool {
        if let Some(employer_id) = &self.employer_id {
            if &job.employer_id != employer_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if job.status_at(now) != status {
                return false;
            }
        }
        if let Some(lock_flg) = self.lock_flg {
            if job.lock_flg != lock_flg {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !contains_ci(&job.title, search) && !contains_ci(&job.location, search) {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !contains_ci(&job.location, location) {
                return false;
            }
        }
        if let Some(industry) = &self.industry {
            if !contains_ci(&job.industry, industry) {
                return false;
            }
        }
        true
    }
}

pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub jobs: u64,
    pub applications: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn posting(expires_at: DateTime<Utc>, lock_flg: i16) -> JobPosting {
        let now = Utc::now();
        JobPosting {
            id: "job-1".into(),
            employer_id: "emp-1".into(),
            title: "Backend Engineer".into(),
            position: "Senior".into(),
            description: String::new(),
            location: "Hanoi".into(),
            salary_min: Some(1000),
            salary_max: Some(2000),
            experience: "3 years".into(),
            quantity: 1,
            industry: "Software".into(),
            expires_at,
            lock_flg,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn status_follows_expiry_and_lock() {
        let now = Utc::now();
        assert_eq!(posting(now + Duration::days(1), 0).status_at(now), JobStatus::Open);
        assert_eq!(posting(now, 0).status_at(now), JobStatus::Expired);
        assert_eq!(posting(now - Duration::days(1), 0).status_at(now), JobStatus::Expired);
        assert_eq!(posting(now + Duration::days(1), 1).status_at(now), JobStatus::Locked);
    }

    #[test]
    fn time_remaining_picks_largest_unit() {
        let now = Utc::now();
        assert_eq!(
            TimeRemaining::between(now, now + Duration::days(3) + Duration::hours(5)),
            TimeRemaining::Days(3)
        );
        assert_eq!(
            TimeRemaining::between(now, now + Duration::hours(5) + Duration::minutes(2)),
            TimeRemaining::Hours(5)
        );
        assert_eq!(
            TimeRemaining::between(now, now + Duration::minutes(42)),
            TimeRemaining::Minutes(42)
        );
        assert_eq!(TimeRemaining::between(now, now - Duration::seconds(1)), TimeRemaining::Expired);
    }

    #[test]
    fn time_remaining_renders_for_display() {
        assert_eq!(TimeRemaining::Days(1).to_string(), "1 day left");
        assert_eq!(TimeRemaining::Hours(2).to_string(), "2 hours left");
        assert_eq!(TimeRemaining::Expired.to_string(), "Expired");
        assert_eq!(serde_json::to_value(TimeRemaining::Minutes(3)).unwrap(), "3 minutes left");
    }

    #[test]
    fn search_matches_title_or_location() {
        let now = Utc::now();
        let job = posting(now + Duration::days(2), 0);
        let by_title = JobFilter {
            search: Some("backend".into()),
            ..Default::default()
        };
        let by_location = JobFilter {
            search: Some("HANOI".into()),
            ..Default::default()
        };
        let miss = JobFilter {
            search: Some("designer".into()),
            ..Default::default()
        };
        assert!(by_title.matches(&job, now));
        assert!(by_location.matches(&job, now));
        assert!(!miss.matches(&job, now));
    }

    #[test]
    fn open_filter_excludes_locked_and_expired() {
        let now = Utc::now();
        let filter = JobFilter::open();
        assert!(filter.matches(&posting(now + Duration::hours(1), 0), now));
        assert!(!filter.matches(&posting(now + Duration::hours(1), 1), now));
        assert!(!filter.matches(&posting(now - Duration::hours(1), 0), now));
    }
}
