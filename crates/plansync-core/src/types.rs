use crate::error::PlanError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// PhaseStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Complete,
    InProgress,
    Pending,
    Blocked,
}

impl PhaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseStatus::Complete => "complete",
            PhaseStatus::InProgress => "in_progress",
            PhaseStatus::Pending => "pending",
            PhaseStatus::Blocked => "blocked",
        }
    }

    /// Upper-case form with spaces, as shown in the rendering (`IN PROGRESS`).
    pub fn label(self) -> &'static str {
        match self {
            PhaseStatus::Complete => "COMPLETE",
            PhaseStatus::InProgress => "IN PROGRESS",
            PhaseStatus::Pending => "PENDING",
            PhaseStatus::Blocked => "BLOCKED",
        }
    }

    /// Lenient mapping used for legacy headings. Unknown text is `Pending`.
    pub fn from_label(text: &str) -> PhaseStatus {
        let normalized = text.trim().to_ascii_uppercase().replace('_', " ");
        match normalized.as_str() {
            "COMPLETE" | "COMPLETED" => PhaseStatus::Complete,
            "IN PROGRESS" => PhaseStatus::InProgress,
            "BLOCKED" => PhaseStatus::Blocked,
            _ => PhaseStatus::Pending,
        }
    }
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PhaseStatus {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "complete" => Ok(PhaseStatus::Complete),
            "in_progress" => Ok(PhaseStatus::InProgress),
            "pending" => Ok(PhaseStatus::Pending),
            "blocked" => Ok(PhaseStatus::Blocked),
            _ => Err(PlanError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Blocked,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "blocked" => Ok(TaskStatus::Blocked),
            _ => Err(PlanError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TaskSize
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl TaskSize {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskSize::Small => "small",
            TaskSize::Medium => "medium",
            TaskSize::Large => "large",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskSize::Small => "SMALL",
            TaskSize::Medium => "MEDIUM",
            TaskSize::Large => "LARGE",
        }
    }
}

impl fmt::Display for TaskSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskSize {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(TaskSize::Small),
            "medium" => Ok(TaskSize::Medium),
            "large" => Ok(TaskSize::Large),
            _ => Err(PlanError::InvalidSize(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// MigrationStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStatus {
    Migrated,
    MigrationFailed,
}

impl MigrationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MigrationStatus::Migrated => "migrated",
            MigrationStatus::MigrationFailed => "migration_failed",
        }
    }
}

impl fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
