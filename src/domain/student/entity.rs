//! Student entity

use serde::{Deserialize, Serialize};

/// Student identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(i64);

impl StudentId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A platform user who can be placed on a team
///
/// Instructors are users too; `is_staff` keeps them out of serialized rosters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    id: StudentId,
    name: String,
    github_handle: String,
    slack_handle: String,
    #[serde(default)]
    is_staff: bool,
}

impl Student {
    pub fn new(
        id: StudentId,
        name: impl Into<String>,
        github_handle: impl Into<String>,
        slack_handle: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            github_handle: github_handle.into(),
            slack_handle: slack_handle.into(),
            is_staff: false,
        }
    }

    /// Mark the user as staff (builder pattern)
    pub fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }

    pub fn id(&self) -> StudentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn github_handle(&self) -> &str {
        &self.github_handle
    }

    pub fn slack_handle(&self) -> &str {
        &self.slack_handle
    }

    pub fn is_staff(&self) -> bool {
        self.is_staff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_defaults_to_non_staff() {
        let student = Student::new(StudentId::new(1), "Ada", "ada-gh", "U0ADA");
        assert!(!student.is_staff());
        assert!(student.staff().is_staff());
    }

    #[test]
    fn test_student_deserialization_without_staff_flag() {
        let json = r#"{"id": 4, "name": "Grace", "github_handle": "grace", "slack_handle": "U0G"}"#;
        let student: Student = serde_json::from_str(json).unwrap();

        assert_eq!(student.id(), StudentId::new(4));
        assert!(!student.is_staff());
    }
}
