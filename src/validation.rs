//! Integrity checks for job lists.
//!
//! Reports structural problems in a batch of jobs before they are
//! loaded into a store. Detects:
//! - Duplicate job IDs
//! - Zero-day durations
//! - `depends_on` references to jobs that are not in the batch
//! - Circular `depends_on` chains
//!
//! Nothing here gates a reschedule; dependencies are informational and
//! the coordinator never enforces them.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use crate::models::Job;
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two jobs share the same ID.
    DuplicateId,
    /// A job declares a duration of zero days.
    ZeroDuration,
    /// A job depends on a job that doesn't exist.
    InvalidDependency,
    /// Dependency chain loops back on itself.
    CyclicDependency,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a batch of jobs.
///
/// Checks:
/// 1. No duplicate job IDs
/// 2. No explicit zero-day durations (they are read as one day, which
///    usually hides a data-entry mistake)
/// 3. Every `depends_on` points at a job in the batch
/// 4. No circular dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_jobs(jobs: &[Job]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    for job in jobs {
        if !ids.insert(job.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate job ID: {}", job.id),
            ));
        }
        if job.duration_days == Some(0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroDuration,
                format!("Job '{}' has a zero-day duration", job.id),
            ));
        }
    }

    for job in jobs {
        if let Some(dep) = &job.depends_on {
            if !ids.contains(dep.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDependency,
                    format!("Job '{}' depends on unknown job '{}'", job.id, dep),
                ));
            }
        }
    }

    if let Some(cycle_err) = detect_cycles(jobs) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the dependency graph using DFS.
///
/// # Algorithm
/// If a back-edge is found (visiting a node currently in the recursion
/// stack), a cycle exists. Nodes are visited in batch order so the
/// reported job is deterministic.
fn detect_cycles(jobs: &[Job]) -> Option<ValidationError> {
    // dependency -> dependents
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for job in jobs {
        if let Some(dep) = &job.depends_on {
            adj.entry(dep.as_str()).or_default().push(job.id.as_str());
        }
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for job in jobs {
        let node = job.id.as_str();
        if !visited.contains(node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving job '{node}'"),
            ));
        }
    }

    None
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(node) {
        for &next in neighbors {
            if in_stack.contains(next) {
                return true; // Back edge
            }
            if !visited.contains(next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(node);
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_jobs() -> Vec<Job> {
        vec![
            Job::new("J1").with_name("Base prep").with_duration(2),
            Job::new("J2")
                .with_name("Asphalt overlay")
                .with_dependency("J1"),
            Job::new("J3").with_name("Line painting").with_dependency("J2"),
        ]
    }

    #[test]
    fn test_valid_jobs() {
        assert!(validate_jobs(&sample_jobs()).is_ok());
    }

    #[test]
    fn test_duplicate_job_id() {
        let jobs = vec![Job::new("J1"), Job::new("J1")];
        let errors = validate_jobs(&jobs).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_zero_duration() {
        let jobs = vec![Job::new("J1").with_duration(0)];
        let errors = validate_jobs(&jobs).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::ZeroDuration);
    }

    #[test]
    fn test_unknown_dependency() {
        let jobs = vec![Job::new("J1").with_dependency("NONEXISTENT")];
        let errors = validate_jobs(&jobs).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidDependency));
    }

    #[test]
    fn test_cyclic_dependency() {
        // J1 -> J2 -> J3 -> J1
        let jobs = vec![
            Job::new("J1").with_dependency("J3"),
            Job::new("J2").with_dependency("J1"),
            Job::new("J3").with_dependency("J2"),
        ];
        let errors = validate_jobs(&jobs).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::CyclicDependency));
    }

    #[test]
    fn test_self_dependency_is_cycle() {
        let jobs = vec![Job::new("J1").with_dependency("J1")];
        let errors = validate_jobs(&jobs).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::CyclicDependency);
    }

    #[test]
    fn test_multiple_errors() {
        let jobs = vec![
            Job::new("J1").with_duration(0),
            Job::new("J2").with_dependency("UNKNOWN"),
        ];
        let errors = validate_jobs(&jobs).unwrap_err();
        assert!(errors.len() >= 2);
    }
}
