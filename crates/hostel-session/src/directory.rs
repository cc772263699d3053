//! Read-only lookup of student profiles.

use hostel_protocol::StudentProfile;

/// Resolves a student id to the profile shown on the student dashboard.
///
/// A student session is only ever created for an id this lookup knows, so
/// [`SessionRepository::student_profile`](crate::SessionRepository::student_profile)
/// resolves for every logged-in student.
pub trait StudentDirectory: Send + Sync + 'static {
    fn lookup(&self, student_id: &str) -> Option<StudentProfile>;
}

/// Knows exactly one student: [`StudentProfile::demo`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoStudentDirectory;

impl StudentDirectory for DemoStudentDirectory {
    fn lookup(&self, student_id: &str) -> Option<StudentProfile> {
        let demo = StudentProfile::demo();
        (demo.student_id == student_id).then_some(demo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostel_protocol::DEMO_STUDENT_ID;

    #[test]
    fn test_demo_directory_resolves_only_demo_student() {
        let directory = DemoStudentDirectory;
        assert_eq!(
            directory.lookup(DEMO_STUDENT_ID).map(|p| p.student_id),
            Some(DEMO_STUDENT_ID.to_string())
        );
        assert!(directory.lookup("STU-0000").is_none());
    }
}
