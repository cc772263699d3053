//! Core session types: the record that says who is logged in.
//!
//! Everything the portal knows about the current user lives in one
//! [`SessionRecord`]. The same shape is kept in memory, written to durable
//! storage, and handed to every screen that needs to know "who am I?".

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ProtocolError, StaffLoginResponse};

/// Placeholder credential carried by sessions created without a server
/// round-trip. It is never accepted by the API, so any request made with it
/// is rejected server-side.
pub const MOCK_TOKEN: &str = "mock-token";

/// Student identity used by the local (mock) login flow.
pub const DEMO_STUDENT_ID: &str = "STU-2024-001";

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// The coarse access class of a logged-in user.
///
/// The API reports staff roles as free-form strings (`"warden"`,
/// `"contractor"`, ...), so everything that isn't a student or the admin
/// is kept verbatim in [`Role::Staff`]. A [`StaffRole`] can only be made by
/// [`Role::parse`] (or [`Role::staff`]), so a role always reads back from
/// storage as the same variant it was written as.
///
/// `#[serde(from = "String", into = "String")]` makes a role travel as a
/// bare JSON string: `Role::Admin` is `"admin"`, not `{"Admin": null}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// A hostel resident. Logs in through the local flow.
    Student,

    /// Hostel administration.
    Admin,

    /// Any other staff designation reported by the server.
    Staff(StaffRole),
}

/// Name of a staff designation other than `student` or `admin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StaffRole(String);

impl StaffRole {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Role {
    /// Parses a role name as the API spells it. Matching is
    /// case-insensitive for the two built-in roles.
    pub fn parse(name: &str) -> Self {
        let trimmed = name.trim();
        if trimmed.eq_ignore_ascii_case("student") {
            Self::Student
        } else if trimmed.eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::Staff(StaffRole(trimmed.to_string()))
        }
    }

    /// Same as [`parse`](Self::parse); reads better at call sites naming a
    /// staff designation: `Role::staff("warden")`.
    pub fn staff(name: &str) -> Self {
        Self::parse(name)
    }

    /// Returns the role name as the API spells it.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Student => "student",
            Self::Admin => "admin",
            Self::Staff(name) => name.as_str(),
        }
    }

    /// Returns `true` for every role that must log in with credentials.
    pub fn is_staff(&self) -> bool {
        !matches!(self, Self::Student)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Staff(StaffRole(name)) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StudentProfile
// ---------------------------------------------------------------------------

/// Read-only details behind a student identity.
///
/// The portal never edits a profile; it only looks one up for the
/// logged-in student to show on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub student_id: String,
    pub name: String,
    pub enrollment: String,
    pub room: String,
    pub hostel: String,
    pub phone: String,
    pub email: String,
    pub guardian_contact: String,
}

impl StudentProfile {
    /// The demonstration student that every local student login resolves to.
    pub fn demo() -> Self {
        Self {
            student_id: DEMO_STUDENT_ID.to_string(),
            name: "Aarav Sharma".to_string(),
            enrollment: "2024CSE1042".to_string(),
            room: "B-214".to_string(),
            hostel: "Shivalik Boys Hostel".to_string(),
            phone: "+91 98765 43210".to_string(),
            email: "aarav.sharma@campus.edu".to_string(),
            guardian_contact: "+91 91234 56780".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionRecord
// ---------------------------------------------------------------------------

/// The single source of truth for "who is logged in, as what role, with
/// what credential".
///
/// The JSON form (camelCase keys) is exactly what lands in durable storage:
///
/// ```json
/// {"isLoggedIn":true,"role":"student","subRole":null,"studentId":"STU-2024-001",
///  "hostelName":"Shivalik Boys Hostel","token":"mock-token","userName":"Aarav Sharma"}
/// ```
///
/// Build records through [`logged_out`](Self::logged_out),
/// [`mock`](Self::mock), or [`staff`](Self::staff); those constructors keep
/// the invariants checked by [`validate`](Self::validate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Whether a valid identity is established.
    pub is_logged_in: bool,
    /// Coarse access class. `None` when logged out.
    pub role: Option<Role>,
    /// Fine-grained staff designation (e.g. "rector", "contractor").
    pub sub_role: Option<String>,
    /// Identity key when `role` is [`Role::Student`].
    pub student_id: Option<String>,
    /// Hostel the user is scoped to.
    pub hostel_name: Option<String>,
    /// Bearer credential for authenticated API calls.
    pub token: Option<String>,
    /// Display name.
    pub user_name: Option<String>,
}

impl SessionRecord {
    /// The fully logged-out record: `is_logged_in = false`, everything else
    /// `None`.
    pub fn logged_out() -> Self {
        Self {
            is_logged_in: false,
            role: None,
            sub_role: None,
            student_id: None,
            hostel_name: None,
            token: None,
            user_name: None,
        }
    }

    /// Synthesizes a session locally, without asking the server.
    ///
    /// Students get the demonstration identity (see
    /// [`StudentProfile::demo`]). Any other role uses its own name as the
    /// display name and has no student id. Both carry [`MOCK_TOKEN`].
    pub fn mock(role: Role, hostel: Option<String>) -> Self {
        match role {
            Role::Student => {
                let profile = StudentProfile::demo();
                Self {
                    is_logged_in: true,
                    role: Some(Role::Student),
                    sub_role: None,
                    student_id: Some(profile.student_id),
                    hostel_name: Some(hostel.unwrap_or(profile.hostel)),
                    token: Some(MOCK_TOKEN.to_string()),
                    user_name: Some(profile.name),
                }
            }
            staff => Self {
                is_logged_in: true,
                user_name: Some(staff.as_str().to_string()),
                role: Some(staff),
                sub_role: None,
                student_id: None,
                hostel_name: hostel,
                token: Some(MOCK_TOKEN.to_string()),
            },
        }
    }

    /// Builds a session from a successful staff-login response.
    ///
    /// The hostel scope prefers the server's `subRole` and falls back to
    /// the hostel the user picked on the login screen.
    pub fn staff(response: StaffLoginResponse, hostel: Option<String>) -> Self {
        let StaffLoginResponse { token, user } = response;
        Self {
            is_logged_in: true,
            role: Some(Role::parse(&user.role)),
            hostel_name: user.sub_role.clone().or(hostel),
            sub_role: user.sub_role,
            student_id: None,
            token: Some(token),
            user_name: Some(user.name),
        }
    }

    /// Returns `true` if this session was synthesized locally.
    pub fn is_mock(&self) -> bool {
        self.token.as_deref() == Some(MOCK_TOKEN)
    }

    /// Checks the record invariants.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidRecord`] when:
    /// - a logged-out record still carries identity fields,
    /// - a logged-in record has no role, a blank role, or no token,
    /// - a student record has no student id.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if !self.is_logged_in {
            if *self != Self::logged_out() {
                return Err(ProtocolError::InvalidRecord(
                    "logged-out record carries identity fields".into(),
                ));
            }
            return Ok(());
        }

        let role = self.role.as_ref().ok_or_else(|| {
            ProtocolError::InvalidRecord("logged-in record has no role".into())
        })?;

        if role.as_str().is_empty() {
            return Err(ProtocolError::InvalidRecord(
                "logged-in record has a blank role".into(),
            ));
        }

        if self.token.as_deref().is_none_or(str::is_empty) {
            return Err(ProtocolError::InvalidRecord(
                "logged-in record has no token".into(),
            ));
        }

        if *role == Role::Student && self.student_id.is_none() {
            return Err(ProtocolError::InvalidRecord(
                "student record has no student id".into(),
            ));
        }

        Ok(())
    }
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::logged_out()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaffUser;

    fn staff_response(sub_role: Option<&str>) -> StaffLoginResponse {
        StaffLoginResponse {
            token: "jwt-abc".into(),
            user: StaffUser {
                role: "admin".into(),
                sub_role: sub_role.map(str::to_string),
                name: "Meera Iyer".into(),
            },
        }
    }

    // =====================================================================
    // Role
    // =====================================================================

    #[test]
    fn test_role_parse_builtin_roles_case_insensitive() {
        assert_eq!(Role::parse("Student"), Role::Student);
        assert_eq!(Role::parse("ADMIN"), Role::Admin);
    }

    #[test]
    fn test_role_parse_unknown_keeps_name_as_staff() {
        let warden = Role::parse(" warden ");
        assert!(matches!(&warden, Role::Staff(name) if name.as_str() == "warden"));
        assert!(Role::parse("warden").is_staff());
        assert!(!Role::Student.is_staff());
    }

    #[test]
    fn test_role_serializes_as_bare_string() {
        let json = serde_json::to_string(&Role::staff("contractor"))
            .unwrap();
        assert_eq!(json, r#""contractor""#);

        let role: Role = serde_json::from_str(r#""admin""#).unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_role_staff_with_builtin_name_is_builtin_role() {
        assert_eq!(Role::staff("student"), Role::Student);
        assert_eq!(Role::staff("Admin"), Role::Admin);
        assert!(!Role::staff("student").is_staff());
    }

    #[test]
    fn test_role_json_round_trip_keeps_variant() {
        for role in [Role::Student, Role::Admin, Role::staff("warden")] {
            let json = serde_json::to_string(&role).unwrap();
            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
        }
    }

    // =====================================================================
    // SessionRecord constructors
    // =====================================================================

    #[test]
    fn test_logged_out_has_no_identity_fields() {
        let record = SessionRecord::logged_out();
        assert!(!record.is_logged_in);
        assert!(record.role.is_none());
        assert!(record.token.is_none());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_mock_student_uses_demo_identity() {
        let record = SessionRecord::mock(Role::Student, None);

        assert!(record.is_logged_in);
        assert_eq!(record.role, Some(Role::Student));
        assert_eq!(record.student_id.as_deref(), Some(DEMO_STUDENT_ID));
        assert_eq!(record.token.as_deref(), Some(MOCK_TOKEN));
        assert_eq!(
            record.hostel_name.as_deref(),
            Some(StudentProfile::demo().hostel.as_str())
        );
        assert!(record.is_mock());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_mock_staff_uses_role_as_display_name() {
        let record =
            SessionRecord::mock(Role::Admin, Some("Kaveri Hostel".into()));

        assert_eq!(record.user_name.as_deref(), Some("admin"));
        assert_eq!(record.student_id, None);
        assert_eq!(record.hostel_name.as_deref(), Some("Kaveri Hostel"));
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_staff_hostel_prefers_sub_role() {
        let record = SessionRecord::staff(
            staff_response(Some("rector")),
            Some("Kaveri Hostel".into()),
        );

        assert_eq!(record.hostel_name.as_deref(), Some("rector"));
        assert_eq!(record.sub_role.as_deref(), Some("rector"));
        assert_eq!(record.token.as_deref(), Some("jwt-abc"));
        assert!(!record.is_mock());
    }

    #[test]
    fn test_staff_hostel_falls_back_to_selected_hostel() {
        let record = SessionRecord::staff(
            staff_response(None),
            Some("Kaveri Hostel".into()),
        );

        assert_eq!(record.hostel_name.as_deref(), Some("Kaveri Hostel"));
        assert_eq!(record.user_name.as_deref(), Some("Meera Iyer"));
    }

    // =====================================================================
    // validate()
    // =====================================================================

    #[test]
    fn test_validate_logged_out_with_token_is_invalid() {
        let mut record = SessionRecord::logged_out();
        record.token = Some("leftover".into());

        assert!(matches!(
            record.validate(),
            Err(ProtocolError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_validate_logged_in_without_token_is_invalid() {
        let mut record = SessionRecord::mock(Role::Admin, None);
        record.token = None;

        assert!(record.validate().is_err());
    }

    #[test]
    fn test_validate_student_without_id_is_invalid() {
        let mut record = SessionRecord::mock(Role::Student, None);
        record.student_id = None;

        assert!(record.validate().is_err());
    }

    #[test]
    fn test_validate_blank_staff_role_is_invalid() {
        let mut response = staff_response(None);
        response.user.role = "  ".into();
        let record = SessionRecord::staff(response, None);

        assert_eq!(record.role.as_ref().map(Role::as_str), Some(""));
        assert!(matches!(
            record.validate(),
            Err(ProtocolError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_record_json_uses_camel_case_keys() {
        let json =
            serde_json::to_value(SessionRecord::mock(Role::Student, None))
                .unwrap();

        assert_eq!(json["isLoggedIn"], true);
        assert_eq!(json["studentId"], DEMO_STUDENT_ID);
        assert_eq!(json["token"], MOCK_TOKEN);
        assert!(json["subRole"].is_null());
    }
}
