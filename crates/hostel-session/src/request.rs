//! The tagged login input.
//!
//! The caller says which flow it wants. The repository never guesses the
//! flow from which optional fields happen to be filled in.

use hostel_protocol::Role;
use secrecy::SecretString;

/// What the login screen asks for.
#[derive(Debug)]
pub enum LoginRequest {
    /// Credentialed login, verified by the server. Staff roles only.
    StaffCredentials {
        role: Role,
        staff_id: String,
        password: SecretString,
        /// Hostel picked on the login screen; used when the server reports
        /// no `subRole`.
        hostel: Option<String>,
    },

    /// Local login without a server round-trip. Students always; staff
    /// roles only when
    /// [`SessionConfig::allow_mock_staff`](crate::SessionConfig::allow_mock_staff)
    /// is set.
    RoleOnly { role: Role, hostel: Option<String> },
}

impl LoginRequest {
    /// Local student login with the demonstration identity.
    pub fn student() -> Self {
        Self::RoleOnly {
            role: Role::Student,
            hostel: None,
        }
    }

    /// Local login for any role.
    pub fn role_only(role: Role) -> Self {
        Self::RoleOnly { role, hostel: None }
    }

    /// Credentialed staff login.
    pub fn staff(
        role: Role,
        staff_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::StaffCredentials {
            role,
            staff_id: staff_id.into(),
            password: SecretString::from(password.into()),
            hostel: None,
        }
    }

    /// Sets the hostel picked on the login screen.
    pub fn with_hostel(mut self, hostel: impl Into<String>) -> Self {
        match &mut self {
            Self::StaffCredentials { hostel: slot, .. }
            | Self::RoleOnly { hostel: slot, .. } => {
                *slot = Some(hostel.into());
            }
        }
        self
    }

    /// The role the user asked to log in as.
    pub fn role(&self) -> &Role {
        match self {
            Self::StaffCredentials { role, .. } | Self::RoleOnly { role, .. } => {
                role
            }
        }
    }
}
