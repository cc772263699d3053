//! Request and response bodies for the hostel API.

use serde::{Deserialize, Serialize};

/// Body of `POST {base}/auth/staff-login`.
///
/// Borrows the credentials so the password is only copied into the
/// serialized request, never into another owned `String`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffLoginBody<'a> {
    pub staff_id: &'a str,
    pub password: &'a str,
}

/// Success body of the staff-login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffLoginResponse {
    /// Bearer token for subsequent authenticated calls.
    pub token: String,
    pub user: StaffUser,
}

/// The `user` object inside [`StaffLoginResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUser {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_role: Option<String>,
    pub name: String,
}

/// Body the API sends with any non-2xx response.
///
/// Every field is optional: a proxy in front of the API may answer with an
/// empty or non-JSON body, in which case callers fall back to a generic
/// message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
