//! User profile domain model

use serde::{Deserialize, Serialize};

/// Profile of the signed-in user, as served by the user service.
/// Read-only from the client's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    /// Numeric on the wire
    pub phone_number: i64,
    pub email: String,
    pub profile_pic: Option<String>,
}

impl User {
    /// "First Last" for display
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Phone grouped as "986 204 8854". Short numbers print as-is.
    pub fn formatted_phone(&self) -> String {
        let digits = self.phone_number.to_string();
        if digits.len() <= 6 {
            return digits;
        }
        format!("{} {} {}", &digits[..3], &digits[3..6], &digits[6..])
    }
}
