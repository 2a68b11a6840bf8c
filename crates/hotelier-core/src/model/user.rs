// ── Authenticated user ──

use serde::Serialize;
use strum::{Display, EnumString};

/// Roles the frontend routes on. Anything else is treated as a guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Role {
    Admin,
    Receptionist,
    Guest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    /// Primary role as reported by the server.
    pub role: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl User {
    /// Role check against both the primary role and the role list,
    /// ignoring case.
    pub fn has_role(&self, role: &str) -> bool {
        self.role.eq_ignore_ascii_case(role) || self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|r| self.has_role(r))
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Highest-privilege known role held by the user.
    pub fn primary_role(&self) -> Role {
        if self.has_role("ADMIN") {
            Role::Admin
        } else if self.has_role("RECEPTIONIST") {
            Role::Receptionist
        } else {
            Role::Guest
        }
    }
}
