use serde::{Deserialize, Serialize};

/// Role a user is assigned to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Number of users currently assigned this role.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub usage: u64,
}

/// Back-office user.
///
/// `password` carries plaintext on the way in and the stored digest on the
/// way out of storage. It is accepted on deserialization but never
/// serialized; an empty value on update leaves the stored digest unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub role_id: i32,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl User {
    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    /// Drop the stored digest before handing the user to a caller.
    pub fn without_password(mut self) -> Self {
        self.password.clear();
        self
    }
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}
