//! User records as exchanged with the remote users resource.

use serde::{Deserialize, Serialize};

/// Postal address of a user. Only the fields the client edits are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Company {
    #[serde(default)]
    pub name: String,
}

/// A user as returned by the remote service.
///
/// `address` and `company` default to empty values when the payload omits
/// them, so rendering a partial record never fails.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub company: Company,
}

/// Request body for create and update. Never carries an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub address: Address,
    pub company: Company,
    pub website: String,
}

#[cfg(test)]
pub(crate) fn sample_users() -> Vec<User> {
    serde_json::from_str(include_str!("../fixtures/users.json")).expect("fixture parses")
}
