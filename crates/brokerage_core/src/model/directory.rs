//! Back-office people: sellers, users and roles.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberStatus {
    #[default]
    #[serde(rename = "Ativo")]
    Active,
    #[serde(rename = "Inativo")]
    Inactive,
    #[serde(rename = "Pendente")]
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub region: String,
    pub avatar_fallback: String,
    #[serde(default)]
    pub status: MemberStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    /// Route paths this role may open.
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role_id: String,
    pub role_name: String,
    #[serde(default)]
    pub status: MemberStatus,
}

/// Two-letter initials used as an avatar placeholder.
pub fn avatar_fallback(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if initials.is_empty() {
        "??".to_string()
    } else {
        initials
    }
}

#[cfg(test)]
mod tests {
    use super::avatar_fallback;

    #[test]
    fn initials_come_from_first_two_words() {
        assert_eq!(avatar_fallback("Bruno Vasconcelos"), "BV");
        assert_eq!(avatar_fallback("carla de matos"), "CD");
        assert_eq!(avatar_fallback("Rafael"), "R");
        assert_eq!(avatar_fallback("  "), "??");
    }
}
