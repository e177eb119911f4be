//! Back-office directory: users, roles and sellers.
//!
//! # Responsibility
//! - Hold the people/permission lists behind the admin screens.
//! - Enforce referential rules between users and roles.
//!
//! # Invariants
//! - A role held by any user cannot be deleted.
//! - `User::role_name` always mirrors the referenced role (or `N/A`).
//! - Seller ids are unique even after deletions.

use crate::model::directory::{avatar_fallback, MemberStatus, Role, Seller, User};
use crate::model::generate_id;
use log::info;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const UNKNOWN_ROLE_NAME: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminError {
    EmptyRoleName,
    RoleInUse { role_id: String, count: usize },
    RoleNotFound(String),
    BlankUserField(&'static str),
    PasswordMismatch,
    /// New users must be created with a password.
    PasswordRequired,
    UserNotFound(String),
}

impl Display for AdminError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRoleName => write!(f, "role name must not be blank"),
            Self::RoleInUse { role_id, count } => {
                write!(f, "role {role_id} is assigned to {count} user(s)")
            }
            Self::RoleNotFound(id) => write!(f, "role not found: {id}"),
            Self::BlankUserField(field) => write!(f, "user {field} must not be blank"),
            Self::PasswordMismatch => write!(f, "password and confirmation differ"),
            Self::PasswordRequired => write!(f, "new users need a password"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
        }
    }
}

impl Error for AdminError {}

/// Role editor input; `id == None` creates a role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleForm {
    pub id: Option<String>,
    pub name: String,
    pub permissions: Vec<String>,
}

/// User editor input; `id == None` creates a user.
///
/// A blank `password` on edit keeps the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub role_id: String,
    pub status: MemberStatus,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminDirectory {
    roles: Vec<Role>,
    users: Vec<User>,
    sellers: Vec<Seller>,
}

impl AdminDirectory {
    pub fn new(roles: Vec<Role>, users: Vec<User>, sellers: Vec<Seller>) -> Self {
        Self {
            roles,
            users,
            sellers,
        }
    }

    /// Directory populated with the demo roles, users and sellers.
    pub fn seeded() -> Self {
        Self::new(
            crate::seed::roles(),
            crate::seed::users(),
            crate::seed::sellers(),
        )
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn sellers(&self) -> &[Seller] {
        &self.sellers
    }

    fn role_name(&self, role_id: &str) -> String {
        self.roles
            .iter()
            .find(|role| role.id == role_id)
            .map_or_else(|| UNKNOWN_ROLE_NAME.to_string(), |role| role.name.clone())
    }

    pub fn save_role(&mut self, form: RoleForm) -> Result<Role, AdminError> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(AdminError::EmptyRoleName);
        }

        let role = match form.id {
            Some(id) => {
                let slot = self
                    .roles
                    .iter_mut()
                    .find(|role| role.id == id)
                    .ok_or(AdminError::RoleNotFound(id))?;
                slot.name = name.to_string();
                slot.permissions = form.permissions;
                slot.clone()
            }
            None => {
                let role = Role {
                    id: generate_id("role-"),
                    name: name.to_string(),
                    permissions: form.permissions,
                };
                self.roles.insert(0, role.clone());
                role
            }
        };

        for user in self.users.iter_mut().filter(|user| user.role_id == role.id) {
            user.role_name = role.name.clone();
        }
        info!("event=role_save module=admin status=ok role_id={}", role.id);
        Ok(role)
    }

    /// Deletes an unused role; unknown ids return `Ok(None)`.
    pub fn delete_role(&mut self, role_id: &str) -> Result<Option<Role>, AdminError> {
        let count = self
            .users
            .iter()
            .filter(|user| user.role_id == role_id)
            .count();
        if count > 0 {
            return Err(AdminError::RoleInUse {
                role_id: role_id.to_string(),
                count,
            });
        }
        let Some(index) = self.roles.iter().position(|role| role.id == role_id) else {
            return Ok(None);
        };
        info!("event=role_delete module=admin status=ok role_id={role_id}");
        Ok(Some(self.roles.remove(index)))
    }

    pub fn save_user(&mut self, form: UserForm) -> Result<User, AdminError> {
        if form.name.trim().is_empty() {
            return Err(AdminError::BlankUserField("name"));
        }
        if form.email.trim().is_empty() {
            return Err(AdminError::BlankUserField("email"));
        }
        if form.id.is_none() && form.password.is_empty() {
            return Err(AdminError::PasswordRequired);
        }
        if !form.password.is_empty() && form.password != form.confirm_password {
            return Err(AdminError::PasswordMismatch);
        }

        let role_name = self.role_name(&form.role_id);
        let user = match form.id {
            Some(id) => {
                let slot = self
                    .users
                    .iter_mut()
                    .find(|user| user.id == id)
                    .ok_or(AdminError::UserNotFound(id))?;
                slot.name = form.name.trim().to_string();
                slot.email = form.email.trim().to_string();
                slot.role_id = form.role_id;
                slot.role_name = role_name;
                slot.status = form.status;
                slot.clone()
            }
            None => {
                let user = User {
                    id: generate_id("user-"),
                    name: form.name.trim().to_string(),
                    email: form.email.trim().to_string(),
                    role_id: form.role_id,
                    role_name,
                    status: form.status,
                };
                self.users.insert(0, user.clone());
                user
            }
        };
        info!("event=user_save module=admin status=ok user_id={}", user.id);
        Ok(user)
    }

    pub fn delete_user(&mut self, user_id: &str) -> Option<User> {
        let index = self.users.iter().position(|user| user.id == user_id)?;
        info!("event=user_delete module=admin status=ok user_id={user_id}");
        Some(self.users.remove(index))
    }

    /// Users matching the role, status and name/email filters.
    ///
    /// Empty role/status slices mean "any".
    pub fn filter_users(
        &self,
        search: &str,
        role_ids: &[&str],
        statuses: &[MemberStatus],
    ) -> Vec<&User> {
        let needle = search.trim().to_lowercase();
        self.users
            .iter()
            .filter(|user| role_ids.is_empty() || role_ids.contains(&user.role_id.as_str()))
            .filter(|user| statuses.is_empty() || statuses.contains(&user.status))
            .filter(|user| {
                user.name.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Prepends a placeholder seller to be filled in by the editor.
    pub fn add_seller(&mut self) -> &Seller {
        let taken: HashSet<&str> = self.sellers.iter().map(|s| s.id.as_str()).collect();
        let ordinal = (self.sellers.len() + 1..)
            .find(|n| !taken.contains(format!("seller{n}").as_str()))
            .unwrap_or(self.sellers.len() + 1);
        let name = "Novo Vendedor";
        let seller = Seller {
            id: format!("seller{ordinal}"),
            name: name.to_string(),
            email: format!("novo{ordinal}@example.com"),
            phone: "(XX) XXXXX-XXXX".to_string(),
            region: "Não Definida".to_string(),
            avatar_fallback: avatar_fallback(name),
            status: MemberStatus::Active,
        };
        info!("event=seller_add module=admin status=ok seller_id={}", seller.id);
        self.sellers.insert(0, seller);
        &self.sellers[0]
    }

    pub fn delete_seller(&mut self, seller_id: &str) -> Option<Seller> {
        let index = self.sellers.iter().position(|seller| seller.id == seller_id)?;
        info!("event=seller_delete module=admin status=ok seller_id={seller_id}");
        Some(self.sellers.remove(index))
    }

    /// Sellers whose name, email or region contain `search`, restricted to
    /// `statuses` (empty means any).
    pub fn filter_sellers(&self, search: &str, statuses: &[MemberStatus]) -> Vec<&Seller> {
        let needle = search.trim().to_lowercase();
        self.sellers
            .iter()
            .filter(|seller| statuses.is_empty() || statuses.contains(&seller.status))
            .filter(|seller| {
                seller.name.to_lowercase().contains(&needle)
                    || seller.email.to_lowercase().contains(&needle)
                    || seller.region.to_lowercase().contains(&needle)
            })
            .collect()
    }
}
