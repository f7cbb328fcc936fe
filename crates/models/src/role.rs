use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Closed set of role names. The name is the role's unique key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleName {
    Owner,
    Admin,
    Customer,
}

impl RoleName {
    pub const ALL: [RoleName; 3] = [RoleName::Owner, RoleName::Admin, RoleName::Customer];

    pub fn as_str(self) -> &'static str {
        match self {
            RoleName::Owner => "OWNER",
            RoleName::Admin => "ADMIN",
            RoleName::Customer => "CUSTOMER",
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ModelError::UnknownRoleName(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    Read,
    Readwrite,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Read => "READ",
            Permission::Readwrite => "READWRITE",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "READ" => Ok(Permission::Read),
            "READWRITE" => Ok(Permission::Readwrite),
            other => Err(ModelError::UnknownPermission(other.to_string())),
        }
    }
}

/// A named role and the permissions it grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: RoleName,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Role {
    pub fn new(name: RoleName, permissions: impl Into<Vec<Permission>>) -> Self {
        Self { name, permissions: permissions.into() }
    }
}
