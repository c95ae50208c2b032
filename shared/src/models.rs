//! Domain models shared between the backend and its clients

use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role discriminator
///
/// Customers are either `REGULAR` or `PREMIUM`; administrators are always
/// `ADMIN`. The value is returned on login and embedded in access tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserType {
    Regular,
    Premium,
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Regular => "REGULAR",
            UserType::Premium => "PREMIUM",
            UserType::Admin => "ADMIN",
        }
    }

    /// Whether this role belongs to a customer account
    pub fn is_customer(&self) -> bool {
        matches!(self, UserType::Regular | UserType::Premium)
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "REGULAR" => Ok(UserType::Regular),
            "PREMIUM" => Ok(UserType::Premium),
            "ADMIN" => Ok(UserType::Admin),
            _ => Err(DomainError::UnknownUserType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_type_round_trips_through_str() {
        for user_type in [UserType::Regular, UserType::Premium, UserType::Admin] {
            assert_eq!(user_type.as_str().parse::<UserType>().unwrap(), user_type);
        }
    }

    #[test]
    fn test_user_type_parse_is_case_insensitive() {
        assert_eq!("premium".parse::<UserType>().unwrap(), UserType::Premium);
        assert!("owner".parse::<UserType>().is_err());
    }

    #[test]
    fn test_user_type_displays_uppercase() {
        assert_eq!(UserType::Regular.to_string(), "REGULAR");
    }

    #[test]
    fn test_only_customer_roles_are_customers() {
        assert!(UserType::Regular.is_customer());
        assert!(UserType::Premium.is_customer());
        assert!(!UserType::Admin.is_customer());
    }
}
