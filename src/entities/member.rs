use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{invalid_input_error, Error};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Customer,
    Carrier,
    Merchant,
    Provider,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    Individual,
    Professional,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Customer => "CUSTOMER",
            Self::Carrier => "CARRIER",
            Self::Merchant => "MERCHANT",
            Self::Provider => "PROVIDER",
        }
    }

    /// Role name as used by the authorization rules.
    pub fn policy_name(&self) -> String {
        self.name().to_lowercase()
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "CUSTOMER" => Ok(Self::Customer),
            "CARRIER" => Ok(Self::Carrier),
            "MERCHANT" => Ok(Self::Merchant),
            "PROVIDER" => Ok(Self::Provider),
            _ => Err(invalid_input_error(format!("unknown role {}", s))),
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub email: String,
    pub name: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: Role,
    pub user_type: UserType,
}

// passwords stay out of logs
impl std::fmt::Debug for NewMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewMember")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("user_type", &self.user_type)
            .finish()
    }
}

impl NewMember {
    pub fn validate(&self) -> Result<(), Error> {
        validate_email(&self.email)?;

        if self.name.trim().is_empty() {
            return Err(invalid_input_error("name is required"));
        }

        if self.password.len() < 8 {
            return Err(invalid_input_error(
                "password must be at least 8 characters long",
            ));
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub user_type: Option<UserType>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberFilter {
    pub role: Option<Role>,
}

impl Member {
    pub fn new(params: &NewMember) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            email: params.email.trim().to_lowercase(),
            name: params.name.trim().into(),
            phone: params.phone.clone(),
            role: params.role,
            user_type: params.user_type,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_professional(&self) -> bool {
        self.user_type == UserType::Professional
    }

    pub fn apply(&mut self, changes: MemberChanges) -> Result<(), Error> {
        if let Some(email) = changes.email {
            validate_email(&email)?;
            self.email = email.trim().to_lowercase();
        }

        if let Some(name) = changes.name {
            if name.trim().is_empty() {
                return Err(invalid_input_error("name must not be empty"));
            }
            self.name = name.trim().into();
        }

        if let Some(phone) = changes.phone {
            self.phone = Some(phone).filter(|p| !p.trim().is_empty());
        }

        if let Some(role) = changes.role {
            self.role = role;
        }

        if let Some(user_type) = changes.user_type {
            self.user_type = user_type;
        }

        self.updated_at = Utc::now();

        Ok(())
    }
}

fn validate_email(email: &str) -> Result<(), Error> {
    let email = email.trim();

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(invalid_input_error(format!("invalid email address {}", email))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_member() -> NewMember {
        NewMember {
            email: " Someone@Example.com ".into(),
            name: "Someone".into(),
            password: "correct horse".into(),
            phone: None,
            role: Role::Customer,
            user_type: UserType::Individual,
        }
    }

    #[test]
    fn new_member_normalizes_email() {
        let member = Member::new(&new_member());
        assert_eq!(member.email, "someone@example.com");
        assert!(!member.is_professional());
    }

    #[test]
    fn validation_rejects_short_passwords_and_bad_emails() {
        let mut params = new_member();
        assert!(params.validate().is_ok());

        params.password = "short".into();
        assert!(params.validate().unwrap_err().is_invalid_input_error());

        let mut params = new_member();
        params.email = "nobody".into();
        assert!(params.validate().is_err());
    }

    #[test]
    fn apply_changes_role_and_type() {
        let mut member = Member::new(&new_member());
        member
            .apply(MemberChanges {
                role: Some(Role::Merchant),
                user_type: Some(UserType::Professional),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(member.role, Role::Merchant);
        assert!(member.is_professional());
    }

    #[test]
    fn apply_rejects_blank_name() {
        let mut member = Member::new(&new_member());
        let result = member.apply(MemberChanges {
            name: Some("   ".into()),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn role_round_trips_through_its_name() {
        for role in [
            Role::Admin,
            Role::Customer,
            Role::Carrier,
            Role::Merchant,
            Role::Provider,
        ] {
            assert_eq!(role.name().parse::<Role>().unwrap(), role);
        }
        assert!("DRIVER".parse::<Role>().is_err());
    }

    #[test]
    fn debug_output_omits_password() {
        let params = new_member();
        let printed = format!("{:?}", params);
        assert!(!printed.contains("correct horse"));
    }
}
