use serde::{Deserialize, Serialize};

use super::ServiceKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Client,
    Admin,
    Barber,
    TattooArtist,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "Client",
            Role::Admin => "Admin",
            Role::Barber => "Barber",
            Role::TattooArtist => "TattooArtist",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "client" => Some(Role::Client),
            "admin" => Some(Role::Admin),
            "barber" => Some(Role::Barber),
            "tattooartist" => Some(Role::TattooArtist),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Barber | Role::TattooArtist)
    }

    /// Specialization that performs a given service.
    pub fn for_service(service: ServiceKind) -> Role {
        match service {
            ServiceKind::Haircut => Role::Barber,
            ServiceKind::Tattoo => Role::TattooArtist,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!(Role::parse("tattooartist"), Some(Role::TattooArtist));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("staff"), None);
    }

    #[test]
    fn test_service_specialization() {
        assert_eq!(Role::for_service(ServiceKind::Haircut), Role::Barber);
        assert_eq!(Role::for_service(ServiceKind::Tattoo), Role::TattooArtist);
    }
}
