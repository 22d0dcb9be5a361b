//! Role module - who is using the assistant

/// Reply used when the role is not recognised
pub const UNKNOWN_ROLE_RESPONSE: &str =
    "I'm sorry, I don't understand your role. Please try again.";

/// Role of the person at the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRole {
    /// A patient describing their symptoms
    Patient,
    /// A clinician
    Doctor,
    /// Front-desk or administrative staff
    Admin,
}

impl UserRole {
    /// Get the role name
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Patient => "patient",
            UserRole::Doctor => "doctor",
            UserRole::Admin => "admin",
        }
    }

    /// Parse a role from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "patient" => Some(UserRole::Patient),
            "doctor" => Some(UserRole::Doctor),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }

    /// Fixed greeting for this role
    pub fn canned_response(&self) -> &'static str {
        match self {
            UserRole::Patient => {
                "I'm here to assist you with your medical queries. How can I help?"
            }
            UserRole::Doctor => "Welcome, Doctor. How can I assist you with patient care today?",
            UserRole::Admin => {
                "I'm here to assist you with administrative tasks. How can I help?"
            }
        }
    }
}

/// Look up the canned response for a free-form role string
pub fn canned_response_for(role: &str) -> &'static str {
    UserRole::parse(role)
        .map(|r| r.canned_response())
        .unwrap_or(UNKNOWN_ROLE_RESPONSE)
}
