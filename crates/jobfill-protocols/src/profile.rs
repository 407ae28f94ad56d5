//! Applicant profile and document snapshots.
//!
//! Both are read-only for the duration of a run.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub preferred_first_name: Option<String>,
    pub pronouns: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    /// State or province, by name or two-letter code.
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Professional {
    pub current_company: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub discipline: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Authorization {
    /// Authorized to work; unset is treated as yes.
    pub authorized: Option<bool>,
    /// Needs visa sponsorship; unset is treated as yes.
    pub needs_sponsorship: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Demographic {
    pub gender: Option<String>,
    pub hispanic_latino: Option<String>,
    pub race_ethnicity: Option<String>,
    pub veteran_status: Option<String>,
    pub disability_status: Option<String>,
    pub lgbtq: Option<String>,
}

/// Stored applicant data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub identity: Identity,
    pub contact: Contact,
    pub professional: Professional,
    pub education: Education,
    pub authorization: Authorization,
    pub demographic: Demographic,
}

/// An uploadable document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentBlob {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl DocumentBlob {
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Documents {
    pub resume: Option<DocumentBlob>,
    pub cover_letter: Option<DocumentBlob>,
}
