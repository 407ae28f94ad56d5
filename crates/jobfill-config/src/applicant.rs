//! Applicant profile and document loading.

use std::fs;
use std::path::Path;

use jobfill_protocols::{DocumentBlob, Documents, Profile};
use tracing::debug;

use crate::error::ConfigError;
use crate::loader::ConfigLoader;
use crate::schema::ApplicantConfig;

/// Reads the applicant's profile and documents from disk.
pub struct ApplicantLoader;

impl ApplicantLoader {
    /// Load a TOML profile file. `${VAR}` references are expanded.
    pub fn load_profile(path: &Path) -> Result<Profile, ConfigError> {
        let path = ConfigLoader::expand_pathbuf(path);
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(&path)?;
        Self::parse_profile(&content)
    }

    pub fn parse_profile(content: &str) -> Result<Profile, ConfigError> {
        let expanded = ConfigLoader::expand_env_vars(content)?;
        Ok(toml::from_str(&expanded)?)
    }

    /// The configured profile, or `None` when no profile path is set.
    pub fn profile_from(applicant: &ApplicantConfig) -> Result<Option<Profile>, ConfigError> {
        applicant
            .profile
            .as_deref()
            .map(Self::load_profile)
            .transpose()
    }

    /// Read the configured resume and cover letter.
    pub fn load_documents(applicant: &ApplicantConfig) -> Result<Documents, ConfigError> {
        Ok(Documents {
            resume: applicant
                .resume
                .as_deref()
                .map(Self::load_document)
                .transpose()?,
            cover_letter: applicant
                .cover_letter
                .as_deref()
                .map(Self::load_document)
                .transpose()?,
        })
    }

    pub fn load_document(path: &Path) -> Result<DocumentBlob, ConfigError> {
        let path = ConfigLoader::expand_pathbuf(path);
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let bytes = fs::read(&path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "applicant".to_string(),
                message: format!("{} has no file name", path.display()),
            })?;
        debug!("Loaded document {} ({} bytes)", filename, bytes.len());
        Ok(DocumentBlob::new(filename, mime_for(&path), bytes))
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "rtf" => "application/rtf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_parse_profile_sections() {
        let content = r#"
            [identity]
            first_name = "Ana"
            last_name = "Silva"

            [contact]
            email = "ana@example.com"
            city = "Toronto"
            state = "Ontario"
            country = "Canada"

            [authorization]
            needs_sponsorship = false

            [demographic]
            gender = "Female"
            race_ethnicity = "East Asian"
        "#;
        let profile = ApplicantLoader::parse_profile(content).unwrap();
        assert_eq!(profile.identity.first_name.as_deref(), Some("Ana"));
        assert_eq!(profile.contact.state.as_deref(), Some("Ontario"));
        assert_eq!(profile.authorization.needs_sponsorship, Some(false));
        assert_eq!(profile.demographic.race_ethnicity.as_deref(), Some("East Asian"));
        assert!(profile.education.school.is_none());
    }

    #[test]
    fn test_load_profile_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[identity]").unwrap();
        writeln!(file, "first_name = \"Ana\"").unwrap();

        let profile = ApplicantLoader::load_profile(file.path()).unwrap();
        assert_eq!(profile.identity.first_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_profile_from_unset_path() {
        let applicant = ApplicantConfig::default();
        assert!(ApplicantLoader::profile_from(&applicant).unwrap().is_none());
    }

    #[test]
    fn test_load_missing_profile() {
        let result = ApplicantLoader::load_profile(Path::new("/nonexistent/profile.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_documents() {
        let dir = TempDir::new().unwrap();
        let resume = dir.path().join("resume.pdf");
        fs::write(&resume, b"%PDF-1.4 test").unwrap();

        let applicant = ApplicantConfig {
            profile: None,
            resume: Some(resume),
            cover_letter: None,
        };
        let docs = ApplicantLoader::load_documents(&applicant).unwrap();
        let blob = docs.resume.unwrap();
        assert_eq!(blob.filename, "resume.pdf");
        assert_eq!(blob.mime_type, "application/pdf");
        assert_eq!(&blob.bytes[..], b"%PDF-1.4 test");
        assert!(docs.cover_letter.is_none());
    }

    #[test]
    fn test_load_documents_missing_file() {
        let applicant = ApplicantConfig {
            profile: None,
            resume: Some(PathBuf::from("/nonexistent/resume.pdf")),
            cover_letter: None,
        };
        assert!(ApplicantLoader::load_documents(&applicant).is_err());
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(Path::new("a.PDF")), "application/pdf");
        assert_eq!(mime_for(Path::new("a.docx")), "application/vnd.openxmlformats-officedocument.wordprocessingml.document");
        assert_eq!(mime_for(Path::new("a")), "application/octet-stream");
    }
}
