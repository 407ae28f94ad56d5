//! Sanity checks on a loaded config, reported by `jobfill check`.

use crate::error::ConfigError;
use crate::loader::ConfigLoader;
use crate::schema::Config;

#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationError::new(path, message));
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning::new(path, message));
    }
}

/// Makes the config unusable.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Suspicious but workable.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_matching(config, &mut result);
        Self::validate_timing(config, &mut result);
        Self::validate_ai(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_applicant(config, &mut result);

        Ok(result)
    }

    fn validate_matching(config: &Config, result: &mut ValidationResult) {
        let m = &config.matching;

        if m.acceptance_threshold == 0 {
            result.warn("matching.acceptance_threshold", "threshold 0 accepts any option, including unrelated ones");
        }

        if m.acceptance_threshold > m.exact_score {
            result.error("matching.acceptance_threshold", "threshold is above exact_score, no option could ever match");
        }

        let ordered = [
            ("whole_word_score", m.whole_word_score),
            ("reverse_prefix_score", m.reverse_prefix_score),
            ("prefix_score", m.prefix_score),
            ("decline_score", m.decline_score),
            ("contains_score", m.contains_score),
            ("reverse_contains_score", m.reverse_contains_score),
        ];
        for (name, score) in ordered {
            if score > m.exact_score {
                result.warn(
                    format!("matching.{}", name),
                    "scores above exact_score let a partial match beat an exact one",
                );
            }
        }

        if m.loose_min_len < 3 {
            result.warn(
                "matching.loose_min_len",
                "short loose matches let tokens like \"no\" match inside unrelated words",
            );
        }

        if m.overlap_min_tokens == 0 {
            result.error("matching.overlap_min_tokens", "overlap_min_tokens must be greater than 0");
        }
    }

    fn validate_timing(config: &Config, result: &mut ValidationResult) {
        let t = &config.timing;

        if t.readiness_tries == 0 {
            result.error("timing.readiness_tries", "readiness_tries must be greater than 0");
        }

        for (name, value) in [
            ("quiet_poll", t.quiet_poll),
            ("probe_poll", t.probe_poll),
            ("url_poll", t.url_poll),
        ] {
            if value == 0 {
                result.error(
                    format!("timing.{}", name),
                    "poll intervals must be greater than 0",
                );
            }
        }

        if t.probe_max_options == 0 {
            result.error("timing.probe_max_options", "probe_max_options must be greater than 0");
        }

        if t.hydration_stable > t.hydration_timeout {
            result.warn(
                "timing.hydration_stable",
                "stability window exceeds hydration_timeout, hydration will always time out",
            );
        }

        if t.settle_stable > t.settle_timeout {
            result.warn(
                "timing.settle_stable",
                "stability window exceeds settle_timeout, settling will always time out",
            );
        }

        if t.network_list_wait < t.static_list_wait {
            result.warn("timing.network_list_wait", "network-backed lists usually need a longer wait than static ones");
        }
    }

    fn validate_ai(config: &Config, result: &mut ValidationResult) {
        let ai = &config.ai;
        if !ai.enabled {
            return;
        }

        if !ai.is_usable() {
            result.warn("ai.api_key", "API key is not set, required questions will not get AI answers");
        }

        if url::Url::parse(&ai.base_url).map_or(true, |u| !matches!(u.scheme(), "http" | "https")) {
            result.error("ai.base_url", "base_url must be an http(s) URL");
        }

        if ai.max_tokens == 0 {
            result.error("ai.max_tokens", "max_tokens must be greater than 0");
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.debug_port == 0 {
            result.error("browser.debug_port", "Port cannot be 0");
        }
    }

    fn validate_applicant(config: &Config, result: &mut ValidationResult) {
        let applicant = &config.applicant;

        match &applicant.profile {
            None => result.warn(
                "applicant.profile",
                "No profile configured, runs will only prompt for configuration",
            ),
            Some(path) if !ConfigLoader::expand_pathbuf(path).exists() => {
                result.error("applicant.profile", format!("Profile file does not exist: {:?}", path));
            }
            Some(_) => {}
        }

        for (name, path) in [
            ("resume", &applicant.resume),
            ("cover_letter", &applicant.cover_letter),
        ] {
            if let Some(path) = path {
                if !ConfigLoader::expand_pathbuf(path).exists() {
                    result.warn(
                        format!("applicant.{}", name),
                        format!("Document does not exist: {:?}", path),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
