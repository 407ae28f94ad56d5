//! International phone numbers: the dial code a country picker needs and the
//! local part the number input takes.

use super::AnswerCandidate;
use crate::text::normalize;

/// Calling codes and the countries a picker lists under them, most likely first.
/// The codes are prefix-free, so an unseparated number still splits cleanly.
const DIAL_CODES: &[(&str, &[&str])] = &[
    ("1", &["United States", "Canada"]),
    ("7", &["Russia", "Kazakhstan"]),
    ("20", &["Egypt"]),
    ("27", &["South Africa"]),
    ("30", &["Greece"]),
    ("31", &["Netherlands"]),
    ("32", &["Belgium"]),
    ("33", &["France"]),
    ("34", &["Spain"]),
    ("36", &["Hungary"]),
    ("39", &["Italy"]),
    ("40", &["Romania"]),
    ("41", &["Switzerland"]),
    ("43", &["Austria"]),
    ("44", &["United Kingdom"]),
    ("45", &["Denmark"]),
    ("46", &["Sweden"]),
    ("47", &["Norway"]),
    ("48", &["Poland"]),
    ("49", &["Germany"]),
    ("52", &["Mexico"]),
    ("54", &["Argentina"]),
    ("55", &["Brazil"]),
    ("56", &["Chile"]),
    ("57", &["Colombia"]),
    ("60", &["Malaysia"]),
    ("61", &["Australia"]),
    ("62", &["Indonesia"]),
    ("63", &["Philippines"]),
    ("64", &["New Zealand"]),
    ("65", &["Singapore"]),
    ("66", &["Thailand"]),
    ("81", &["Japan"]),
    ("82", &["South Korea"]),
    ("84", &["Vietnam"]),
    ("86", &["China"]),
    ("90", &["Turkey"]),
    ("91", &["India"]),
    ("92", &["Pakistan"]),
    ("234", &["Nigeria"]),
    ("351", &["Portugal"]),
    ("353", &["Ireland"]),
    ("358", &["Finland"]),
    ("852", &["Hong Kong"]),
    ("880", &["Bangladesh"]),
    ("886", &["Taiwan"]),
    ("966", &["Saudi Arabia"]),
    ("971", &["United Arab Emirates"]),
    ("972", &["Israel"]),
];

const MAX_CODE_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber {
    /// Digits of the `+` prefix, when the number carries one.
    pub dial_code: Option<String>,
    /// The number without its prefix.
    pub local: String,
}

/// Split `+<code>` off a stored phone number.
///
/// A separator after the prefix ends the code ("+44 20 7946 0958"); an
/// unseparated number ("+442079460958") splits only on a known code.
/// Anything else is returned whole as the local part.
pub fn split_phone(value: &str) -> PhoneNumber {
    let value = value.trim();
    let whole = || PhoneNumber {
        dial_code: None,
        local: value.to_string(),
    };
    let Some(rest) = value.strip_prefix('+') else {
        return whole();
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let separated = rest.len() > digits.len();
    let code = if separated && !digits.is_empty() && digits.len() <= MAX_CODE_LEN {
        Some(digits.clone())
    } else {
        DIAL_CODES
            .iter()
            .map(|(code, _)| *code)
            .find(|code| digits.starts_with(code) && digits.len() > code.len())
            .map(str::to_string)
    };
    let Some(code) = code else {
        return whole();
    };

    let local = rest[code.len()..]
        .trim_start_matches(|c: char| c.is_whitespace() || c == '-' || c == '.')
        .to_string();
    if local.is_empty() {
        return whole();
    }
    PhoneNumber {
        dial_code: Some(code),
        local,
    }
}

fn same_country(a: &str, b: &str) -> bool {
    let canonical = |s: &str| match normalize(s).as_str() {
        "us" | "usa" | "u.s." | "united states of america" => "united states".to_string(),
        "uk" | "great britain" => "united kingdom".to_string(),
        other => other.to_string(),
    };
    canonical(a) == canonical(b)
}

/// Picker options to try for `dial_code`: the applicant's country when the
/// code covers it, else the code's main country, then the bare `+code`.
pub fn country_code_candidates(dial_code: &str, profile_country: Option<&str>) -> AnswerCandidate {
    let countries = DIAL_CODES
        .iter()
        .find(|(code, _)| *code == dial_code)
        .map(|(_, countries)| *countries)
        .unwrap_or(&[]);
    let country = profile_country
        .and_then(|p| countries.iter().find(|c| same_country(c, p)))
        .or_else(|| countries.first());

    let mut values: Vec<String> = country.map(|c| c.to_string()).into_iter().collect();
    values.push(format!("+{dial_code}"));
    AnswerCandidate::new(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(value: &str) -> (Option<String>, String) {
        let number = split_phone(value);
        (number.dial_code, number.local)
    }

    fn parts(code: &str, local: &str) -> (Option<String>, String) {
        (Some(code.to_string()), local.to_string())
    }

    #[test]
    fn test_split_separated_prefix() {
        assert_eq!(split("+1 (555) 123-4567"), parts("1", "(555) 123-4567"));
        assert_eq!(split("+44 20 7946 0958"), parts("44", "20 7946 0958"));
        assert_eq!(split("+353-1-555-0100"), parts("353", "1-555-0100"));
    }

    #[test]
    fn test_split_unseparated_known_code() {
        assert_eq!(split("+442079460958"), parts("44", "2079460958"));
        assert_eq!(split("+15551234567"), parts("1", "5551234567"));
    }

    #[test]
    fn test_split_leaves_other_numbers_whole() {
        assert_eq!(split_phone("555-123-4567").dial_code, None);
        assert_eq!(split_phone("555-123-4567").local, "555-123-4567");
        // Unknown and unseparated: no safe place to cut.
        assert_eq!(split_phone("+9995551234").dial_code, None);
        assert_eq!(split_phone("+44").dial_code, None);
        // An unknown separated code is still a code.
        assert_eq!(split_phone("+999 555 1234").dial_code.as_deref(), Some("999"));
    }

    #[test]
    fn test_candidates_prefer_applicant_country() {
        assert_eq!(
            country_code_candidates("1", Some("Canada")).0,
            vec!["Canada".to_string(), "+1".to_string()]
        );
        assert_eq!(
            country_code_candidates("1", Some("USA")).0,
            vec!["United States".to_string(), "+1".to_string()]
        );
        // A country the code does not cover is ignored.
        assert_eq!(
            country_code_candidates("44", Some("Canada")).0,
            vec!["United Kingdom".to_string(), "+44".to_string()]
        );
        assert_eq!(country_code_candidates("999", None).0, vec!["+999".to_string()]);
    }
}
