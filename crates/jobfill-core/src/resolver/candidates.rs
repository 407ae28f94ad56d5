//! Expansion of profile values into ordered candidate spellings.

use crate::text::normalize;

/// Strings to try against a field's options, most preferred first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerCandidate(pub Vec<String>);

impl AnswerCandidate {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if !value.trim().is_empty() && !out.contains(&value) {
                out.push(value);
            }
        }
        Self(out)
    }

    pub fn single(value: impl Into<String>) -> Self {
        Self::new([value.into()])
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append the first-two-words form of the leading candidate, when it
    /// differs and is at least three characters long.
    pub fn with_short_retry(mut self) -> Self {
        if let Some(short) = self.first().and_then(short_form) {
            if !self.0.contains(&short) {
                self.0.push(short);
            }
        }
        self
    }
}

fn short_form(value: &str) -> Option<String> {
    let short = value.split_whitespace().take(2).collect::<Vec<_>>().join(" ");
    (short != value.trim() && short.chars().count() >= 3).then_some(short)
}

pub fn gender_candidates(value: &str) -> AnswerCandidate {
    let g = normalize(value);
    if g.contains("prefer") && g.contains("not") {
        return AnswerCandidate::new([
            "prefer not to say",
            "i don't wish to answer",
            "decline to answer",
            value,
        ]);
    }
    match g.as_str() {
        "male" | "man" => AnswerCandidate::new(["cisgender male", "cis male", "male", "man"]),
        "female" | "woman" => {
            AnswerCandidate::new(["cisgender female", "cis female", "female", "woman"])
        }
        _ if g.contains("non") && g.contains("binary") => {
            AnswerCandidate::new(["non-binary", "nonbinary", "non binary"])
        }
        _ if g.contains("trans") => AnswerCandidate::new(["transgender", "trans", value]),
        _ => AnswerCandidate::single(value),
    }
}

/// Asian subgroups fall back to the broader group.
pub fn race_candidates(value: &str) -> AnswerCandidate {
    match normalize(value).as_str() {
        "east asian" | "south asian" | "southeast asian" => AnswerCandidate::new([value, "asian"]),
        _ => AnswerCandidate::single(value),
    }
}

pub fn yes_no(answer: bool) -> AnswerCandidate {
    AnswerCandidate::single(if answer { "Yes" } else { "No" })
}

/// Whether an answer means "check the box".
pub fn is_affirmative(value: &str) -> bool {
    matches!(
        normalize(value).as_str(),
        "yes" | "true" | "1" | "checked" | "agree"
    )
}

const US_STATES: &[(&str, &str)] = &[
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("district of columbia", "DC"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
];

const CA_PROVINCES: &[(&str, &str)] = &[
    ("alberta", "AB"),
    ("british columbia", "BC"),
    ("manitoba", "MB"),
    ("new brunswick", "NB"),
    ("newfoundland and labrador", "NL"),
    ("northwest territories", "NT"),
    ("nova scotia", "NS"),
    ("nunavut", "NU"),
    ("ontario", "ON"),
    ("prince edward island", "PE"),
    ("quebec", "QC"),
    ("saskatchewan", "SK"),
    ("yukon", "YT"),
];

fn is_canada(country: Option<&str>) -> bool {
    country.is_some_and(|c| matches!(normalize(c).as_str(), "canada" | "ca"))
}

/// Two-letter code for a state or province given by name or code.
pub fn region_code(country: Option<&str>, name_or_code: &str) -> Option<String> {
    let raw = name_or_code.trim();
    if raw.len() == 2 && raw.chars().all(|c| c.is_ascii_alphabetic()) {
        return Some(raw.to_ascii_uppercase());
    }
    let key = normalize(raw);
    let table = if is_canada(country) { CA_PROVINCES } else { US_STATES };
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, code)| code.to_string())
}

/// Full name for a two-letter code, searching both tables.
pub fn region_name(code: &str) -> Option<&'static str> {
    let code = code.trim().to_ascii_uppercase();
    US_STATES
        .iter()
        .chain(CA_PROVINCES)
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
}

/// The state as given, then its code.
pub fn state_candidates(country: Option<&str>, state: &str) -> AnswerCandidate {
    let mut values = vec![state.to_string()];
    if let Some(code) = region_code(country, state) {
        if code.eq_ignore_ascii_case(state.trim()) {
            if let Some(name) = region_name(&code) {
                values.push(name.to_string());
            }
        } else {
            values.push(code);
        }
    }
    AnswerCandidate::new(values)
}
