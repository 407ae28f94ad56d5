//! The fixed category plan: which profile value goes to which labelled field.

use jobfill_protocols::Profile;

use crate::injector::{Answer, Picker, SelectMode};
use crate::resolver::AnswerCandidate;
use crate::resolver::candidates::{gender_candidates, race_candidates, state_candidates, yes_no};
use crate::resolver::phone::{PhoneNumber, country_code_candidates, split_phone};
use crate::text::{matches_any_keyword, normalize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Identity,
    Contact,
    Professional,
    Education,
    Authorization,
    Demographic,
}

/// One profile attribute and the labels it answers.
#[derive(Debug, Clone)]
pub struct Target {
    pub name: &'static str,
    pub category: Category,
    include: &'static [&'static str],
    exclude: &'static [&'static str],
    pub answer: Answer,
    /// Fill every matching field rather than only the first.
    pub every_match: bool,
    /// Answer used instead once the named target has filled a field this run.
    after_fill: Option<(&'static str, Answer)>,
}

impl Target {
    fn new(name: &'static str, category: Category, include: &'static [&'static str], answer: Answer) -> Self {
        Self {
            name,
            category,
            include,
            exclude: &[],
            answer,
            every_match: false,
            after_fill: None,
        }
    }

    fn excluding(mut self, exclude: &'static [&'static str]) -> Self {
        self.exclude = exclude;
        self
    }

    fn every_match(mut self) -> Self {
        self.every_match = true;
        self
    }

    fn after_fill(mut self, target: &'static str, answer: Answer) -> Self {
        self.after_fill = Some((target, answer));
        self
    }

    /// The answer to commit, given the targets that have filled a field so far.
    pub fn answer_for(&self, filled_targets: &[&str]) -> &Answer {
        match &self.after_fill {
            Some((target, answer)) if filled_targets.contains(target) => answer,
            _ => &self.answer,
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        matches_any_keyword(label, self.include) && !matches_any_keyword(label, self.exclude)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn text(value: &str) -> Answer {
    Answer::Text(value.to_string())
}

fn choice(candidates: AnswerCandidate) -> Answer {
    Answer::choice(candidates)
}

fn search(value: &str) -> Answer {
    Answer::Choice {
        candidates: AnswerCandidate::single(value),
        mode: SelectMode::Search { network: true },
        picker: Picker::Standard,
    }
}

/// Targets for every value present in the profile, in category order.
pub fn build_plan(profile: &Profile) -> Vec<Target> {
    use Category::*;

    let mut plan = Vec::new();
    let mut add = |value: Option<&str>, make: &dyn Fn(&str) -> Target| {
        if let Some(value) = value {
            plan.push(make(value));
        }
    };

    let identity = &profile.identity;
    add(present(&identity.first_name), &|v| {
        Target::new("first_name", Identity, &["first name", "given name", "legal first name"], text(v))
            .excluding(&["preferred"])
    });
    add(present(&identity.last_name), &|v| {
        Target::new("last_name", Identity, &["last name", "family name", "surname"], text(v))
    });
    add(present(&identity.preferred_first_name), &|v| {
        Target::new("preferred_name", Identity, &["preferred first", "preferred name"], text(v))
    });
    add(present(&identity.pronouns), &|v| {
        Target::new("pronouns", Identity, &["pronouns"], choice(AnswerCandidate::single(v)))
    });

    let contact = &profile.contact;
    add(present(&contact.email), &|v| Target::new("email", Contact, &["email"], text(v)));
    let country = present(&contact.country);
    let phone = present(&contact.phone).map(split_phone);
    let dial_code = phone.as_ref().and_then(|p| p.dial_code.as_deref());
    // The picker goes first: widgets reformat the number for the chosen country.
    add(dial_code, &|code| {
        Target::new(
            "phone_country",
            Contact,
            &["country code", "phone country", "dial code", "calling code"],
            Answer::Choice {
                candidates: country_code_candidates(code, country),
                mode: SelectMode::Search { network: false },
                picker: Picker::PhoneCountry,
            },
        )
    });
    add(present(&contact.phone), &|v| {
        let target = Target::new("phone", Contact, &["phone", "mobile"], text(v))
            .excluding(&["country code", "phone country"]);
        match &phone {
            Some(PhoneNumber {
                dial_code: Some(_),
                local,
            }) => target.after_fill("phone_country", text(local)),
            _ => target,
        }
    });
    let region = present(&contact.state).map(str::to_string);
    add(present(&contact.city), &|v| {
        Target::new(
            "city",
            Contact,
            &["city", "location (city)", "location"],
            Answer::Choice {
                candidates: AnswerCandidate::single(v),
                mode: SelectMode::Search { network: true },
                picker: Picker::Location {
                    region: region.clone(),
                },
            },
        )
        .excluding(&["relocate", "relocation"])
    });
    add(present(&contact.state), &|v| {
        Target::new("state", Contact, &["state", "province"], choice(state_candidates(country, v)))
    });
    add(present(&contact.zip), &|v| {
        Target::new("zip", Contact, &["zip", "postal", "postcode", "zip code"], text(v))
    });

    let professional = &profile.professional;
    add(present(&professional.current_company), &|v| {
        Target::new(
            "current_company",
            Professional,
            &["current company", "current employer", "company name"],
            text(v),
        )
    });
    add(present(&professional.linkedin), &|v| {
        Target::new("linkedin", Professional, &["linkedin"], text(v))
    });
    add(present(&professional.github), &|v| {
        Target::new("github", Professional, &["github"], text(v))
    });
    add(present(&professional.website), &|v| {
        Target::new(
            "website",
            Professional,
            &["website", "portfolio", "personal site"],
            text(v),
        )
        .excluding(&["linkedin", "github"])
    });

    let education = &profile.education;
    add(present(&education.school), &|v| {
        Target::new("school", Education, &["school", "university", "college"], search(v))
    });
    add(present(&education.degree), &|v| {
        Target::new("degree", Education, &["degree"], choice(AnswerCandidate::single(v)))
    });
    add(present(&education.discipline), &|v| {
        Target::new(
            "discipline",
            Education,
            &["discipline", "major", "field of study"],
            search(v),
        )
    });
    add(present(&education.start_year), &|v| {
        Target::new("start_year", Education, &["start year", "start date year"], choice(AnswerCandidate::single(v)))
    });
    add(present(&education.end_year), &|v| {
        Target::new(
            "end_year",
            Education,
            &["end year", "end date year", "graduation year"],
            choice(AnswerCandidate::single(v)),
        )
    });

    // Unset authorization answers are treated as yes.
    let authorization = &profile.authorization;
    plan.push(Target::new(
        "authorized",
        Authorization,
        &["authorized to work", "authorised to work", "eligible to work", "legally authorized"],
        choice(yes_no(authorization.authorized.unwrap_or(true))),
    ));
    plan.push(Target::new(
        "sponsorship",
        Authorization,
        &["sponsorship", "visa sponsor", "require sponsor"],
        choice(yes_no(authorization.needs_sponsorship.unwrap_or(true))),
    ));

    let demographic = &profile.demographic;
    let mut add = |value: Option<&str>, make: &dyn Fn(&str) -> Target| {
        if let Some(value) = value {
            plan.push(make(value));
        }
    };
    add(present(&demographic.gender), &|v| {
        Target::new("gender", Demographic, &["gender"], choice(gender_candidates(v)))
            .excluding(&["gender identity", "identify your gender", "transgender"])
    });
    add(present(&demographic.gender), &|v| {
        Target::new(
            "gender_identity",
            Demographic,
            &["gender identity", "identify your gender"],
            choice(gender_candidates(v)),
        )
    });
    add(present(&demographic.hispanic_latino), &|v| {
        Target::new(
            "hispanic_latino",
            Demographic,
            &["hispanic", "latino", "latinx"],
            choice(AnswerCandidate::single(v)),
        )
    });
    let race = present(&demographic.race_ethnicity).filter(|r| normalize(r) != "prefer not to say");
    add(race, &|v| {
        Target::new(
            "race_ethnicity",
            Demographic,
            &["race", "ethnicity", "identify your race"],
            choice(race_candidates(v)),
        )
        .excluding(&["hispanic", "latino"])
        .every_match()
    });
    add(present(&demographic.veteran_status), &|v| {
        Target::new("veteran", Demographic, &["veteran"], choice(AnswerCandidate::single(v)))
    });
    add(present(&demographic.disability_status), &|v| {
        Target::new("disability", Demographic, &["disability"], choice(AnswerCandidate::single(v)))
    });
    add(present(&demographic.lgbtq), &|v| {
        Target::new(
            "lgbtq",
            Demographic,
            &["lgbtq", "lgbtq+", "lgbt", "sexual orientation"],
            choice(AnswerCandidate::single(v)),
        )
    });

    plan
}
