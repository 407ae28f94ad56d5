//! City selection for search-backed location widgets.

use super::candidates::region_code;
use crate::text::normalize;

const NORTH_AMERICA: &[&str] = &["united states", "usa", ", us", ", u.s.", "canada", ", ca,"];

/// Choose among location suggestions for `city`, preferring US/Canadian
/// entries and the applicant's own state or province.
///
/// Options not containing the city are never chosen. Ties keep the earlier option.
pub fn pick_location(options: &[String], city: &str, region: Option<&str>) -> Option<usize> {
    let city = normalize(city);
    if city.is_empty() {
        return None;
    }

    let region_name = region.map(normalize).filter(|r| !r.is_empty());
    let code = region.and_then(|r| {
        region_code(None, r).or_else(|| region_code(Some("canada"), r))
    });
    let code = code.map(|c| c.to_lowercase());

    let mut preferred: Vec<String> = NORTH_AMERICA.iter().map(|p| p.to_string()).collect();
    if let Some(name) = &region_name {
        preferred.push(name.clone());
    }
    if let Some(code) = &code {
        preferred.push(format!(", {code},"));
        preferred.push(format!(", {code}"));
    }

    let mut best: Option<(usize, u32)> = None;
    for (index, option) in options.iter().enumerate() {
        let text = normalize(option);
        if !text.contains(&city) {
            continue;
        }
        let mut score = 10;
        if preferred.iter().any(|p| text.contains(p.as_str())) {
            score += 50;
        }
        if code.as_ref().is_some_and(|c| text.contains(&format!(", {c}"))) {
            score += 30;
        } else if region_name.as_ref().is_some_and(|r| text.contains(r.as_str())) {
            score += 20;
        }
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}
