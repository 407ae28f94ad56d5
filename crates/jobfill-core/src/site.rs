//! Applicant-tracking site detection.

use url::Url;

/// Known hosting platforms for application forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteKind {
    Greenhouse,
    Workday,
    Lever,
    Icims,
    Jobvite,
    SmartRecruiters,
}

impl SiteKind {
    pub fn name(&self) -> &'static str {
        match self {
            SiteKind::Greenhouse => "greenhouse",
            SiteKind::Workday => "workday",
            SiteKind::Lever => "lever",
            SiteKind::Icims => "icims",
            SiteKind::Jobvite => "jobvite",
            SiteKind::SmartRecruiters => "smartrecruiters",
        }
    }

    /// The site's runtime hydrates after load and may reset early writes.
    pub fn hydrates(&self) -> bool {
        matches!(self, SiteKind::Greenhouse)
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

fn has_numeric_job_segment(path: &str) -> bool {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    while let Some(segment) = segments.next() {
        if segment == "jobs"
            && segments
                .next()
                .is_some_and(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
        {
            return true;
        }
    }
    false
}

/// Classify a page URL. `None` for unknown hosts and unparseable URLs.
pub fn detect_site(url: &str) -> Option<SiteKind> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let path = parsed.path().to_lowercase();

    if host_matches(&host, "greenhouse.io") {
        let posting = has_numeric_job_segment(&path) || parsed.query_pairs().any(|(k, _)| k == "gh_jid");
        return posting.then_some(SiteKind::Greenhouse);
    }
    if host_matches(&host, "myworkdayjobs.com") || host_matches(&host, "workday.com") {
        let posting = path.contains("/job/") || path.contains("/apply");
        return posting.then_some(SiteKind::Workday);
    }
    if host_matches(&host, "lever.co") {
        return Some(SiteKind::Lever);
    }
    if host_matches(&host, "icims.com") {
        return Some(SiteKind::Icims);
    }
    if host_matches(&host, "jobvite.com") {
        return Some(SiteKind::Jobvite);
    }
    if host_matches(&host, "smartrecruiters.com") {
        return Some(SiteKind::SmartRecruiters);
    }
    None
}

/// Whether the URL looks like an application page worth gating on.
pub fn is_candidate_page(url: &str) -> bool {
    detect_site(url).is_some()
}
