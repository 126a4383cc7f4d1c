//! Meeting link resolution from free-form text.
//!
//! A [`LinkResolver`] runs an ordered chain of [`LinkMatcher`]s over the text
//! and returns the first candidate found, made absolute with `https://` when it
//! has no scheme.

use once_cell::sync::Lazy;
use regex::Regex;

pub const PROVIDER_DOMAINS: &[&str] = &[
    "meet.google.com",
    "zoom.us",
    "teams.microsoft.com",
    "webex.com",
];

static EXPLICIT_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i:https?)://[^\s,]+").expect("static url pattern"));

static PROVIDER_TOKEN: Lazy<Regex> = Lazy::new(|| {
    let domains = PROVIDER_DOMAINS
        .iter()
        .map(|domain| regex::escape(domain))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?i)/*((?:[a-z0-9-]+\.)*(?:{})[^\s,]*)",
        domains
    ))
    .expect("static domain pattern")
});

/// Closing punctuation a provider link may be wrapped in.
const TRAILING_PUNCTUATION: &[char] = &[')', ']', '>', '.', ';', '"', '\''];

static MEET_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-z]{3}-[a-z]{4}-[a-z]{3}\b").expect("static code pattern"));

/// One heuristic in the resolution chain.
pub trait LinkMatcher {
    fn name(&self) -> &'static str;

    /// A link candidate in `text`, with or without scheme.
    fn find(&self, text: &str) -> Option<String>;
}

/// `http://` or `https://` up to the next whitespace or comma.
pub struct ExplicitUrl;

impl LinkMatcher for ExplicitUrl {
    fn name(&self) -> &'static str {
        "explicit-url"
    }

    fn find(&self, text: &str) -> Option<String> {
        EXPLICIT_URL.find(text).map(|m| m.as_str().to_owned())
    }
}

/// One of [`PROVIDER_DOMAINS`], with its subdomains and path, up to the next
/// whitespace or comma.
pub struct ProviderDomain;

impl LinkMatcher for ProviderDomain {
    fn name(&self) -> &'static str {
        "provider-domain"
    }

    fn find(&self, text: &str) -> Option<String> {
        PROVIDER_TOKEN
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim_end_matches(TRAILING_PUNCTUATION))
            .find(|link| !link.is_empty())
            .map(str::to_owned)
    }
}

/// A bare Google Meet code such as `abc-defg-hij`.
pub struct MeetCode;

impl LinkMatcher for MeetCode {
    fn name(&self) -> &'static str {
        "meet-code"
    }

    fn find(&self, text: &str) -> Option<String> {
        MEET_CODE
            .find(text)
            .map(|m| format!("meet.google.com/{}", m.as_str()))
    }
}

pub struct LinkResolver {
    matchers: Vec<Box<dyn LinkMatcher>>,
}

impl Default for LinkResolver {
    fn default() -> Self {
        LinkResolver::new()
            .with(ExplicitUrl)
            .with(ProviderDomain)
            .with(MeetCode)
    }
}

impl LinkResolver {
    /// A resolver without any matchers. It never finds anything.
    pub fn new() -> Self {
        LinkResolver {
            matchers: Vec::new(),
        }
    }

    /// Appends `matcher` to the end of the chain.
    pub fn with<M: LinkMatcher + 'static>(mut self, matcher: M) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    pub fn matchers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.matchers.iter().map(|m| m.name())
    }

    pub fn resolve(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }

        self.matchers.iter().find_map(|matcher| {
            matcher.find(text).map(|candidate| {
                log::debug!("Link matched by {}: {}", matcher.name(), candidate);
                with_scheme(&candidate)
            })
        })
    }

    /// Resolves the first of `texts` that yields a link.
    pub fn resolve_any<'t, I>(&self, texts: I) -> Option<String>
    where
        I: IntoIterator<Item = Option<&'t str>>,
    {
        texts
            .into_iter()
            .flatten()
            .find_map(|text| self.resolve(text))
    }
}

fn with_scheme(candidate: &str) -> String {
    let lower = candidate.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        candidate.to_owned()
    } else {
        format!("https://{}", candidate)
    }
}
