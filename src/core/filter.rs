use crate::error::Error;
use regex::Regex;
use serde::{Serialize, Serializer};

/// Restricts which domains the provider manages. Two mutually exclusive
/// modes: name lists (suffix matching on dot boundaries) and regular
/// expressions. If either regex is set, the name lists are ignored entirely.
///
/// Serializes to the external-dns negotiation format.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DomainFilter {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    #[serde(
        rename = "regexInclude",
        skip_serializing_if = "Option::is_none",
        serialize_with = "regex_pattern"
    )]
    regex_include: Option<Regex>,
    #[serde(
        rename = "regexExclude",
        skip_serializing_if = "Option::is_none",
        serialize_with = "regex_pattern"
    )]
    regex_exclude: Option<Regex>,
}

fn regex_pattern<S: Serializer>(re: &Option<Regex>, serializer: S) -> Result<S::Ok, S::Error> {
    match re {
        Some(re) => serializer.serialize_str(re.as_str()),
        None => serializer.serialize_none(),
    }
}

impl DomainFilter {
    pub fn with_exclusions(include: Vec<String>, exclude: Vec<String>) -> Self {
        DomainFilter {
            include,
            exclude,
            ..Default::default()
        }
    }

    pub fn from_regex(include: &str, exclude: &str) -> Result<Self, Error> {
        Ok(DomainFilter {
            regex_include: compile_nonempty(include)?,
            regex_exclude: compile_nonempty(exclude)?,
            ..Default::default()
        })
    }

    pub fn matches(&self, domain: &str) -> bool {
        let domain = normalize(domain);
        if self.regex_include.is_some() || self.regex_exclude.is_some() {
            return self.matches_regex(&domain);
        }
        self.matches_lists(&domain)
    }

    fn matches_regex(&self, domain: &str) -> bool {
        if let Some(exclude) = &self.regex_exclude {
            if exclude.is_match(domain) {
                return false;
            }
        }
        match &self.regex_include {
            Some(include) => include.is_match(domain),
            None => true,
        }
    }

    fn matches_lists(&self, domain: &str) -> bool {
        if self.exclude.iter().any(|d| suffix_match(domain, d)) {
            return false;
        }
        if self.include.is_empty() {
            return true;
        }
        self.include.iter().any(|d| suffix_match(domain, d))
    }
}

fn compile_nonempty(pattern: &str) -> Result<Option<Regex>, Error> {
    if pattern.is_empty() {
        return Ok(None);
    }
    Regex::new(pattern)
        .map(Some)
        .map_err(|e| Error::Config(format!("invalid domain filter regex {pattern:?}: {e}")))
}

fn normalize(domain: &str) -> String {
    domain.trim_end_matches('.').to_lowercase()
}

// Matches the domain itself and any name under it, never a partial label.
fn suffix_match(domain: &str, entry: &str) -> bool {
    let entry = normalize(entry);
    domain == entry || domain.ends_with(&format!(".{entry}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = DomainFilter::default();
        assert!(filter.matches("example.com"));
        assert!(filter.matches("foo.example.com"));
    }

    #[test]
    fn test_include_list() {
        let filter = DomainFilter::with_exclusions(vec!["example.com".to_string()], vec![]);
        assert!(filter.matches("example.com"));
        assert!(filter.matches("foo.example.com"));
        assert!(!filter.matches("example.org"));
        // A dot boundary is required, not a plain string suffix.
        assert!(!filter.matches("badexample.com"));
    }

    #[test]
    fn test_exclude_overrides_include() {
        let filter = DomainFilter::with_exclusions(
            vec!["example.com".to_string()],
            vec!["internal.example.com".to_string()],
        );
        assert!(filter.matches("foo.example.com"));
        assert!(!filter.matches("internal.example.com"));
        assert!(!filter.matches("db.internal.example.com"));
    }

    #[test]
    fn test_regex_mode_ignores_lists() {
        let mut filter = DomainFilter::from_regex(r"\.example\.com$", "").unwrap();
        // Lists are present but must be ignored because a regex is set.
        filter.include = vec!["example.org".to_string()];
        assert!(filter.matches("foo.example.com"));
        assert!(!filter.matches("example.org"));
    }

    #[test]
    fn test_regex_exclude() {
        let filter = DomainFilter::from_regex("", r"^internal\.").unwrap();
        assert!(filter.matches("foo.example.com"));
        assert!(!filter.matches("internal.example.com"));
    }

    #[test]
    fn test_invalid_regex_is_config_error() {
        let err = DomainFilter::from_regex("(", "").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_negotiate_serialization() {
        let filter =
            DomainFilter::with_exclusions(vec!["example.com".to_string()], vec![]);
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["include"][0], "example.com");
        assert!(json.get("exclude").is_none());
        assert!(json.get("regexInclude").is_none());

        let filter = DomainFilter::from_regex(r"\.example\.com$", "").unwrap();
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["regexInclude"], r"\.example\.com$");
    }
}
