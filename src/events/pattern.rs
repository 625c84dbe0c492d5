/// A route pattern split into the static prefix used for matching and the
/// named-parameter suffix that follows it.
///
/// `"/users/:id"` parses to prefix `"/users"` and params `":id"`. The params are
/// kept for later extraction and never take part in dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePattern {
    prefix: String,
    params: String,
}

const PARAM_MARKERS: [char; 2] = [':', '*'];
const SEPARATOR: char = '/';

impl RoutePattern {
    pub fn parse(pattern: &str) -> Self {
        let Some(marker) = pattern.rfind(&PARAM_MARKERS[..]) else {
            return Self::verbatim(pattern);
        };

        // Only a trailing segment counts as parameters.
        let (head, params) = pattern.split_at(marker);
        if !head.contains(SEPARATOR) || params.contains(SEPARATOR) {
            return Self::verbatim(pattern);
        }

        let prefix = head.strip_suffix(SEPARATOR).unwrap_or(head);
        Self {
            prefix: prefix.to_owned(),
            params: params.to_owned(),
        }
    }

    fn verbatim(pattern: &str) -> Self {
        Self {
            prefix: pattern.to_owned(),
            params: String::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn params(&self) -> &str {
        &self.params
    }

    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    /// Literal, case-sensitive prefix test against `uri`.
    pub fn matches(&self, uri: &str) -> bool {
        uri.starts_with(&self.prefix)
    }
}
