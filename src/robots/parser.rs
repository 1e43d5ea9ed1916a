//! Robots.txt rule evaluation backed by the robotstxt crate

use robotstxt::DefaultMatcher;

#[derive(Debug, Clone, PartialEq)]
enum Rules {
    AllowAll,
    DisallowAll,
    Content(String),
}

/// Parsed robots.txt data for one domain
///
/// Rule matching is delegated to [`robotstxt::DefaultMatcher`]; this type
/// only keeps the body and the two synthetic outcomes used when no body is
/// available.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRobots {
    rules: Rules,
}

impl ParsedRobots {
    /// Creates a ruleset from raw robots.txt content
    ///
    /// Empty or whitespace-only content allows everything.
    pub fn from_content(content: &str) -> Self {
        if content.trim().is_empty() {
            return Self::allow_all();
        }
        Self {
            rules: Rules::Content(content.to_string()),
        }
    }

    /// A ruleset that allows every URL (missing robots.txt)
    pub fn allow_all() -> Self {
        Self {
            rules: Rules::AllowAll,
        }
    }

    /// A ruleset that denies every URL (robots.txt could not be obtained)
    pub fn disallow_all() -> Self {
        Self {
            rules: Rules::DisallowAll,
        }
    }

    /// Raw robots.txt body, if this ruleset came from one
    pub fn content(&self) -> Option<&str> {
        match &self.rules {
            Rules::Content(body) => Some(body),
            _ => None,
        }
    }

    /// Checks if `url` may be fetched by `user_agent`
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL or path (e.g. "/page.html")
    /// * `user_agent` - The product token matched against `User-agent` groups
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match &self.rules {
            Rules::AllowAll => true,
            Rules::DisallowAll => false,
            Rules::Content(body) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(body, user_agent, url)
            }
        }
    }

    /// Gets the `Crawl-delay` (seconds) that applies to `user_agent`
    ///
    /// Groups are matched like [`is_allowed`](Self::is_allowed) matches them:
    /// the product token of a `User-agent` line must equal the agent, ignoring
    /// case. A group naming the agent wins over the `*` group.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        let body = self.content()?;

        let mut group: Vec<String> = Vec::new();
        let mut in_directives = false;
        let mut for_agent = None;
        let mut for_wildcard = None;

        for line in body.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    // A user-agent line after directives opens a new group
                    if in_directives {
                        group.clear();
                        in_directives = false;
                    }
                    group.push(value.to_string());
                }
                "crawl-delay" => {
                    in_directives = true;
                    let Ok(delay) = value.parse::<f64>() else {
                        continue;
                    };
                    if !delay.is_finite() || delay < 0.0 {
                        continue;
                    }
                    if group.iter().any(|line| names_agent(line, user_agent)) {
                        for_agent.get_or_insert(delay);
                    } else if group.iter().any(|line| is_wildcard(line)) {
                        for_wildcard.get_or_insert(delay);
                    }
                }
                _ => in_directives = true,
            }
        }

        for_agent.or(for_wildcard)
    }
}

/// Product token of a `User-agent` value: its leading `[A-Za-z_-]` run
///
/// `TestBot/1.0 (+https://example.com)` yields `TestBot`.
fn product_token(value: &str) -> &str {
    let end = value
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '-' || c == '_'))
        .unwrap_or(value.len());
    &value[..end]
}

fn names_agent(value: &str, user_agent: &str) -> bool {
    let token = product_token(value);
    !token.is_empty() && token.eq_ignore_ascii_case(user_agent)
}

fn is_wildcard(value: &str) -> bool {
    value
        .strip_prefix('*')
        .map_or(false, |rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}
