use crate::types::ActionId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RouteRule
// ---------------------------------------------------------------------------

type Predicate = Box<dyn Fn(&ActionId) -> bool + Send + Sync>;
type PathBuilder = Box<dyn Fn(&ActionId) -> String + Send + Sync>;

/// One `(predicate, path-builder)` pair. Rules are tried in order and the
/// first whose predicate accepts the action builds the upstream path.
pub struct RouteRule {
    pub id: String,
    matches: Predicate,
    path: PathBuilder,
}

impl RouteRule {
    pub fn new(
        id: impl Into<String>,
        matches: impl Fn(&ActionId) -> bool + Send + Sync + 'static,
        path: impl Fn(&ActionId) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            matches: Box::new(matches),
            path: Box::new(path),
        }
    }

    /// Exact-match alias: `action` always goes to `path`.
    pub fn alias(action: ActionId, path: impl Into<String>) -> Self {
        let path: String = path.into();
        let path = normalize_path(&path);
        let id = format!("alias:{action}");
        Self::new(id, move |a| *a == action, move |_| path.clone())
    }

    /// Matches every action: `a.b.c` → `/a/b/c`.
    pub fn dotted() -> Self {
        Self::new("dotted", |_| true, ActionId::dotted_path)
    }
}

impl std::fmt::Debug for RouteRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteRule").field("id", &self.id).finish()
    }
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

// ---------------------------------------------------------------------------
// RouteTable
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAlias {
    pub action: ActionId,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
    pub rule: String,
    pub path: String,
}

/// Prioritized rule list that always ends in the dotted fallback, so every
/// action resolves.
#[derive(Debug)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    /// Alias rules in the given order, then the dotted fallback.
    pub fn from_aliases(aliases: &[RouteAlias]) -> Self {
        let mut rules: Vec<RouteRule> = aliases
            .iter()
            .map(|a| RouteRule::alias(a.action.clone(), a.path.clone()))
            .collect();
        rules.push(RouteRule::dotted());
        Self { rules }
    }

    /// Insert a rule ahead of the dotted fallback and after every existing
    /// rule.
    pub fn with_rule(mut self, rule: RouteRule) -> Self {
        let at = self.rules.len() - 1;
        self.rules.insert(at, rule);
        self
    }

    pub fn rules(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.id.as_str())
    }

    pub fn resolve(&self, action: &ActionId) -> ResolvedRoute {
        for rule in &self.rules {
            if (rule.matches)(action) {
                return ResolvedRoute {
                    rule: rule.id.clone(),
                    path: (rule.path)(action),
                };
            }
        }
        // Unreachable while the dotted rule is last, kept total anyway.
        ResolvedRoute {
            rule: "dotted".to_string(),
            path: action.dotted_path(),
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::from_aliases(&default_aliases())
    }
}

pub fn default_aliases() -> Vec<RouteAlias> {
    [
        ("gmail.send", "/gmail/send"),
        ("email.send", "/email/send"),
        ("slack.post", "/slack/post"),
        ("whatsapp.send", "/whatsapp/send"),
        ("calendar.create", "/calendar/create"),
        ("pipeline.run", "/pipeline/run"),
    ]
    .into_iter()
    .map(|(action, path)| RouteAlias {
        action: ActionId(action.to_string()),
        path: path.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ActionId {
        ActionId::new(s).unwrap()
    }

    #[test]
    fn listed_action_uses_table_path() {
        let table = RouteTable::default();
        let route = table.resolve(&id("gmail.send"));
        assert_eq!(route.path, "/gmail/send");
        assert_eq!(route.rule, "alias:gmail.send");
    }

    #[test]
    fn unlisted_action_uses_dotted_fallback() {
        let table = RouteTable::default();
        let route = table.resolve(&id("foo.bar.baz"));
        assert_eq!(route.path, "/foo/bar/baz");
        assert_eq!(route.rule, "dotted");
    }

    #[test]
    fn table_wins_over_dotted_form() {
        // `mail.send` would fall back to /mail/send; the alias redirects it
        // onto the canonical gmail path.
        let table = RouteTable::from_aliases(&[RouteAlias {
            action: id("mail.send"),
            path: "/gmail/send".into(),
        }]);
        assert_eq!(table.resolve(&id("mail.send")).path, "/gmail/send");
    }

    #[test]
    fn table_wins_when_dotted_form_collides_with_another_entry() {
        // `gmail.send` → /email/send while `email.send` keeps its own path.
        let table = RouteTable::from_aliases(&[
            RouteAlias {
                action: id("gmail.send"),
                path: "/email/send".into(),
            },
            RouteAlias {
                action: id("email.send"),
                path: "/gmail/send".into(),
            },
        ]);
        assert_eq!(table.resolve(&id("gmail.send")).path, "/email/send");
        assert_eq!(table.resolve(&id("email.send")).path, "/gmail/send");
    }

    #[test]
    fn alias_paths_gain_leading_slash() {
        let table = RouteTable::from_aliases(&[RouteAlias {
            action: id("a.b"),
            path: "x/y".into(),
        }]);
        assert_eq!(table.resolve(&id("a.b")).path, "/x/y");
    }

    #[test]
    fn added_rule_runs_before_fallback_without_touching_aliases() {
        let table = RouteTable::default().with_rule(RouteRule::new(
            "crm",
            |a| a.as_str().starts_with("crm."),
            |a| format!("/v2/{}", a.as_str().replace('.', "/")),
        ));
        assert_eq!(table.resolve(&id("crm.lead.create")).path, "/v2/crm/lead/create");
        assert_eq!(table.resolve(&id("gmail.send")).path, "/gmail/send");
        assert_eq!(table.rules().last(), Some("dotted"));
    }
}
