//! Sample generation
//!
//! A sample is a scaffolded operator project produced by driving the
//! scaffolding CLI and patching what it generates. [`SampleContext`] wraps the
//! CLI and the sample directory; [`memcached`] holds the Memcached-with-webhooks
//! sample built on top of it.

pub mod context;
pub mod e2e;
pub mod memcached;

pub use context::{Gvk, SampleContext};

/// Values substituted into code templates
#[derive(Debug, Clone)]
pub struct TemplateVars {
    vars: Vec<(&'static str, String)>,
}

impl TemplateVars {
    /// Variables derived from a GVK: `Domain`, `Group`, `Version`, `Kind`,
    /// `kind` (lowercase), `Resource`, `ApiGroup` and `GroupPath` (`ApiGroup` with dashes)
    pub fn for_gvk(gvk: &Gvk) -> Self {
        let api_group = gvk.api_group();
        Self {
            vars: vec![
                ("Domain", gvk.domain.clone()),
                ("Group", gvk.group.clone()),
                ("Version", gvk.version.clone()),
                ("Kind", gvk.kind.clone()),
                ("kind", gvk.kind.to_lowercase()),
                ("Resource", gvk.resource()),
                ("GroupPath", api_group.replace('.', "-")),
                ("ApiGroup", api_group),
            ],
        }
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.vars.push((key, value.into()));
        self
    }

    /// Replace every known `{{.Key}}` in `template` in a single pass.
    /// Substituted values are not expanded again; unknown keys are left as written.
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{.") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 3..];
            let placeholder = after
                .find("}}")
                .and_then(|end| self.lookup(&after[..end]).map(|value| (value, end)));

            match placeholder {
                Some((value, end)) => {
                    out.push_str(value);
                    rest = &after[end + 2..];
                }
                None => {
                    out.push_str("{{.");
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }

    /// Later `with` values shadow earlier ones
    fn lookup(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memcached() -> Gvk {
        Gvk {
            domain: "example.com".to_string(),
            group: "cache".to_string(),
            version: "v1alpha1".to_string(),
            kind: "Memcached".to_string(),
        }
    }

    #[test]
    fn test_render_gvk_vars() {
        let vars = TemplateVars::for_gvk(&memcached());
        assert_eq!(
            vars.render("/validate-{{.GroupPath}}-{{.Version}}-{{.kind}} {{.ApiGroup}} {{.Resource}}"),
            "/validate-cache-example-com-v1alpha1-memcached cache.example.com memcacheds"
        );
    }

    #[test]
    fn test_render_does_not_expand_substituted_values() {
        let vars = TemplateVars::for_gvk(&memcached()).with("Repo", "github.com/{{.Kind}}/op");
        assert_eq!(vars.render("{{.Repo}} {{.Kind}}"), "github.com/{{.Kind}}/op Memcached");
    }

    #[test]
    fn test_render_unterminated_placeholder() {
        let vars = TemplateVars::for_gvk(&memcached());
        assert_eq!(vars.render("{{.Kind}} {{.Kind"), "Memcached {{.Kind");
    }

    #[test]
    fn test_render_resource_for_irregular_kind() {
        let gvk = Gvk {
            kind: "Policy".to_string(),
            ..memcached()
        };
        let vars = TemplateVars::for_gvk(&gvk);
        assert_eq!(vars.render("resources={{.Resource}}"), "resources=policies");
    }

    #[test]
    fn test_render_extra_vars_and_unknown_left_alone() {
        let vars = TemplateVars::for_gvk(&memcached()).with("Repo", "github.com/example/memcached-operator");
        assert_eq!(
            vars.render("{{.Repo}}/api/{{.Version}} {{.Unknown}}"),
            "github.com/example/memcached-operator/api/v1alpha1 {{.Unknown}}"
        );
    }
}
