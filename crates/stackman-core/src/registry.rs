//! Kind registry: ordering priority and script locators per kind.

use std::collections::HashMap;

use crate::document::{Node, NodePath};
use crate::error::Result;
use crate::kind::Kind;
use crate::locate::{locate, require, require_text};

/// An embedded script found inside an object's spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRef {
    /// Base name for the extracted file, before disambiguation and escaping.
    pub name: String,
    /// Where the script scalar lives, relative to the spec root.
    pub path: NodePath,
}

/// Finds the embedded scripts of one kind of object.
///
/// Results must be ordered by position in the source document.
pub trait Locator: Send + Sync {
    fn locate_scripts(&self, spec: &Node) -> Result<Vec<ScriptRef>>;
}

impl<F> Locator for F
where
    F: Fn(&Node) -> Result<Vec<ScriptRef>> + Send + Sync,
{
    fn locate_scripts(&self, spec: &Node) -> Result<Vec<ScriptRef>> {
        self(spec)
    }
}

struct Registration {
    priority: u8,
    locator: Option<Box<dyn Locator>>,
}

/// Maps each kind to its priority in a united stream and to its locator.
///
/// Kinds that were never registered have priority 0 and no scripts.
pub struct KindRegistry {
    entries: HashMap<Kind, Registration>,
}

impl KindRegistry {
    /// A registry that knows no kinds.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a kind without embedded scripts.
    pub fn register(&mut self, kind: Kind, priority: u8) -> &mut Self {
        self.entries.insert(
            kind,
            Registration {
                priority,
                locator: None,
            },
        );
        self
    }

    /// Register a kind together with the locator for its scripts.
    pub fn register_with_locator(
        &mut self,
        kind: Kind,
        priority: u8,
        locator: impl Locator + 'static,
    ) -> &mut Self {
        self.entries.insert(
            kind,
            Registration {
                priority,
                locator: Some(Box::new(locator)),
            },
        );
        self
    }

    /// Higher priorities come first in a united stream.
    pub fn priority(&self, kind: &Kind) -> u8 {
        self.entries.get(kind).map_or(0, |r| r.priority)
    }

    /// Find the embedded scripts of an object of the given kind.
    pub fn locate(&self, kind: &Kind, spec: &Node) -> Result<Vec<ScriptRef>> {
        match self.entries.get(kind).and_then(|r| r.locator.as_ref()) {
            Some(locator) => locator.locate_scripts(spec),
            None => Ok(Vec::new()),
        }
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(Kind::Label, 4)
            .register_with_locator(Kind::CheckThreshold, 3, single_query)
            .register_with_locator(Kind::CheckDeadman, 3, single_query)
            .register_with_locator(Kind::Task, 2, single_query)
            .register_with_locator(Kind::Dashboard, 1, dashboard_queries)
            .register_with_locator(Kind::Variable, 0, optional_query);
        registry
    }
}

const QUERY: &str = "query";

/// Tasks and checks carry exactly one query, at `spec.query`.
pub fn single_query(spec: &Node) -> Result<Vec<ScriptRef>> {
    let root = NodePath::root();
    require(spec, QUERY, &root)?;
    Ok(vec![ScriptRef {
        name: QUERY.to_string(),
        path: root.key(QUERY),
    }])
}

/// Variables only have a query when they are of the query type.
pub fn optional_query(spec: &Node) -> Result<Vec<ScriptRef>> {
    let root = NodePath::root();
    Ok(locate(spec, QUERY)
        .map(|_| ScriptRef {
            name: QUERY.to_string(),
            path: root.key(QUERY),
        })
        .into_iter()
        .collect())
}

/// Every query of every chart, named `<chart name>_<chart kind>`.
///
/// Missing `charts` or `queries` mean there is nothing to extract; a chart
/// without a name or kind, or a query item without `query`, is an error.
pub fn dashboard_queries(spec: &Node) -> Result<Vec<ScriptRef>> {
    let charts_path = NodePath::root().key("charts");
    let charts = locate(spec, "charts").map(Node::items).unwrap_or_default();

    let mut scripts = Vec::new();
    for (i, chart) in charts.iter().enumerate() {
        let chart_path = charts_path.index(i);
        let name = format!(
            "{}_{}",
            require_text(chart, "name", &chart_path)?,
            require_text(chart, "kind", &chart_path)?
        );

        let queries_path = chart_path.key("queries");
        let queries = locate(chart, "queries").map(Node::items).unwrap_or_default();
        for (j, query) in queries.iter().enumerate() {
            let query_path = queries_path.index(j);
            require(query, QUERY, &query_path)?;
            scripts.push(ScriptRef {
                name: name.clone(),
                path: query_path.key(QUERY),
            });
        }
    }

    Ok(scripts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn tree(yaml: &str) -> Node {
        Node::from_value(serde_yaml::from_str(yaml).unwrap()).unwrap()
    }

    #[test]
    fn test_default_priorities() {
        let registry = KindRegistry::default();
        assert!(registry.priority(&Kind::Label) > registry.priority(&Kind::CheckThreshold));
        assert!(registry.priority(&Kind::CheckThreshold) > registry.priority(&Kind::Task));
        assert!(registry.priority(&Kind::Task) > registry.priority(&Kind::Dashboard));
        assert!(registry.priority(&Kind::Dashboard) > registry.priority(&Kind::Other("Bucket".into())));
    }

    #[test]
    fn test_unregistered_kind_has_no_scripts() {
        let registry = KindRegistry::default();
        let spec = tree("name: b\nquery: not a script\n");
        let scripts = registry.locate(&Kind::Other("Bucket".into()), &spec).unwrap();
        assert!(scripts.is_empty());
        assert!(registry.locate(&Kind::Label, &spec).unwrap().is_empty());
    }

    #[test]
    fn test_task_query_is_strict() {
        let spec = tree("name: nightly\nevery: 1h\n");
        let err = KindRegistry::default().locate(&Kind::Task, &spec).unwrap_err();
        assert!(matches!(err, Error::MissingKey { ref key, .. } if key == "query"));
    }

    #[test]
    fn test_task_query_path() {
        let spec = tree("name: nightly\nquery: from(bucket: \"b\")\n");
        let scripts = KindRegistry::default().locate(&Kind::Task, &spec).unwrap();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].name, "query");
        assert_eq!(scripts[0].path.to_string(), "spec.query");
    }

    #[test]
    fn test_variable_query_is_tolerant() {
        let registry = KindRegistry::default();
        let constant = tree("name: hosts\ntype: constant\nvalues: [a, b]\n");
        assert!(registry.locate(&Kind::Variable, &constant).unwrap().is_empty());

        let query = tree("name: hosts\ntype: query\nquery: buckets()\n");
        assert_eq!(registry.locate(&Kind::Variable, &query).unwrap().len(), 1);
    }

    #[test]
    fn test_dashboard_without_charts_is_empty() {
        let spec = tree("name: empty\n");
        assert!(dashboard_queries(&spec).unwrap().is_empty());
    }

    #[test]
    fn test_dashboard_chart_without_queries_is_empty() {
        let spec = tree("name: d\ncharts:\n- name: note\n  kind: markdown\n");
        assert!(dashboard_queries(&spec).unwrap().is_empty());
    }

    #[test]
    fn test_dashboard_queries_in_document_order() {
        let spec = tree(
            r#"
name: d
charts:
  - name: cpu
    kind: xy
    queries:
      - query: a
      - query: b
  - name: mem
    kind: gauge
    queries:
      - query: c
"#,
        );
        let scripts = dashboard_queries(&spec).unwrap();
        let names: Vec<_> = scripts.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["cpu_xy", "cpu_xy", "mem_gauge"]);

        let values: Vec<_> = scripts
            .iter()
            .map(|s| s.path.resolve(&spec).and_then(Node::as_str).unwrap())
            .collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dashboard_chart_without_kind_is_strict() {
        let spec = tree("charts:\n- name: cpu\n  queries:\n  - query: a\n");
        let err = dashboard_queries(&spec).unwrap_err();
        match err {
            Error::MissingKey { key, context } => {
                assert_eq!(key, "kind");
                assert_eq!(context, "spec.charts[0]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = KindRegistry::empty();
        registry.register_with_locator(Kind::Other("Script".into()), 9, single_query);
        let spec = tree("query: x\n");
        assert_eq!(registry.priority(&Kind::Other("Script".into())), 9);
        assert_eq!(registry.locate(&Kind::Other("Script".into()), &spec).unwrap().len(), 1);
        assert!(registry.locate(&Kind::Task, &spec).unwrap().is_empty());
    }
}
