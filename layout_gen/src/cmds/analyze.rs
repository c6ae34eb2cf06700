/* Analyze command - per-field categories, definition order and layout checks */

use super::common::{load_registry, print_diagnostics};
use anyhow::Context;
use layout_gen::codegen::c_gen::struct_diagnostics;
use layout_gen::dependency::DependencyGraph;
use layout_gen::error::Diagnostic;
use layout_gen::layout::checks::{check_struct_layout, LayoutWarning};
use layout_gen::layout::{Classifier, RootSet, TypeRegistry};
use layout_types::{TypeDef, TypeDefKind};
use serde_derive::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub types: Vec<TypeSummary>,
    pub roots: Vec<String>,
    /// Definition order; absent when it could not be computed
    pub order: Option<Vec<String>>,
    pub order_error: Option<String>,
    pub cycles: Vec<Vec<String>>,
    pub diagnostics: Vec<Diagnostic>,
    pub layout_warnings: Vec<LayoutWarning>,
}

#[derive(Debug, Serialize)]
pub struct TypeSummary {
    pub name: String,
    pub kind: TypeDefKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<(String, i64)>,
}

#[derive(Debug, Serialize)]
pub struct FieldSummary {
    pub name: String,
    pub declared_type: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/* Execute the analyze command */
pub fn run(files: Vec<PathBuf>, roots: Vec<String>, json: bool) -> anyhow::Result<()> {
    let registry = load_registry(&files, !json)?;
    let report = build_report(&registry, &roots)?;

    if json {
        let text = serde_json::to_string_pretty(&report).context("failed to serialize analysis report")?;
        println!("{}", text);
    } else {
        print_report(&report);
    }

    Ok(())
}

/* Root errors are fatal; ordering problems are part of the report */
pub fn build_report(registry: &TypeRegistry, roots: &[String]) -> anyhow::Result<AnalysisReport> {
    let classifier = Classifier::new(registry);
    let graph = DependencyGraph::build(registry, &classifier);

    let root_set = if roots.is_empty() { None } else { Some(RootSet::resolve(roots, registry)?) };
    let (order, order_error) = match graph.topological_order(root_set.as_ref()) {
        Ok(order) => (Some(order), None),
        Err(err) => (None, Some(err.to_string())),
    };

    let mut types = Vec::with_capacity(registry.len());
    let mut diagnostics = Vec::new();
    let mut layout_warnings = Vec::new();

    for (name, def) in registry.iter() {
        let summary = match def {
            TypeDef::Struct(s) => {
                diagnostics.extend(struct_diagnostics(name, s, &classifier));
                layout_warnings.extend(check_struct_layout(name, s));
                TypeSummary {
                    name: name.to_string(),
                    kind: def.kind(),
                    size: s.size,
                    fields: s
                        .fields
                        .iter()
                        .map(|f| FieldSummary {
                            name: f.name.clone(),
                            declared_type: f.declared_type.clone(),
                            category: classifier.classify(&f.declared_type).to_string(),
                            offset: f.offset,
                            size: f.size,
                        })
                        .collect(),
                    values: Vec::new(),
                }
            }
            TypeDef::Enum(e) => TypeSummary {
                name: name.to_string(),
                kind: def.kind(),
                size: None,
                fields: Vec::new(),
                values: e.values.iter().map(|v| (v.name.clone(), v.value)).collect(),
            },
        };
        types.push(summary);
    }

    Ok(AnalysisReport {
        types,
        roots: root_set.map(|r| r.names().to_vec()).unwrap_or_default(),
        order,
        order_error,
        cycles: graph.detect_cycles().into_iter().map(|c| c.cycle).collect(),
        diagnostics,
        layout_warnings,
    })
}

fn print_report(report: &AnalysisReport) {
    println!("[~] Field categories:");
    for summary in &report.types {
        match summary.kind {
            TypeDefKind::Struct => {
                match summary.size {
                    Some(size) => println!("  struct {} ({} bytes)", summary.name, size),
                    None => println!("  struct {}", summary.name),
                }
                for field in &summary.fields {
                    println!("    {:<20} {:<24} {}", field.name, field.declared_type, field.category);
                }
            }
            TypeDefKind::Enum => {
                println!("  enum {} ({} values)", summary.name, summary.values.len());
            }
        }
    }
    println!();

    match (&report.order, &report.order_error) {
        (Some(order), _) => println!("[✓] Definition order: {}", order.join(" -> ")),
        (None, Some(err)) => println!("[✗] {}", err),
        (None, None) => {}
    }

    if report.cycles.is_empty() {
        println!("[✓] No circular dependencies detected");
    } else {
        println!("[✗] {} circular dependency cycle(s) detected:", report.cycles.len());
        for cycle in &report.cycles {
            println!("  [~] Cycle: {}", cycle.join(" -> "));
        }
    }

    print_diagnostics(&report.diagnostics);

    if report.layout_warnings.is_empty() {
        println!("[✓] No layout warnings");
    } else {
        println!("[!] {} layout warning(s):", report.layout_warnings.len());
        for warning in &report.layout_warnings {
            println!("  [!] {}", warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_gen::layout::file::parse_document;

    fn registry(text: &str) -> TypeRegistry {
        TypeRegistry::from_documents([parse_document(text).unwrap()])
    }

    #[test]
    fn test_report_collects_everything() {
        let registry = registry(r#"{"types": {
            "Color": {"kind": "enum", "values": [{"name": "RED", "value": 0}, {"name": "GREEN", "value": 1}]},
            "Point": {"size": 8, "fields": [
                {"name": "x", "type": "float", "offset": 0, "size": 4},
                {"name": "y", "type": "float", "offset": 2, "size": 4}
            ]},
            "Shape": {"fields": [
                {"name": "origin", "type": "Point"},
                {"name": "color", "type": "Color"},
                {"name": "next", "type": "Shape*"}
            ]}
        }}"#);

        let report = build_report(&registry, &[]).unwrap();
        assert_eq!(report.order, Some(vec!["Point".to_string(), "Shape".to_string()]));
        assert!(report.cycles.is_empty());
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.layout_warnings.len(), 1);
        assert_eq!(report.types[2].fields[1].category, "enum(Color)");
        assert_eq!(report.types[0].values.len(), 2);
    }

    #[test]
    fn test_cycle_is_reported_not_fatal() {
        let registry = registry(r#"{"types": {
            "A": {"fields": [{"name": "b", "type": "B"}]},
            "B": {"fields": [{"name": "a", "type": "A"}]}
        }}"#);

        let report = build_report(&registry, &[]).unwrap();
        assert!(report.order.is_none());
        assert!(report.order_error.unwrap().contains("cycle"));
        assert_eq!(report.cycles, vec![vec!["A", "B", "A"]]);
    }

    #[test]
    fn test_json_report_is_tagged() {
        let registry = registry(r#"{"struct": "S", "fields": [{"name": "p", "type": "int*"}]}"#);
        let report = build_report(&registry, &["S".to_string()]).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["diagnostics"][0]["kind"], "unsupported-field");
        assert_eq!(value["types"][0]["kind"], "struct");
        assert_eq!(value["roots"][0], "S");
    }
}
