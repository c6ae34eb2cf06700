use super::emitter::{emit_field, ArrayElement, FieldEmitter, FieldSite};
use super::equals::EqualsEmitter;
use super::from_json::FromJsonEmitter;
use super::helpers::CWriter;
use super::to_json::ToJsonEmitter;
use crate::error::Diagnostic;
use crate::layout::{Category, Classifier};
use layout_types::StructDef;
use serde_derive::Serialize;
use tracing::warn;

/// Roots are external; every other struct is a `static` helper of the source unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Linkage {
    External,
    Internal,
}

impl Linkage {
    fn storage(self) -> &'static str {
        match self {
            Linkage::External => "",
            Linkage::Internal => "static ",
        }
    }
}

pub fn to_json_signature(name: &str) -> String {
    format!("void {}_to_json(const {} *s, cJSON *obj)", name, name)
}

pub fn from_json_signature(name: &str) -> String {
    format!("void {}_from_json({} *s, const cJSON *obj)", name, name)
}

pub fn equals_signature(name: &str) -> String {
    format!("int {}_equals(const {} *a, const {} *b)", name, name, name)
}

/* The three declarations for a struct, in to_json, from_json, equals order */
pub fn prototypes(name: &str, linkage: Linkage) -> [String; 3] {
    let storage = linkage.storage();
    [
        format!("{}{};", storage, to_json_signature(name)),
        format!("{}{};", storage, from_json_signature(name)),
        format!("{}{};", storage, equals_signature(name)),
    ]
}

/// Generated functions for one struct plus what was learned emitting them.
#[derive(Debug, Clone)]
pub struct StructUnit {
    pub name: String,
    pub linkage: Linkage,
    pub body: String,
    pub diagnostics: Vec<Diagnostic>,
    pub needs_strdup: bool,
}

pub fn emit_struct_unit(name: &str, def: &StructDef, linkage: Linkage, classifier: &Classifier<'_>) -> StructUnit {
    let fields = classify_fields(def, classifier);
    let diagnostics = field_diagnostics(name, &fields);
    for diagnostic in &diagnostics {
        warn!("{}", diagnostic);
    }
    let needs_strdup = fields.iter().any(|(_, category)| match category {
        Category::CharPointer => true,
        Category::FixedArray { element, .. } => matches!(**element, Category::CharPointer),
        _ => false,
    });

    let storage = linkage.storage();
    let mut out = CWriter::new();

    out.open(format!("{}{} {{", storage, to_json_signature(name)));
    out.line("if (!s || !obj) return;");
    emit_fields(&ToJsonEmitter, &mut out, &fields);
    out.close("}");
    out.blank();

    out.open(format!("{}{} {{", storage, from_json_signature(name)));
    out.line("if (!s || !obj) return;");
    emit_fields(&FromJsonEmitter, &mut out, &fields);
    out.close("}");
    out.blank();

    out.open(format!("{}{} {{", storage, equals_signature(name)));
    out.line("if (a == b) return 1;");
    out.line("if (!a || !b) return 0;");
    emit_fields(&EqualsEmitter, &mut out, &fields);
    out.line("return 1;");
    out.close("}");

    StructUnit { name: name.to_string(), linkage, body: out.finish(), diagnostics, needs_strdup }
}

/// Unsupported fields and array elements of one struct, in field order.
pub fn struct_diagnostics(name: &str, def: &StructDef, classifier: &Classifier<'_>) -> Vec<Diagnostic> {
    field_diagnostics(name, &classify_fields(def, classifier))
}

fn classify_fields<'a>(def: &'a StructDef, classifier: &Classifier<'_>) -> Vec<(FieldSite<'a>, Category)> {
    def.fields
        .iter()
        .map(|f| {
            let site = FieldSite { name: &f.name, declared_type: &f.declared_type };
            (site, classifier.classify(&f.declared_type))
        })
        .collect()
}

fn field_diagnostics(owner: &str, fields: &[(FieldSite<'_>, Category)]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (site, category) in fields {
        match category {
            Category::Unsupported(declared) => diagnostics.push(Diagnostic::UnsupportedField {
                type_name: owner.to_string(),
                field: site.name.to_string(),
                declared_type: declared.clone(),
            }),
            Category::FixedArray { element, element_type, .. } => {
                if matches!(ArrayElement::from_category(element, element_type), ArrayElement::Unsupported(_)) {
                    diagnostics.push(Diagnostic::UnsupportedElement {
                        type_name: owner.to_string(),
                        field: site.name.to_string(),
                        declared_type: site.declared_type.to_string(),
                    });
                }
            }
            _ => {}
        }
    }
    diagnostics
}

fn emit_fields<E: FieldEmitter>(emitter: &E, out: &mut CWriter, fields: &[(FieldSite<'_>, Category)]) {
    for (site, category) in fields {
        emit_field(emitter, out, site, category);
    }
}
