use crate::codegen::c_gen::helpers::{epsilon_literal, DOUBLE_EPSILON_MACRO, FLOAT_EPSILON_MACRO, STRDUP_HELPER};
use crate::codegen::c_gen::{emit_struct_unit, prototypes, Linkage, StructUnit};
use crate::config::GeneratorConfig;
use crate::dependency::DependencyGraph;
use crate::error::{Diagnostic, GenError};
use crate::layout::{Classifier, RootSet, TypeRegistry};
use tracing::{debug, info};

const BANNER: &str = "/* Auto-generated by layout-gen. Do not edit. */";

pub struct CCodeGenerator<'a> {
    options: CCodeGeneratorOptions<'a>,
    registry: &'a TypeRegistry,
    classifier: Classifier<'a>,
}

pub struct CCodeGeneratorOptions<'a> {
    /// File name the source unit uses to include the header
    pub header_name: String,
    pub config: &'a GeneratorConfig,
}

/// Text of both artifacts plus what the run found out along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    pub header: String,
    pub source: String,
    /// Struct definition order used for the bodies
    pub order: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> CCodeGenerator<'a> {
    pub fn new(registry: &'a TypeRegistry, options: CCodeGeneratorOptions<'a>) -> Self {
        Self { options, registry, classifier: Classifier::new(registry) }
    }

    /// Generate the header and source text for `roots`. Nothing is written.
    pub fn emit_code(&self, roots: &RootSet) -> Result<GeneratedArtifacts, GenError> {
        let graph = DependencyGraph::build(self.registry, &self.classifier);
        let order = graph.topological_order(Some(roots))?;
        debug!(structs = order.len(), roots = roots.len(), "emitting struct units");

        let mut units: Vec<StructUnit> = Vec::with_capacity(order.len());
        for name in &order {
            let Some(def) = self.registry.get_struct(name) else {
                continue;
            };
            let linkage = if roots.contains(name) { Linkage::External } else { Linkage::Internal };
            units.push(emit_struct_unit(name, def, linkage, &self.classifier));
        }

        let header = self.emit_header(roots);
        let source = self.emit_source(&units);
        let diagnostics: Vec<Diagnostic> = units.iter().flat_map(|u| u.diagnostics.iter().cloned()).collect();

        info!(
            structs = units.len(),
            warnings = diagnostics.len(),
            "generated C serializers"
        );

        Ok(GeneratedArtifacts { header, source, order, diagnostics })
    }

    fn emit_header(&self, roots: &RootSet) -> String {
        let mut output = String::new();
        output.push_str(BANNER);
        output.push('\n');
        output.push_str("#pragma once\n\n");
        output.push_str(&format!("#include \"{}\"\n", self.options.config.json_header));
        for header in &self.options.config.types_headers {
            output.push_str(&format!("#include \"{}\"\n", header));
        }
        output.push('\n');

        output.push_str("#ifdef __cplusplus\nextern \"C\" {\n#endif\n\n");
        for root in roots.names() {
            for prototype in prototypes(root, Linkage::External) {
                output.push_str(&prototype);
                output.push('\n');
            }
            output.push('\n');
        }
        output.push_str("#ifdef __cplusplus\n}\n#endif\n");

        output
    }

    fn emit_source(&self, units: &[StructUnit]) -> String {
        let config = self.options.config;
        let mut output = String::new();
        output.push_str(BANNER);
        output.push('\n');
        output.push_str(&format!("#include \"{}\"\n\n", self.options.header_name));
        output.push_str("#include <math.h>   /* for fabs, fabsf */\n");
        output.push_str("#include <stdlib.h> /* for malloc */\n");
        output.push_str("#include <string.h> /* for memcpy, strcmp */\n\n");

        output.push_str(&format!(
            "#ifndef {name}\n#define {name} {value}\n#endif\n",
            name = FLOAT_EPSILON_MACRO,
            value = epsilon_literal(config.float_epsilon, true)
        ));
        output.push_str(&format!(
            "#ifndef {name}\n#define {name} {value}\n#endif\n\n",
            name = DOUBLE_EPSILON_MACRO,
            value = epsilon_literal(config.double_epsilon, false)
        ));

        if units.iter().any(|u| u.needs_strdup) {
            output.push_str(&emit_strdup_helper());
            output.push('\n');
        }

        let helpers: Vec<&StructUnit> = units.iter().filter(|u| u.linkage == Linkage::Internal).collect();
        if !helpers.is_empty() {
            output.push_str("/* Forward declarations for static helpers */\n");
            for unit in &helpers {
                for prototype in prototypes(&unit.name, Linkage::Internal) {
                    output.push_str(&prototype);
                    output.push('\n');
                }
            }
            output.push('\n');
        }

        for unit in units {
            output.push_str(&format!("/*  ----- FUNCTIONS FOR {} ----- */\n\n", unit.name));
            output.push_str(&unit.body);
            output.push('\n');
        }

        output
    }
}

/* Written out rather than calling strdup, which is not ISO C before C23 */
fn emit_strdup_helper() -> String {
    format!(
        concat!(
            "static char *{name}(const char *text) {{\n",
            "    size_t len = strlen(text);\n",
            "    char *copy = (char *)malloc(len + 1);\n",
            "    if (copy) memcpy(copy, text, len + 1);\n",
            "    return copy;\n",
            "}}\n"
        ),
        name = STRDUP_HELPER
    )
}
