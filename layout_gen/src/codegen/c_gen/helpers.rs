use crate::layout::{Primitive, PrimitiveClass};

pub const FLOAT_EPSILON_MACRO: &str = "AUTOGEN_FLOAT_EPSILON";
pub const DOUBLE_EPSILON_MACRO: &str = "AUTOGEN_DOUBLE_EPSILON";

/// Static helper emitted into the source unit when a char pointer needs owned storage.
pub const STRDUP_HELPER: &str = "autogen_strdup";

const INDENT: &str = "    ";

/* Line-oriented writer for C text; indentation follows open/close */
#[derive(Debug, Default)]
pub struct CWriter {
    out: String,
    depth: usize,
}

impl CWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Write `text` (usually ending in `{`) and indent what follows.
    pub fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.depth += 1;
    }

    pub fn close(&mut self, text: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/* Member access through a struct pointer, e.g. `s->x`, `a->values[i]` */
pub fn member(base: &str, field: &str) -> String {
    format!("{}->{}", base, field)
}

pub fn indexed(expr: &str, index: &str) -> String {
    format!("{}[{}]", expr, index)
}

/* Field names are validated C identifiers, so they need no escaping */
pub fn json_key(field: &str) -> String {
    format!("\"{}\"", field)
}

/* Normalize a truth value to 0/1 */
pub fn bool_c_value(expr: &str) -> String {
    format!("({} ? 1 : 0)", expr)
}

/* Expression that builds a standalone cJSON node for a scalar */
pub fn create_scalar_node(prim: Primitive, expr: &str) -> String {
    match prim.class() {
        PrimitiveClass::Bool => format!("cJSON_CreateBool({} ? 1 : 0)", expr),
        _ => format!("cJSON_CreateNumber((double){})", expr),
    }
}

/* Condition that holds when two scalars differ */
pub fn scalar_differs(prim: Primitive, lhs: &str, rhs: &str) -> String {
    match prim.class() {
        PrimitiveClass::Float => format!("fabsf({} - {}) > {}", lhs, rhs, FLOAT_EPSILON_MACRO),
        PrimitiveClass::Double => format!("fabs({} - {}) > {}", lhs, rhs, DOUBLE_EPSILON_MACRO),
        PrimitiveClass::Bool => format!("{} != {}", bool_c_value(lhs), bool_c_value(rhs)),
        PrimitiveClass::Integer => format!("{} != {}", lhs, rhs),
    }
}

/* Guarded scalar read from the cJSON node `node` into `target` */
pub fn read_scalar(out: &mut CWriter, prim: Primitive, node: &str, target: &str) {
    match prim.class() {
        PrimitiveClass::Bool => {
            out.open(format!("if (cJSON_IsBool({})) {{", node));
            out.line(format!("{} = cJSON_IsTrue({}) ? 1 : 0;", target, node));
            out.close("}");
            out.open(format!("else if (cJSON_IsNumber({})) {{", node));
            out.line(format!("{} = {}->valuedouble != 0;", target, node));
            out.close("}");
        }
        _ => {
            out.open(format!("if (cJSON_IsNumber({})) {{", node));
            out.line(format!("{} = ({}){}->valuedouble;", target, prim.c_type(), node));
            out.close("}");
        }
    }
}

/* Guarded enum read; the value is cast to the enum type */
pub fn read_enum(out: &mut CWriter, enum_name: &str, node: &str, target: &str) {
    out.open(format!("if (cJSON_IsNumber({})) {{", node));
    out.line(format!("{} = ({}){}->valueint;", target, enum_name, node));
    out.close("}");
}

/* Replace the pointer with a fresh copy when a string node is present */
pub fn read_char_pointer(out: &mut CWriter, node: &str, target: &str) {
    out.open(format!("if (cJSON_IsString({}) && {}->valuestring) {{", node, node));
    out.line(format!("{} = {}({}->valuestring);", target, STRDUP_HELPER, node));
    out.close("}");
}

/* Both null equal, one null unequal, otherwise compare the text */
pub fn compare_char_pointers(out: &mut CWriter, lhs: &str, rhs: &str) {
    out.open(format!("if ({} != {}) {{", lhs, rhs));
    out.line(format!("if (!{} || !{}) return 0;", lhs, rhs));
    out.line(format!("if (strcmp({}, {}) != 0) return 0;", lhs, rhs));
    out.close("}");
}

pub fn unsupported_field_marker(declared_type: &str) -> String {
    format!("/* Unsupported field type: {} */", comment_safe(declared_type))
}

pub fn unsupported_element_marker(declared_type: &str) -> String {
    format!("/* Unsupported array element type: {} */", comment_safe(declared_type))
}

/* Declared types come from external documents; keep them from closing the comment */
fn comment_safe(text: &str) -> String {
    text.replace("*/", "* /")
}

/* Format an epsilon as a C literal, `f` suffixed for float */
pub fn epsilon_literal(value: f64, float_suffix: bool) -> String {
    let mut literal = format!("{:e}", value);
    if !literal.contains('.') {
        if let Some(pos) = literal.find('e') {
            literal.insert_str(pos, ".0");
        }
    }
    if float_suffix {
        literal.push('f');
    }
    literal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_indents_nested_blocks() {
        let mut out = CWriter::new();
        out.open("{");
        out.line("int x = 0;");
        out.blank();
        out.close("}");
        assert_eq!(out.finish(), "{\n    int x = 0;\n\n}\n");
    }

    #[test]
    fn test_scalar_comparisons() {
        assert_eq!(
            scalar_differs(Primitive::Float, "a->x", "b->x"),
            "fabsf(a->x - b->x) > AUTOGEN_FLOAT_EPSILON"
        );
        assert_eq!(
            scalar_differs(Primitive::Double, "a->x", "b->x"),
            "fabs(a->x - b->x) > AUTOGEN_DOUBLE_EPSILON"
        );
        assert_eq!(scalar_differs(Primitive::Bool, "a->f", "b->f"), "(a->f ? 1 : 0) != (b->f ? 1 : 0)");
        assert_eq!(scalar_differs(Primitive::Uint16, "a->n", "b->n"), "a->n != b->n");
    }

    #[test]
    fn test_epsilon_literals() {
        assert_eq!(epsilon_literal(1e-6, true), "1.0e-6f");
        assert_eq!(epsilon_literal(1e-9, false), "1.0e-9");
        assert_eq!(epsilon_literal(2.5e-4, false), "2.5e-4");
    }

    #[test]
    fn test_markers_cannot_close_comment() {
        assert_eq!(unsupported_field_marker("int*/x"), "/* Unsupported field type: int* /x */");
    }
}
