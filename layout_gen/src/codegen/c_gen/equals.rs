use super::emitter::{ArrayElement, FieldEmitter, FieldSite};
use super::helpers::{
    compare_char_pointers, indexed, member, scalar_differs, unsupported_element_marker, unsupported_field_marker,
    CWriter,
};
use crate::layout::Primitive;

/* Equality: every check returns 0 on the first difference */
pub struct EqualsEmitter;

const LHS: &str = "a";
const RHS: &str = "b";

impl FieldEmitter for EqualsEmitter {
    fn primitive(&self, out: &mut CWriter, site: &FieldSite<'_>, prim: Primitive) {
        let cond = scalar_differs(prim, &member(LHS, site.name), &member(RHS, site.name));
        out.line(format!("if ({}) return 0;", cond));
    }

    fn enumeration(&self, out: &mut CWriter, site: &FieldSite<'_>, _enum_name: &str) {
        out.line(format!("if ({} != {}) return 0;", member(LHS, site.name), member(RHS, site.name)));
    }

    fn structure(&self, out: &mut CWriter, site: &FieldSite<'_>, struct_name: &str) {
        out.line(format!(
            "if (!{}_equals(&{}, &{})) return 0;",
            struct_name,
            member(LHS, site.name),
            member(RHS, site.name)
        ));
    }

    fn fixed_array(&self, out: &mut CWriter, site: &FieldSite<'_>, element: ArrayElement<'_>, count: u64) {
        let lhs = indexed(&member(LHS, site.name), "i");
        let rhs = indexed(&member(RHS, site.name), "i");

        out.open(format!("for (size_t i = 0; i < {}; ++i) {{", count));
        match element {
            ArrayElement::Primitive(prim) => {
                out.line(format!("if ({}) return 0;", scalar_differs(prim, &lhs, &rhs)));
            }
            ArrayElement::Enum(_) => out.line(format!("if ({} != {}) return 0;", lhs, rhs)),
            ArrayElement::Struct(name) => {
                out.line(format!("if (!{}_equals(&{}, &{})) return 0;", name, lhs, rhs));
            }
            ArrayElement::CharPointer => compare_char_pointers(out, &lhs, &rhs),
            ArrayElement::Unsupported(element_type) => out.line(unsupported_element_marker(element_type)),
        }
        out.close("}");
    }

    /* Whole buffer, including bytes past the terminator */
    fn char_array(&self, out: &mut CWriter, site: &FieldSite<'_>, _count: u64) {
        let lhs = member(LHS, site.name);
        out.line(format!("if (memcmp({}, {}, sizeof({})) != 0) return 0;", lhs, member(RHS, site.name), lhs));
    }

    fn char_pointer(&self, out: &mut CWriter, site: &FieldSite<'_>) {
        compare_char_pointers(out, &member(LHS, site.name), &member(RHS, site.name));
    }

    fn unsupported(&self, out: &mut CWriter, _site: &FieldSite<'_>, declared_type: &str) {
        out.line(unsupported_field_marker(declared_type));
    }
}
