use super::emitter::{ArrayElement, FieldEmitter, FieldSite};
use super::helpers::{
    indexed, json_key, member, read_char_pointer, read_enum, read_scalar, unsupported_element_marker,
    unsupported_field_marker, CWriter,
};
use crate::layout::Primitive;

/* Deserializer: `obj` is the source object, `s` the struct being filled.
 * Fields whose key is absent or of the wrong document type are left untouched. */
pub struct FromJsonEmitter;

const TARGET: &str = "s";
const OBJECT: &str = "obj";

fn lookup(out: &mut CWriter, var: &str, field: &str) {
    out.line(format!(
        "const cJSON *{} = cJSON_GetObjectItemCaseSensitive({}, {});",
        var,
        OBJECT,
        json_key(field)
    ));
}

impl FieldEmitter for FromJsonEmitter {
    fn primitive(&self, out: &mut CWriter, site: &FieldSite<'_>, prim: Primitive) {
        out.open("{");
        lookup(out, "item", site.name);
        read_scalar(out, prim, "item", &member(TARGET, site.name));
        out.close("}");
    }

    fn enumeration(&self, out: &mut CWriter, site: &FieldSite<'_>, enum_name: &str) {
        out.open("{");
        lookup(out, "item", site.name);
        read_enum(out, enum_name, "item", &member(TARGET, site.name));
        out.close("}");
    }

    fn structure(&self, out: &mut CWriter, site: &FieldSite<'_>, struct_name: &str) {
        out.open("{");
        lookup(out, "item", site.name);
        out.open("if (cJSON_IsObject(item)) {");
        out.line(format!("{}_from_json(&{}, item);", struct_name, member(TARGET, site.name)));
        out.close("}");
        out.close("}");
    }

    /* Every input element consumes one slot; input past `count` is ignored */
    fn fixed_array(&self, out: &mut CWriter, site: &FieldSite<'_>, element: ArrayElement<'_>, count: u64) {
        let slot = indexed(&member(TARGET, site.name), "idx");

        out.open("{");
        lookup(out, "arr", site.name);
        out.open("if (cJSON_IsArray(arr)) {");
        out.line("size_t idx = 0;");
        out.line("const cJSON *el = NULL;");
        out.open("cJSON_ArrayForEach(el, arr) {");
        out.line(format!("if (idx >= {}) break;", count));
        match element {
            ArrayElement::Primitive(prim) => read_scalar(out, prim, "el", &slot),
            ArrayElement::Enum(name) => read_enum(out, name, "el", &slot),
            ArrayElement::Struct(name) => {
                out.open("if (cJSON_IsObject(el)) {");
                out.line(format!("{}_from_json(&{}, el);", name, slot));
                out.close("}");
            }
            ArrayElement::CharPointer => read_char_pointer(out, "el", &slot),
            ArrayElement::Unsupported(element_type) => out.line(unsupported_element_marker(element_type)),
        }
        out.line("++idx;");
        out.close("}");
        out.close("}");
        out.close("}");
    }

    /* Truncate to leave room for the terminator, which is always written */
    fn char_array(&self, out: &mut CWriter, site: &FieldSite<'_>, _count: u64) {
        let field = member(TARGET, site.name);
        out.open("{");
        lookup(out, "item", site.name);
        out.open("if (cJSON_IsString(item) && item->valuestring) {");
        out.line(format!("strncpy({}, item->valuestring, sizeof({}) - 1);", field, field));
        out.line(format!("{}[sizeof({}) - 1] = '\\0';", field, field));
        out.close("}");
        out.close("}");
    }

    fn char_pointer(&self, out: &mut CWriter, site: &FieldSite<'_>) {
        out.open("{");
        lookup(out, "item", site.name);
        read_char_pointer(out, "item", &member(TARGET, site.name));
        out.close("}");
    }

    fn unsupported(&self, out: &mut CWriter, _site: &FieldSite<'_>, declared_type: &str) {
        out.line(unsupported_field_marker(declared_type));
    }
}
