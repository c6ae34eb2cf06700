use super::emitter::{ArrayElement, FieldEmitter, FieldSite};
use super::helpers::{
    create_scalar_node, indexed, json_key, member, unsupported_element_marker, unsupported_field_marker, CWriter,
};
use crate::layout::{Primitive, PrimitiveClass};

/* Serializer: `s` is the source struct, `obj` the target object */
pub struct ToJsonEmitter;

const SOURCE: &str = "s";
const OBJECT: &str = "obj";

impl FieldEmitter for ToJsonEmitter {
    fn primitive(&self, out: &mut CWriter, site: &FieldSite<'_>, prim: Primitive) {
        let value = member(SOURCE, site.name);
        match prim.class() {
            PrimitiveClass::Bool => {
                out.line(format!("cJSON_AddBoolToObject({}, {}, {} ? 1 : 0);", OBJECT, json_key(site.name), value))
            }
            _ => out.line(format!("cJSON_AddNumberToObject({}, {}, (double){});", OBJECT, json_key(site.name), value)),
        }
    }

    fn enumeration(&self, out: &mut CWriter, site: &FieldSite<'_>, _enum_name: &str) {
        out.line(format!(
            "cJSON_AddNumberToObject({}, {}, (double){});",
            OBJECT,
            json_key(site.name),
            member(SOURCE, site.name)
        ));
    }

    fn structure(&self, out: &mut CWriter, site: &FieldSite<'_>, struct_name: &str) {
        out.open("{");
        out.line("cJSON *child = cJSON_CreateObject();");
        out.line(format!("{}_to_json(&{}, child);", struct_name, member(SOURCE, site.name)));
        out.line(format!("cJSON_AddItemToObject({}, {}, child);", OBJECT, json_key(site.name)));
        out.close("}");
    }

    fn fixed_array(&self, out: &mut CWriter, site: &FieldSite<'_>, element: ArrayElement<'_>, count: u64) {
        let slot = indexed(&member(SOURCE, site.name), "i");

        out.open("{");
        out.line("cJSON *arr = cJSON_CreateArray();");
        out.open(format!("for (size_t i = 0; i < {}; ++i) {{", count));
        match element {
            ArrayElement::Primitive(prim) => {
                out.line(format!("cJSON_AddItemToArray(arr, {});", create_scalar_node(prim, &slot)));
            }
            ArrayElement::Enum(_) => {
                out.line(format!("cJSON_AddItemToArray(arr, cJSON_CreateNumber((double){}));", slot));
            }
            ArrayElement::Struct(name) => {
                out.line("cJSON *child = cJSON_CreateObject();");
                out.line(format!("{}_to_json(&{}, child);", name, slot));
                out.line("cJSON_AddItemToArray(arr, child);");
            }
            ArrayElement::CharPointer => {
                out.line(format!("cJSON_AddItemToArray(arr, cJSON_CreateString({} ? {} : \"\"));", slot, slot));
            }
            ArrayElement::Unsupported(element_type) => out.line(unsupported_element_marker(element_type)),
        }
        out.close("}");
        out.line(format!("cJSON_AddItemToObject({}, {}, arr);", OBJECT, json_key(site.name)));
        out.close("}");
    }

    /* The buffer may be unterminated; copy it into a scratch one that is */
    fn char_array(&self, out: &mut CWriter, site: &FieldSite<'_>, _count: u64) {
        let field = member(SOURCE, site.name);
        out.open("{");
        out.line(format!("char text[sizeof({}) + 1];", field));
        out.line(format!("memcpy(text, {}, sizeof({}));", field, field));
        out.line(format!("text[sizeof({})] = '\\0';", field));
        out.line(format!("cJSON_AddStringToObject({}, {}, text);", OBJECT, json_key(site.name)));
        out.close("}");
    }

    fn char_pointer(&self, out: &mut CWriter, site: &FieldSite<'_>) {
        let field = member(SOURCE, site.name);
        out.line(format!(
            "cJSON_AddStringToObject({}, {}, {} ? {} : \"\");",
            OBJECT,
            json_key(site.name),
            field,
            field
        ));
    }

    fn unsupported(&self, out: &mut CWriter, _site: &FieldSite<'_>, declared_type: &str) {
        out.line(unsupported_field_marker(declared_type));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::c_gen::emitter::emit_field;
    use crate::layout::Category;

    fn emit(name: &str, declared_type: &str, category: Category) -> String {
        let mut out = CWriter::new();
        let site = FieldSite { name, declared_type };
        emit_field(&ToJsonEmitter, &mut out, &site, &category);
        out.finish()
    }

    #[test]
    fn test_numbers_are_widened_to_double() {
        assert_eq!(
            emit("x", "float", Category::Primitive(Primitive::Float)),
            "cJSON_AddNumberToObject(obj, \"x\", (double)s->x);\n"
        );
        assert_eq!(
            emit("ok", "bool", Category::Primitive(Primitive::Bool)),
            "cJSON_AddBoolToObject(obj, \"ok\", s->ok ? 1 : 0);\n"
        );
    }

    #[test]
    fn test_char_array_uses_terminated_scratch_buffer() {
        let text = emit("name", "char[16]", Category::CharArray(16));
        assert!(text.contains("char text[sizeof(s->name) + 1];"));
        assert!(text.contains("text[sizeof(s->name)] = '\\0';"));
        assert!(text.contains("cJSON_AddStringToObject(obj, \"name\", text);"));
    }

    #[test]
    fn test_array_of_unsupported_elements_keeps_marker_in_loop() {
        let category = Category::FixedArray {
            element: Box::new(Category::Unsupported("Blob".to_string())),
            element_type: "Blob".to_string(),
            count: 3,
        };
        let text = emit("blobs", "Blob[3]", category);
        assert!(text.contains("for (size_t i = 0; i < 3; ++i) {\n        /* Unsupported array element type: Blob */"));
        assert!(text.contains("cJSON_AddItemToObject(obj, \"blobs\", arr);"));
    }
}
