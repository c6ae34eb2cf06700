use super::helpers::CWriter;
use crate::layout::{Category, Primitive};

/// The field being emitted.
#[derive(Debug, Clone, Copy)]
pub struct FieldSite<'a> {
    pub name: &'a str,
    pub declared_type: &'a str,
}

/// Element of a fixed array. Only one array level is unwrapped, so an
/// element is never itself an array. `Unsupported` carries the canonical
/// element spelling for the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayElement<'a> {
    Primitive(Primitive),
    Enum(&'a str),
    Struct(&'a str),
    CharPointer,
    Unsupported(&'a str),
}

impl<'a> ArrayElement<'a> {
    pub fn from_category(category: &'a Category, element_type: &'a str) -> Self {
        match category {
            Category::Primitive(prim) => ArrayElement::Primitive(*prim),
            Category::Enum(name) => ArrayElement::Enum(name),
            Category::Struct(name) => ArrayElement::Struct(name),
            Category::CharPointer => ArrayElement::CharPointer,
            Category::FixedArray { .. } | Category::CharArray(_) | Category::Unsupported(_) => {
                ArrayElement::Unsupported(element_type)
            }
        }
    }
}

/// One operation (serialize, deserialize or compare) over every field
/// category. Implementations write the statements for a single field.
pub trait FieldEmitter {
    fn primitive(&self, out: &mut CWriter, site: &FieldSite<'_>, prim: Primitive);
    fn enumeration(&self, out: &mut CWriter, site: &FieldSite<'_>, enum_name: &str);
    fn structure(&self, out: &mut CWriter, site: &FieldSite<'_>, struct_name: &str);
    fn fixed_array(&self, out: &mut CWriter, site: &FieldSite<'_>, element: ArrayElement<'_>, count: u64);
    fn char_array(&self, out: &mut CWriter, site: &FieldSite<'_>, count: u64);
    fn char_pointer(&self, out: &mut CWriter, site: &FieldSite<'_>);
    fn unsupported(&self, out: &mut CWriter, site: &FieldSite<'_>, declared_type: &str);
}

pub fn emit_field<E: FieldEmitter + ?Sized>(
    emitter: &E,
    out: &mut CWriter,
    site: &FieldSite<'_>,
    category: &Category,
) {
    match category {
        Category::Primitive(prim) => emitter.primitive(out, site, *prim),
        Category::Enum(name) => emitter.enumeration(out, site, name),
        Category::Struct(name) => emitter.structure(out, site, name),
        Category::FixedArray { element, element_type, count } => {
            emitter.fixed_array(out, site, ArrayElement::from_category(element, element_type), *count)
        }
        Category::CharArray(count) => emitter.char_array(out, site, *count),
        Category::CharPointer => emitter.char_pointer(out, site),
        Category::Unsupported(declared) => emitter.unsupported(out, site, declared),
    }
}
