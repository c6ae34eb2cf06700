use super::registry::TypeRegistry;
use layout_types::TypeExpr;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

/// The character primitive. `char[N]` is a text buffer and `char*` a
/// nullable string rather than an array or pointer of integers.
pub const CHAR_PRIMITIVE: &str = "char";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Char,
    SignedChar,
    UnsignedChar,
    WChar,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    LongLong,
    UnsignedLongLong,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Double,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveClass {
    Integer,
    Float,
    Double,
    Bool,
}

impl Primitive {
    pub fn from_keyword(name: &str) -> Option<Primitive> {
        let prim = match name {
            "char" => Primitive::Char,
            "signed char" => Primitive::SignedChar,
            "unsigned char" => Primitive::UnsignedChar,
            "wchar_t" => Primitive::WChar,
            "short" | "short int" => Primitive::Short,
            "unsigned short" | "unsigned short int" => Primitive::UnsignedShort,
            "int" | "signed int" => Primitive::Int,
            "unsigned int" | "unsigned" => Primitive::UnsignedInt,
            "long" | "long int" => Primitive::Long,
            "unsigned long" | "unsigned long int" => Primitive::UnsignedLong,
            "long long" | "long long int" => Primitive::LongLong,
            "unsigned long long" | "unsigned long long int" => Primitive::UnsignedLongLong,
            "int8_t" => Primitive::Int8,
            "int16_t" => Primitive::Int16,
            "int32_t" => Primitive::Int32,
            "int64_t" => Primitive::Int64,
            "uint8_t" => Primitive::Uint8,
            "uint16_t" => Primitive::Uint16,
            "uint32_t" => Primitive::Uint32,
            "uint64_t" => Primitive::Uint64,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            "bool" | "_Bool" => Primitive::Bool,
            _ => return None,
        };
        Some(prim)
    }

    pub fn class(self) -> PrimitiveClass {
        match self {
            Primitive::Float => PrimitiveClass::Float,
            Primitive::Double => PrimitiveClass::Double,
            Primitive::Bool => PrimitiveClass::Bool,
            _ => PrimitiveClass::Integer,
        }
    }

    /// C spelling used for narrowing casts.
    pub fn c_type(self) -> &'static str {
        match self {
            Primitive::Char => "char",
            Primitive::SignedChar => "signed char",
            Primitive::UnsignedChar => "unsigned char",
            Primitive::WChar => "wchar_t",
            Primitive::Short => "short",
            Primitive::UnsignedShort => "unsigned short",
            Primitive::Int => "int",
            Primitive::UnsignedInt => "unsigned int",
            Primitive::Long => "long",
            Primitive::UnsignedLong => "unsigned long",
            Primitive::LongLong => "long long",
            Primitive::UnsignedLongLong => "unsigned long long",
            Primitive::Int8 => "int8_t",
            Primitive::Int16 => "int16_t",
            Primitive::Int32 => "int32_t",
            Primitive::Int64 => "int64_t",
            Primitive::Uint8 => "uint8_t",
            Primitive::Uint16 => "uint16_t",
            Primitive::Uint32 => "uint32_t",
            Primitive::Uint64 => "uint64_t",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Bool => "bool",
        }
    }
}

/// Structural category of a declared field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Primitive(Primitive),
    Enum(String),
    Struct(String),
    /// `element_type` is the canonical element spelling, e.g. `int[3]` for `int[2][3]`.
    FixedArray { element: Box<Category>, element_type: String, count: u64 },
    CharArray(u64),
    CharPointer,
    /// Carries the canonical declared type for diagnostics.
    Unsupported(String),
}

impl Category {
    /// Struct referenced by value, directly or as an array element.
    pub fn struct_dependency(&self) -> Option<&str> {
        match self {
            Category::Struct(name) => Some(name),
            Category::FixedArray { element, .. } => match element.as_ref() {
                Category::Struct(name) => Some(name),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Primitive(prim) => write!(f, "primitive({})", prim.c_type()),
            Category::Enum(name) => write!(f, "enum({})", name),
            Category::Struct(name) => write!(f, "struct({})", name),
            Category::FixedArray { element, count, .. } => write!(f, "array({}, {})", element, count),
            Category::CharArray(count) => write!(f, "char-buffer({})", count),
            Category::CharPointer => write!(f, "char-pointer"),
            Category::Unsupported(declared) => write!(f, "unsupported({})", declared),
        }
    }
}

/// Classify a parsed type expression against the registry.
pub fn classify_expr(expr: &TypeExpr, registry: &TypeRegistry) -> Category {
    match expr {
        TypeExpr::Array { element, count } => {
            if *count == 0 {
                return Category::Unsupported(expr.to_string());
            }
            if element.is_named(CHAR_PRIMITIVE) {
                return Category::CharArray(*count);
            }
            Category::FixedArray {
                element: Box::new(classify_expr(element, registry)),
                element_type: element.to_string(),
                count: *count,
            }
        }
        TypeExpr::Pointer(inner) => {
            if inner.is_named(CHAR_PRIMITIVE) {
                Category::CharPointer
            } else {
                Category::Unsupported(expr.to_string())
            }
        }
        TypeExpr::Named(name) => {
            if let Some(prim) = Primitive::from_keyword(name) {
                Category::Primitive(prim)
            } else if registry.is_enum(name) {
                Category::Enum(name.clone())
            } else if registry.is_struct(name) {
                Category::Struct(name.clone())
            } else {
                Category::Unsupported(name.clone())
            }
        }
    }
}

/// Memoizing classifier. Every component of a run asks the same instance,
/// so a declared-type string is parsed and classified exactly once.
#[derive(Debug)]
pub struct Classifier<'r> {
    registry: &'r TypeRegistry,
    memo: RefCell<HashMap<String, Category>>,
}

impl<'r> Classifier<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry, memo: RefCell::new(HashMap::new()) }
    }

    pub fn classify(&self, declared_type: &str) -> Category {
        if let Some(category) = self.memo.borrow().get(declared_type) {
            return category.clone();
        }
        let category = classify_expr(&TypeExpr::parse(declared_type), self.registry);
        self.memo.borrow_mut().insert(declared_type.to_string(), category.clone());
        category
    }

    pub fn cached_len(&self) -> usize {
        self.memo.borrow().len()
    }
}
