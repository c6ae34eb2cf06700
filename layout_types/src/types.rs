use indexmap::IndexMap;
use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct EnumValue {
    pub name: String,
    pub value: i64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct StructDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct EnumDef {
    #[serde(default = "default_underlying")]
    pub underlying: String,
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

fn default_underlying() -> String {
    "int".to_string()
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum TypeDefKind {
    Struct,
    Enum,
}

/// A type definition exactly as it appears in a document. `kind` may be
/// omitted, in which case the entry is a struct.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct RawTypeDef {
    #[serde(default)]
    pub kind: Option<TypeDefKind>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub underlying: Option<String>,
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(tag = "kind", rename_all = "kebab-case")]
#[serde(try_from = "RawTypeDef")]
pub enum TypeDef {
    Struct(StructDef),
    Enum(EnumDef),
}

impl TypeDef {
    pub fn kind(&self) -> TypeDefKind {
        match self {
            TypeDef::Struct(_) => TypeDefKind::Struct,
            TypeDef::Enum(_) => TypeDefKind::Enum,
        }
    }

    pub fn as_struct(&self) -> Option<&StructDef> {
        match self {
            TypeDef::Struct(def) => Some(def),
            TypeDef::Enum(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumDef> {
        match self {
            TypeDef::Enum(def) => Some(def),
            TypeDef::Struct(_) => None,
        }
    }
}

impl TryFrom<RawTypeDef> for TypeDef {
    type Error = DocumentError;

    fn try_from(raw: RawTypeDef) -> Result<Self, Self::Error> {
        match raw.kind.unwrap_or(TypeDefKind::Struct) {
            TypeDefKind::Struct => {
                for field in &raw.fields {
                    field.validate()?;
                }
                Ok(TypeDef::Struct(StructDef { size: raw.size, fields: raw.fields }))
            }
            TypeDefKind::Enum => {
                let underlying = raw.underlying.unwrap_or_else(default_underlying);
                if underlying.trim().is_empty() {
                    return Err(DocumentError::EmptyUnderlying);
                }
                for value in &raw.values {
                    if !is_c_identifier(&value.name) {
                        return Err(DocumentError::InvalidIdentifier(value.name.clone()));
                    }
                }
                Ok(TypeDef::Enum(EnumDef { underlying, values: raw.values }))
            }
        }
    }
}

impl FieldDef {
    fn validate(&self) -> Result<(), DocumentError> {
        if !is_c_identifier(&self.name) {
            return Err(DocumentError::InvalidIdentifier(self.name.clone()));
        }
        if self.declared_type.trim().is_empty() {
            return Err(DocumentError::EmptyFieldType(self.name.clone()));
        }
        Ok(())
    }
}

/* ============================================================================
   Document shapes
   ============================================================================ */

/// `{"types": {"Point": {...}, "Color": {...}}}`
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct MultiTypeDocument {
    pub types: IndexMap<String, TypeDef>,
}

/// `{"struct": "Point", "size": 8, "fields": [...]}`
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct SingleStructDocument {
    #[serde(rename = "struct")]
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaDocument {
    Multi(MultiTypeDocument),
    Single(SingleStructDocument),
}

impl SchemaDocument {
    /// Check every type name and field of the document.
    pub fn validate(&self) -> Result<(), DocumentError> {
        match self {
            SchemaDocument::Multi(doc) => {
                for name in doc.types.keys() {
                    if !is_c_identifier(name) {
                        return Err(DocumentError::InvalidIdentifier(name.clone()));
                    }
                }
                Ok(())
            }
            SchemaDocument::Single(doc) => {
                if !is_c_identifier(&doc.name) {
                    return Err(DocumentError::InvalidIdentifier(doc.name.clone()));
                }
                for field in &doc.fields {
                    field.validate()?;
                }
                Ok(())
            }
        }
    }

    /// Flatten into `(name, definition)` pairs in document order.
    pub fn into_entries(self) -> Vec<(String, TypeDef)> {
        match self {
            SchemaDocument::Multi(doc) => doc.types.into_iter().collect(),
            SchemaDocument::Single(doc) => vec![(
                doc.name,
                TypeDef::Struct(StructDef { size: doc.size, fields: doc.fields }),
            )],
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("'{0}' is not a valid C identifier")]
    InvalidIdentifier(String),
    #[error("field '{0}' has an empty type")]
    EmptyFieldType(String),
    #[error("enum underlying type must not be empty")]
    EmptyUnderlying,
}

/// Names are emitted verbatim into generated C, so they must be identifiers.
pub fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_defaults_to_struct() {
        let def: TypeDef = serde_json::from_str(
            r#"{"size": 8, "fields": [{"name": "x", "type": "float", "offset": 0}]}"#,
        )
        .unwrap();
        let def = def.as_struct().unwrap();
        assert_eq!(def.size, Some(8));
        assert_eq!(def.fields[0].offset, Some(0));
        assert_eq!(def.fields[0].size, None);
    }

    #[test]
    fn test_enum_definition() {
        let def: TypeDef = serde_json::from_str(
            r#"{"kind": "enum", "values": [{"name": "COLOR_RED", "value": 0}]}"#,
        )
        .unwrap();
        let def = def.as_enum().unwrap();
        assert_eq!(def.underlying, "int");
        assert_eq!(def.values.len(), 1);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<TypeDef, _> = serde_json::from_str(r#"{"kind": "union"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_field_name_is_rejected() {
        let result: Result<TypeDef, _> =
            serde_json::from_str(r#"{"fields": [{"name": "<anon>", "type": "int"}]}"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("not a valid C identifier"), "{}", err);
    }

    #[test]
    fn test_multi_document_keeps_order() {
        let doc: MultiTypeDocument = serde_json::from_str(
            r#"{"types": {"Zeta": {"fields": []}, "Alpha": {"fields": []}}}"#,
        )
        .unwrap();
        let names: Vec<_> = SchemaDocument::Multi(doc)
            .into_entries()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_single_document_validation() {
        let doc: SingleStructDocument =
            serde_json::from_str(r#"{"struct": "my struct", "fields": []}"#).unwrap();
        assert_eq!(
            SchemaDocument::Single(doc).validate(),
            Err(DocumentError::InvalidIdentifier("my struct".to_string()))
        );
    }

    #[test]
    fn test_identifier_rules() {
        assert!(is_c_identifier("myTestStruct"));
        assert!(is_c_identifier("_private1"));
        assert!(!is_c_identifier("1abc"));
        assert!(!is_c_identifier(""));
        assert!(!is_c_identifier("a-b"));
    }
}
