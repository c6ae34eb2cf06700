use super::file::load_document;
use crate::error::GenError;
use indexmap::IndexMap;
use layout_types::{EnumDef, SchemaDocument, StructDef, TypeDef};
use std::path::PathBuf;
use tracing::debug;

/// Ordered mapping of type name to definition, merged from every input
/// document. Later documents replace same-named entries; the entry keeps the
/// position of its first insertion.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TypeRegistry {
    types: IndexMap<String, TypeDef>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self { types: IndexMap::new() }
    }

    /// Read and merge every document before returning. Nothing downstream
    /// runs on a partially loaded registry.
    pub fn load_files(paths: &[PathBuf]) -> Result<Self, GenError> {
        if paths.is_empty() {
            return Err(GenError::EmptyInput);
        }

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            debug!(path = %path.display(), "loading schema document");
            documents.push(load_document(path)?);
        }

        Ok(Self::from_documents(documents))
    }

    pub fn from_documents(documents: impl IntoIterator<Item = SchemaDocument>) -> Self {
        let mut registry = Self::new();
        for document in documents {
            registry.merge_document(document);
        }
        registry
    }

    pub fn merge_document(&mut self, document: SchemaDocument) {
        for (name, typedef) in document.into_entries() {
            self.insert(name, typedef);
        }
    }

    /// Insert or replace a definition, returning the replaced one.
    pub fn insert(&mut self, name: String, typedef: TypeDef) -> Option<TypeDef> {
        let previous = self.types.insert(name.clone(), typedef);
        if previous.is_some() {
            debug!(type_name = %name, "later document overrides earlier definition");
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn get_struct(&self, name: &str) -> Option<&StructDef> {
        self.types.get(name).and_then(TypeDef::as_struct)
    }

    pub fn get_enum(&self, name: &str) -> Option<&EnumDef> {
        self.types.get(name).and_then(TypeDef::as_enum)
    }

    pub fn is_struct(&self, name: &str) -> bool {
        self.get_struct(name).is_some()
    }

    pub fn is_enum(&self, name: &str) -> bool {
        self.get_enum(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeDef)> {
        self.types.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Struct names in registry order.
    pub fn struct_names(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, def)| def.as_struct().is_some()).map(|(name, _)| name)
    }

    pub fn structs(&self) -> impl Iterator<Item = (&str, &StructDef)> {
        self.iter().filter_map(|(name, def)| def.as_struct().map(|s| (name, s)))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
