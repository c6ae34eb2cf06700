use super::registry::TypeRegistry;
use crate::error::GenError;

/// Ordered, duplicate-free list of structs that get public operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSet {
    names: Vec<String>,
}

impl RootSet {
    /// Resolve the requested roots against the registry.
    ///
    /// With no roots requested the sole struct of the registry is used;
    /// anything else is ambiguous. Duplicates keep their first position.
    pub fn resolve(requested: &[String], registry: &TypeRegistry) -> Result<Self, GenError> {
        if requested.is_empty() {
            let structs: Vec<String> = registry.struct_names().map(str::to_string).collect();
            if structs.len() == 1 {
                return Ok(Self { names: structs });
            }
            return Err(GenError::MissingRoot { structs });
        }

        let mut names: Vec<String> = Vec::with_capacity(requested.len());
        for root in requested {
            if names.contains(root) {
                continue;
            }
            match registry.get(root) {
                None => return Err(GenError::unknown_root(root, "is not present in the input types")),
                Some(def) if def.as_struct().is_none() => {
                    return Err(GenError::unknown_root(root, "is not a struct"));
                }
                Some(_) => names.push(root.clone()),
            }
        }

        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Caller-specified position of a root.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
