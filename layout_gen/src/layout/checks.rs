/* Layout sanity checks on extracted offsets and sizes (analyze command) */

use layout_types::StructDef;
use serde_derive::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LayoutWarning {
    /// Field ends past the declared struct size.
    FieldPastEnd { type_name: String, field: String, end: u64, struct_size: u64 },
    /// Field starts inside the previous field.
    Overlap { type_name: String, field: String, previous: String, offset: u64, previous_end: u64 },
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutWarning::FieldPastEnd { type_name, field, end, struct_size } => write!(
                f,
                "{}.{} ends at byte {} but the struct is {} bytes",
                type_name, field, end, struct_size
            ),
            LayoutWarning::Overlap { type_name, field, previous, offset, previous_end } => write!(
                f,
                "{}.{} starts at byte {} inside {} (ends at {})",
                type_name, field, offset, previous, previous_end
            ),
        }
    }
}

/// Only fields carrying both offset and size take part; bitfields report the
/// storage unit and will show up as overlaps.
pub fn check_struct_layout(type_name: &str, def: &StructDef) -> Vec<LayoutWarning> {
    let mut warnings = Vec::new();

    let mut placed: Vec<(&str, u64, u64)> = def
        .fields
        .iter()
        .filter_map(|f| match (f.offset, f.size) {
            (Some(offset), Some(size)) => Some((f.name.as_str(), offset, offset.saturating_add(size))),
            _ => None,
        })
        .collect();
    placed.sort_by_key(|&(_, offset, _)| offset);

    if let Some(struct_size) = def.size {
        for &(field, _, end) in &placed {
            if end > struct_size {
                warnings.push(LayoutWarning::FieldPastEnd {
                    type_name: type_name.to_string(),
                    field: field.to_string(),
                    end,
                    struct_size,
                });
            }
        }
    }

    for pair in placed.windows(2) {
        let (previous, _, previous_end) = pair[0];
        let (field, offset, _) = pair[1];
        if offset < previous_end {
            warnings.push(LayoutWarning::Overlap {
                type_name: type_name.to_string(),
                field: field.to_string(),
                previous: previous.to_string(),
                offset,
                previous_end,
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_types::FieldDef;

    fn field(name: &str, offset: u64, size: u64) -> FieldDef {
        FieldDef {
            name: name.to_string(),
            declared_type: "int".to_string(),
            offset: Some(offset),
            size: Some(size),
        }
    }

    #[test]
    fn test_clean_layout() {
        let def = StructDef { size: Some(8), fields: vec![field("x", 0, 4), field("y", 4, 4)] };
        assert!(check_struct_layout("Point", &def).is_empty());
    }

    #[test]
    fn test_past_end_and_overlap() {
        let def = StructDef { size: Some(8), fields: vec![field("x", 0, 4), field("y", 2, 8)] };
        let warnings = check_struct_layout("Point", &def);
        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[0], LayoutWarning::FieldPastEnd { end: 10, .. }));
        assert!(matches!(warnings[1], LayoutWarning::Overlap { offset: 2, previous_end: 4, .. }));
    }

    #[test]
    fn test_fields_without_layout_are_ignored() {
        let mut loose = field("z", 0, 4);
        loose.size = None;
        let def = StructDef { size: Some(4), fields: vec![field("x", 0, 4), loose] };
        assert!(check_struct_layout("S", &def).is_empty());
    }
}
