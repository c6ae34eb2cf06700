use std::fmt;

/// Decorations (`*` or `[N]`) a declared type may carry. Deeper types stay
/// named and classify as unsupported.
pub const MAX_DECORATIONS: usize = 8;

/// Structure encoded in a declared-type string such as `float[5]` or `char *`.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum TypeExpr {
    Named(String),
    Array { element: Box<TypeExpr>, count: u64 },
    Pointer(Box<TypeExpr>),
}

#[derive(Debug, Clone, Copy)]
enum Decoration {
    Array(u64),
    Pointer,
}

impl TypeExpr {
    /// Parse a declared-type string.
    ///
    /// Decorations are peeled from the end of the text. A run of dimensions
    /// reads the way C declares it, so `int[2][3]` is two `int[3]`. Anything
    /// that does not form a well-formed suffix, or carries more than
    /// [`MAX_DECORATIONS`], is kept as a named type so that it classifies as
    /// unsupported downstream instead of failing the load.
    pub fn parse(text: &str) -> TypeExpr {
        let whole = text.trim();
        let as_named = || TypeExpr::Named(normalize_name(whole));

        /* Outermost first */
        let mut decorations: Vec<Decoration> = Vec::new();
        let mut rest = whole;

        loop {
            if rest.ends_with(']') {
                let mut dims: Vec<u64> = Vec::new();
                while let Some(inner) = rest.strip_suffix(']') {
                    let Some(open) = inner.rfind('[') else {
                        return as_named();
                    };
                    let count_text = inner[open + 1..].trim();
                    if !is_decimal(count_text) {
                        return as_named();
                    }
                    let Ok(count) = count_text.parse::<u64>() else {
                        return as_named();
                    };
                    dims.push(count);
                    rest = inner[..open].trim_end();
                    if decorations.len() + dims.len() > MAX_DECORATIONS {
                        return as_named();
                    }
                }
                if rest.is_empty() {
                    return as_named();
                }
                decorations.extend(dims.into_iter().rev().map(Decoration::Array));
            } else if let Some(inner) = rest.strip_suffix('*') {
                let inner = inner.trim_end();
                if inner.is_empty() || decorations.len() == MAX_DECORATIONS {
                    return as_named();
                }
                decorations.push(Decoration::Pointer);
                rest = inner;
            } else {
                break;
            }
        }

        decorations
            .into_iter()
            .rev()
            .fold(TypeExpr::Named(normalize_name(rest)), |inner, decoration| match decoration {
                Decoration::Array(count) => TypeExpr::Array { element: Box::new(inner), count },
                Decoration::Pointer => TypeExpr::Pointer(Box::new(inner)),
            })
    }

    pub fn is_named(&self, name: &str) -> bool {
        matches!(self, TypeExpr::Named(n) if n == name)
    }

    /// The type left after removing one level of array decoration.
    pub fn strip_array(&self) -> &TypeExpr {
        match self {
            TypeExpr::Array { element, .. } => element,
            other => other,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(name) => write!(f, "{}", name),
            TypeExpr::Array { .. } => {
                let mut dims = Vec::new();
                let mut base = self;
                while let TypeExpr::Array { element, count } = base {
                    dims.push(*count);
                    base = element;
                }
                write!(f, "{}", base)?;
                for count in dims {
                    write!(f, "[{}]", count)?;
                }
                Ok(())
            }
            TypeExpr::Pointer(inner) => write!(f, "{}*", inner),
        }
    }
}

fn is_decimal(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/* `unsigned   int` and `unsigned int` name the same type */
fn normalize_name(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> TypeExpr {
        TypeExpr::Named(name.to_string())
    }

    #[test]
    fn test_parse_plain_name() {
        assert_eq!(TypeExpr::parse("Point"), named("Point"));
        assert_eq!(TypeExpr::parse("  unsigned   int "), named("unsigned int"));
    }

    #[test]
    fn test_parse_array() {
        assert_eq!(
            TypeExpr::parse("float[5]"),
            TypeExpr::Array { element: Box::new(named("float")), count: 5 }
        );
        assert_eq!(
            TypeExpr::parse("Point [ 4 ]"),
            TypeExpr::Array { element: Box::new(named("Point")), count: 4 }
        );
    }

    #[test]
    fn test_parse_pointer_is_whitespace_insensitive() {
        let expected = TypeExpr::Pointer(Box::new(named("char")));
        assert_eq!(TypeExpr::parse("char*"), expected);
        assert_eq!(TypeExpr::parse("char *"), expected);
        assert_eq!(TypeExpr::parse(" char  * "), expected);
    }

    #[test]
    fn test_leading_dimension_is_outermost() {
        let parsed = TypeExpr::parse("int[2][3]");
        match &parsed {
            TypeExpr::Array { element, count } => {
                assert_eq!(*count, 2);
                assert_eq!(
                    **element,
                    TypeExpr::Array { element: Box::new(named("int")), count: 3 }
                );
            }
            other => panic!("expected array, got {:?}", other),
        }
        assert_eq!(parsed.strip_array().to_string(), "int[3]");
        assert_eq!(TypeExpr::parse("char * [4]").strip_array().to_string(), "char*");
    }

    #[test]
    fn test_deep_decoration_stays_named() {
        let deep = format!("int{}", "*".repeat(200_000));
        assert!(matches!(TypeExpr::parse(&deep), TypeExpr::Named(_)));

        let arrays = format!("int{}", "[1]".repeat(100_000));
        assert!(matches!(TypeExpr::parse(&arrays), TypeExpr::Named(_)));

        let limit = format!("int{}", "*".repeat(MAX_DECORATIONS));
        assert_eq!(TypeExpr::parse(&limit).to_string(), limit);
    }

    #[test]
    fn test_malformed_suffix_stays_named() {
        assert_eq!(TypeExpr::parse("float[x]"), named("float[x]"));
        assert_eq!(TypeExpr::parse("float[-1]"), named("float[-1]"));
        assert_eq!(TypeExpr::parse("[3]"), named("[3]"));
        assert_eq!(TypeExpr::parse("*"), named("*"));
    }

    #[test]
    fn test_display_round_trips_canonical_form() {
        assert_eq!(TypeExpr::parse("char *").to_string(), "char*");
        assert_eq!(TypeExpr::parse("double [ 2 ]").to_string(), "double[2]");
        assert_eq!(TypeExpr::parse("int [2] [3]").to_string(), "int[2][3]");
        assert_eq!(TypeExpr::parse("int[3]*[2]").to_string(), "int[3]*[2]");
    }
}
