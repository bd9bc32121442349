use crate::ast::{TypeRef, WildcardBound};

/// Sentinel rendered for a missing (void) return type.
pub const VOID: &str = "void";

/// Renders a type reference as a canonical display string.
///
/// Qualified names collapse to their terminal segment, generic instantiations render as
/// `Outer<Inner1, Inner2>` with each argument resolved recursively, and array types get one
/// `[]` per dimension. An absent type renders as `"void"`.
pub fn canonical(type_ref: Option<&TypeRef>) -> String {
    match type_ref {
        Some(ty) => render(ty),
        None => VOID.to_string(),
    }
}

fn render(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Simple(name) => name.clone(),
        TypeRef::Qualified(parts) => parts
            .last()
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string()),
        TypeRef::Generic { base, args } => {
            let base = render(base);
            if args.is_empty() {
                // Diamond or raw use
                return base;
            }
            let args: Vec<String> = args.iter().map(render).collect();
            format!("{}<{}>", base, args.join(", "))
        }
        TypeRef::Array {
            element,
            dimensions,
        } => format!("{}{}", render(element), "[]".repeat(*dimensions)),
        TypeRef::Wildcard { bound } => match bound {
            None => "?".to_string(),
            Some((WildcardBound::Extends, inner)) => format!("? extends {}", render(inner)),
            Some((WildcardBound::Super, inner)) => format!("? super {}", render(inner)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qualified(path: &str) -> TypeRef {
        TypeRef::Qualified(path.split('.').map(String::from).collect())
    }

    #[test]
    fn test_simple_name_passes_through() {
        assert_eq!(canonical(Some(&TypeRef::simple("Order"))), "Order");
        assert_eq!(canonical(Some(&TypeRef::simple("int"))), "int");
    }

    #[test]
    fn test_qualified_name_collapses_to_terminal_segment() {
        assert_eq!(canonical(Some(&qualified("java.math.BigDecimal"))), "BigDecimal");
    }

    #[test]
    fn test_generic_arguments_resolve_recursively() {
        let ty = TypeRef::Generic {
            base: Box::new(TypeRef::simple("ResponseEntity")),
            args: vec![TypeRef::Generic {
                base: Box::new(TypeRef::simple("Map")),
                args: vec![
                    TypeRef::simple("String"),
                    TypeRef::Generic {
                        base: Box::new(qualified("java.util.List")),
                        args: vec![qualified("com.shop.Item")],
                    },
                ],
            }],
        };

        assert_eq!(
            canonical(Some(&ty)),
            "ResponseEntity<Map<String, List<Item>>>"
        );
    }

    #[test]
    fn test_absent_type_is_void() {
        assert_eq!(canonical(None), "void");
    }

    #[test]
    fn test_array_dimensions_append_brackets() {
        let ty = TypeRef::Array {
            element: Box::new(TypeRef::simple("byte")),
            dimensions: 2,
        };
        assert_eq!(canonical(Some(&ty)), "byte[][]");
    }

    #[test]
    fn test_wildcards() {
        let ty = TypeRef::Generic {
            base: Box::new(TypeRef::simple("List")),
            args: vec![TypeRef::Wildcard {
                bound: Some((WildcardBound::Extends, Box::new(TypeRef::simple("Number")))),
            }],
        };
        assert_eq!(canonical(Some(&ty)), "List<? extends Number>");
        assert_eq!(canonical(Some(&TypeRef::Wildcard { bound: None })), "?");
    }
}
