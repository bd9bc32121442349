use crate::ast::{MethodDeclaration, TypeDeclaration};
use crate::extractor::{
    ClassContext, CliDetails, EntryPoint, EntryPointDetails, EntryPointExtractor,
    MainApplicationDetails,
};
use log::debug;

const BOOTSTRAP_MARKER: &str = "SpringBootApplication";

/// Application bootstrap extractor
///
/// A `@SpringBootApplication` class contributes a single startup entry point named `main`,
/// whether or not the class declares the method itself.
pub struct MainApplicationExtractor;

impl EntryPointExtractor for MainApplicationExtractor {
    fn name(&self) -> &'static str {
        "application bootstrap"
    }

    fn matches(&self, class: &ClassContext) -> bool {
        class.has_marker(BOOTSTRAP_MARKER)
    }

    fn extract(&self, class: &ClassContext) -> Vec<EntryPoint> {
        debug!("{}: application bootstrap", class.class_name);

        let details = MainApplicationDetails {
            annotation: BOOTSTRAP_MARKER.to_string(),
            description: "Application startup entry point".to_string(),
        };
        vec![class.entry_point(
            "main",
            main_line(class.class),
            EntryPointDetails::MainApplication(details),
        )]
    }
}

/// Command-line entry extractor
///
/// Claims any remaining class that declares `public static main`.
pub struct CommandLineExtractor;

impl EntryPointExtractor for CommandLineExtractor {
    fn name(&self) -> &'static str {
        "command-line entry"
    }

    fn matches(&self, class: &ClassContext) -> bool {
        class.class.methods.iter().any(is_main)
    }

    fn extract(&self, class: &ClassContext) -> Vec<EntryPoint> {
        debug!("{}: command-line entry", class.class_name);

        let details = CliDetails {
            description: "Command-line interface entry point".to_string(),
        };
        vec![class.entry_point(
            "main",
            main_line(class.class),
            EntryPointDetails::Cli(details),
        )]
    }
}

fn is_main(method: &MethodDeclaration) -> bool {
    method.name == "main" && method.has_modifier("public") && method.has_modifier("static")
}

/// Line of the `main` method, or of the class when there is none.
fn main_line(class: &TypeDeclaration) -> usize {
    class
        .methods
        .iter()
        .find(|m| is_main(m))
        .map(|m| m.line)
        .unwrap_or(class.line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::EntryPointKind;
    use crate::parser::AstParser;
    use std::path::Path;

    #[test]
    fn test_spring_boot_application() {
        let unit = AstParser::parse_source(
            Path::new("ShopApplication.java"),
            r#"
            package com.shop;

            @SpringBootApplication
            public class ShopApplication {
                public static void main(String[] args) {
                    SpringApplication.run(ShopApplication.class, args);
                }
            }
        "#,
        )
        .unwrap();
        let class = ClassContext::new(&unit, &unit.types[0]);

        assert!(MainApplicationExtractor.matches(&class));
        let entry_points = MainApplicationExtractor.extract(&class);

        assert_eq!(entry_points.len(), 1);
        assert_eq!(entry_points[0].kind, EntryPointKind::MainApplication);
        assert_eq!(entry_points[0].class_name, "com.shop.ShopApplication");
        assert_eq!(entry_points[0].method_name, "main");
        assert_eq!(entry_points[0].line, 6);
    }

    #[test]
    fn test_public_static_main_only() {
        let unit = AstParser::parse_source(
            Path::new("Tools.java"),
            r#"
            class Migrate { public static void main(String... args) {} }
            class NotStatic { public void main(String[] args) {} }
            class NotPublic { static void main(String[] args) {} }
        "#,
        )
        .unwrap();

        let claimed: Vec<bool> = unit
            .types
            .iter()
            .map(|ty| CommandLineExtractor.matches(&ClassContext::new(&unit, ty)))
            .collect();
        assert_eq!(claimed, vec![true, false, false]);

        let entry_points = CommandLineExtractor.extract(&ClassContext::new(&unit, &unit.types[0]));
        assert_eq!(entry_points[0].kind, EntryPointKind::Cli);
        assert_eq!(entry_points[0].class_name, "Migrate");
    }
}
