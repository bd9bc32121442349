use crate::extractor::{
    BatchDetails, ClassContext, EntryPoint, EntryPointDetails, EntryPointExtractor,
};
use crate::type_string::canonical;
use log::debug;

/// Spring Batch job extractor
///
/// Claims `@Configuration` classes that also carry `@EnableBatchProcessing`. A job is any
/// `@Bean` factory whose return type name contains `Job`; this is a naming heuristic, so a
/// `JobRepository` bean counts too.
pub struct BatchJobExtractor;

impl EntryPointExtractor for BatchJobExtractor {
    fn name(&self) -> &'static str {
        "batch configuration"
    }

    fn matches(&self, class: &ClassContext) -> bool {
        class.has_marker("Configuration") && class.has_marker("EnableBatchProcessing")
    }

    fn extract(&self, class: &ClassContext) -> Vec<EntryPoint> {
        class
            .class
            .methods
            .iter()
            .filter(|method| method.has_annotation("Bean"))
            .filter(|method| {
                method
                    .return_type
                    .as_ref()
                    .is_some_and(|ty| ty.base_name().contains("Job"))
            })
            .map(|method| {
                debug!("{}.{}: batch job", class.class_name, method.name);
                let details = BatchDetails {
                    job_type: "Spring Batch".to_string(),
                    description: format!("Batch job: {}", method.name),
                    return_type: canonical(method.return_type.as_ref()),
                };
                class.entry_point(&method.name, method.line, EntryPointDetails::BatchJob(details))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::AstParser;
    use std::path::Path;

    #[test]
    fn test_job_beans_only() {
        let unit = AstParser::parse_source(
            Path::new("BatchConfig.java"),
            r#"
            @Configuration
            @EnableBatchProcessing
            public class BatchConfig {
                @Bean
                public Job settlementJob(JobRepository repo) { return null; }

                @Bean
                public Step settlementStep() { return null; }

                public Job notABean() { return null; }
            }
        "#,
        )
        .unwrap();
        let class = ClassContext::new(&unit, &unit.types[0]);

        assert!(BatchJobExtractor.matches(&class));
        let jobs = BatchJobExtractor.extract(&class);

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].method_name, "settlementJob");
        match &jobs[0].details {
            EntryPointDetails::BatchJob(details) => {
                assert_eq!(details.job_type, "Spring Batch");
                assert_eq!(details.description, "Batch job: settlementJob");
                assert_eq!(details.return_type, "Job");
            }
            other => panic!("expected batch details, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_configuration_is_not_claimed() {
        let unit = AstParser::parse_source(
            Path::new("AppConfig.java"),
            "@Configuration class AppConfig { @Bean Job job() { return null; } }",
        )
        .unwrap();
        let class = ClassContext::new(&unit, &unit.types[0]);
        assert!(!BatchJobExtractor.matches(&class));
    }
}
