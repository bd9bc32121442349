use crate::extractor::batch::BatchJobExtractor;
use crate::extractor::bootstrap::{CommandLineExtractor, MainApplicationExtractor};
use crate::extractor::jaxrs::JaxRsExtractor;
use crate::extractor::messaging::MessageConsumerExtractor;
use crate::extractor::scheduled::ScheduledTaskExtractor;
use crate::extractor::spring_mvc::SpringMvcExtractor;
use crate::extractor::{ClassContext, EntryPoint, EntryPointExtractor};
use log::debug;

/// Picks the extractors that run for a class.
///
/// Primary extractors are consulted in priority order and only the first one that claims the
/// class runs. A class carrying `@RestController` and `@Component` is therefore a controller
/// only, and a `@Service` that is also a batch configuration is a message consumer only.
/// Secondary extractors (scheduled tasks) are consulted for every class, in addition to the
/// primary one.
pub struct EntryPointClassifier {
    primary: Vec<Box<dyn EntryPointExtractor>>,
    secondary: Vec<Box<dyn EntryPointExtractor>>,
}

impl Default for EntryPointClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryPointClassifier {
    /// Creates a classifier with the standard priority order:
    /// controller, path resource, bootstrap, component, batch configuration, command line.
    pub fn new() -> Self {
        Self {
            primary: vec![
                Box::new(SpringMvcExtractor),
                Box::new(JaxRsExtractor),
                Box::new(MainApplicationExtractor),
                Box::new(MessageConsumerExtractor),
                Box::new(BatchJobExtractor),
                Box::new(CommandLineExtractor),
            ],
            secondary: vec![Box::new(ScheduledTaskExtractor)],
        }
    }

    /// Creates a classifier from explicit extractor lists.
    pub fn with_extractors(
        primary: Vec<Box<dyn EntryPointExtractor>>,
        secondary: Vec<Box<dyn EntryPointExtractor>>,
    ) -> Self {
        Self { primary, secondary }
    }

    /// Name of the primary extractor that claims the class, if any.
    pub fn primary_category(&self, class: &ClassContext) -> Option<&'static str> {
        self.primary
            .iter()
            .find(|extractor| extractor.matches(class))
            .map(|extractor| extractor.name())
    }

    /// Runs the primary extractor that claims the class, then every matching secondary one.
    pub fn classify(&self, class: &ClassContext) -> Vec<EntryPoint> {
        let mut entry_points = Vec::new();

        if let Some(extractor) = self.primary.iter().find(|e| e.matches(class)) {
            debug!("{} classified as {}", class.class_name, extractor.name());
            entry_points.extend(extractor.extract(class));
        }

        for extractor in self.secondary.iter().filter(|e| e.matches(class)) {
            debug!("{} also has {}", class.class_name, extractor.name());
            entry_points.extend(extractor.extract(class));
        }

        entry_points
    }
}
