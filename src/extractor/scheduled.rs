use crate::annotation_value;
use crate::extractor::{
    ClassContext, EntryPoint, EntryPointDetails, EntryPointExtractor, ScheduledDetails,
};
use log::debug;

/// Rendered when a scheduling marker declares no parameters.
pub const UNKNOWN_SCHEDULE: &str = "Unknown schedule";

/// Scheduled task extractor
///
/// Runs on any class with at least one `@Scheduled` method, regardless of how the class was
/// otherwise classified.
pub struct ScheduledTaskExtractor;

impl EntryPointExtractor for ScheduledTaskExtractor {
    fn name(&self) -> &'static str {
        "scheduled tasks"
    }

    fn matches(&self, class: &ClassContext) -> bool {
        class
            .class
            .methods
            .iter()
            .any(|method| method.has_annotation("Scheduled"))
    }

    fn extract(&self, class: &ClassContext) -> Vec<EntryPoint> {
        let mut entry_points = Vec::new();

        for method in &class.class.methods {
            let Some(scheduled) = method.annotation("Scheduled") else {
                continue;
            };

            let schedule = annotation_value::describe_pairs(scheduled)
                .unwrap_or_else(|| UNKNOWN_SCHEDULE.to_string());
            debug!("{}.{}: scheduled ({})", class.class_name, method.name, schedule);

            let details = ScheduledDetails {
                schedule,
                description: format!("Scheduled task: {}", method.name),
            };
            entry_points.push(class.entry_point(
                &method.name,
                method.line,
                EntryPointDetails::ScheduledTask(details),
            ));
        }

        entry_points
    }
}
