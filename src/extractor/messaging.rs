use crate::annotation_value;
use crate::extractor::{
    ClassContext, ConsumerDetails, EntryPoint, EntryPointDetails, EntryPointExtractor,
};
use crate::parameters::extract_parameters;
use log::debug;

/// A listener marker and the parameter holding what it listens on.
struct ListenerBinding {
    marker: &'static str,
    consumer_type: &'static str,
    destination_param: &'static str,
}

/// Checked in order; a method bound by an earlier marker is not checked for later ones.
const LISTENERS: &[ListenerBinding] = &[
    ListenerBinding {
        marker: "KafkaListener",
        consumer_type: "Kafka",
        destination_param: "topics",
    },
    ListenerBinding {
        marker: "JmsListener",
        consumer_type: "JMS",
        destination_param: "destination",
    },
    ListenerBinding {
        marker: "RabbitListener",
        consumer_type: "RabbitMQ",
        destination_param: "queues",
    },
];

/// Message consumer extractor
///
/// Claims generic component classes (`@Component`, `@Service`) and emits an entry point for
/// each listener method. Component classes without listener methods produce nothing.
pub struct MessageConsumerExtractor;

impl EntryPointExtractor for MessageConsumerExtractor {
    fn name(&self) -> &'static str {
        "message consumer"
    }

    fn matches(&self, class: &ClassContext) -> bool {
        class.has_marker("Component") || class.has_marker("Service")
    }

    fn extract(&self, class: &ClassContext) -> Vec<EntryPoint> {
        let mut entry_points = Vec::new();

        for method in &class.class.methods {
            let Some((binding, listener)) = LISTENERS
                .iter()
                .find_map(|b| method.annotation(b.marker).map(|ann| (b, ann)))
            else {
                continue;
            };

            let topics = annotation_value::resolve(listener, Some(binding.destination_param)).items();
            let group_id = if binding.consumer_type == "Kafka" {
                annotation_value::named_string(listener, "groupId")
            } else {
                None
            };

            debug!(
                "{}.{}: {} consumer on {:?}",
                class.class_name, method.name, binding.consumer_type, topics
            );

            let details = ConsumerDetails {
                consumer_type: binding.consumer_type.to_string(),
                topics,
                group_id,
                parameters: extract_parameters(&method.parameters),
            };
            entry_points.push(class.entry_point(
                &method.name,
                method.line,
                EntryPointDetails::MessageConsumer(details),
            ));
        }

        entry_points
    }
}
