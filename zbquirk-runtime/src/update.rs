//! Updates emitted to the hub

use zbquirk_model::{AttributeId, AttributeValue, ClusterId, EndpointId};

use crate::events::SemanticEvent;

/// A standardized attribute update
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeUpdate {
    pub endpoint: EndpointId,
    pub cluster: ClusterId,
    pub attribute: AttributeId,
    /// Standardized name, when the owning cluster implementation has one
    pub name: Option<&'static str>,
    pub value: AttributeValue,
}

/// Everything a device session emits toward the hub
#[derive(Debug, Clone, PartialEq)]
pub enum HubUpdate {
    /// A normalized attribute value
    Attribute(AttributeUpdate),
    /// A semantic event for the automation-trigger system
    Event(SemanticEvent),
}

impl HubUpdate {
    pub fn as_attribute(&self) -> Option<&AttributeUpdate> {
        match self {
            HubUpdate::Attribute(update) => Some(update),
            HubUpdate::Event(_) => None,
        }
    }

    pub fn as_event(&self) -> Option<&SemanticEvent> {
        match self {
            HubUpdate::Event(event) => Some(event),
            HubUpdate::Attribute(_) => None,
        }
    }
}
