//! Scene snapshot model — the input side of the engine.
//!
//! A snapshot is the captured state of an editor scene at the moment a query
//! begins: entities in a tree, each with attached behavior modules whose
//! fields and event containers were read out at capture time. The model is a
//! closed set of tagged types rather than open reflection, so everything a
//! behavior can reference is statically known.

use serde::{Deserialize, Serialize};

/// A captured scene: the entity trees under every scene root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub roots: Vec<SceneEntity>,
}

impl Snapshot {
    pub fn new(roots: Vec<SceneEntity>) -> Self {
        Self { roots }
    }

    /// Parse a snapshot from its JSON wire form.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// One entity in the snapshot tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneEntity {
    pub name: String,
    #[serde(default)]
    pub behaviors: Vec<BehaviorSnapshot>,
    #[serde(default)]
    pub children: Vec<SceneEntity>,
}

impl SceneEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behaviors: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: SceneEntity) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_behavior(mut self, behavior: BehaviorSnapshot) -> Self {
        self.behaviors.push(behavior);
        self
    }
}

/// The captured state of one behavior module attached to an entity.
///
/// Enumerates its own outgoing references and event bindings; the extractor
/// consumes these as-is and never looks inside referenced entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorSnapshot {
    pub type_name: String,
    #[serde(default)]
    pub fields: Vec<FieldSlot>,
    #[serde(default)]
    pub events: Vec<EventSlot>,
}

impl BehaviorSnapshot {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.push(FieldSlot {
            name: name.into(),
            value,
        });
        self
    }

    pub fn with_listener(
        mut self,
        event: impl Into<String>,
        target: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        let event = event.into();
        let binding = ListenerBinding {
            target: target.into(),
            method: method.into(),
        };
        if let Some(slot) = self.events.iter_mut().find(|s| s.event == event) {
            slot.listeners.push(binding);
        } else {
            self.events.push(EventSlot {
                event,
                listeners: vec![binding],
            });
        }
        self
    }
}

/// A named field on a behavior, as read at capture time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSlot {
    pub name: String,
    pub value: FieldValue,
}

/// The captured value of a behavior field.
///
/// Only reference-carrying shapes are modeled; scalar fields are simply not
/// captured. `Unreadable` marks a field whose getter failed during capture —
/// the extractor skips it and counts a warning instead of aborting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldValue {
    /// A null reference.
    Empty,
    /// A reference to another entity, by its hierarchical path.
    Entity { path: String },
    /// A reference to a non-entity asset, by its stable asset path.
    Asset { path: String },
    /// An array or list of references, expanded element-wise.
    List { items: Vec<FieldValue> },
    /// The field getter failed at capture time.
    Unreadable,
}

/// An event-listener container field with its persistent bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSlot {
    pub event: String,
    #[serde(default)]
    pub listeners: Vec<ListenerBinding>,
}

/// One persistent listener binding: target entity path + method name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerBinding {
    pub target: String,
    pub method: String,
}
