//! Typed wrappers over the host's dynamic property store.
//!
//! The engine only persists numbers, booleans, and strings. A
//! [`DynamicProperty`] pairs one property identifier with a Rust type and a
//! declared root shape, serializing composites through JSON so callers
//! always read and write `T`.

use rankchat_host::{Actor, HostError, PropertyValue, World};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::marker::PhantomData;
use thiserror::Error;
use tracing::warn;

/// The persisted shape of a property: one of the engine's primitive slots,
/// or `Object` for anything serialized to a JSON string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootType {
    Number,
    Boolean,
    String,
    Object,
}

#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("property \"{identifier}\" is not registered as world dynamic")]
    NotWorldDynamic { identifier: String },
    #[error("property \"{identifier}\" is not registered for entity type \"{type_id}\"")]
    UnregisteredEntityType { identifier: String, type_id: String },
    #[error("property \"{identifier}\" does not hold a {expected:?}")]
    ShapeMismatch { identifier: String, expected: RootType },
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Host(#[from] HostError),
}

pub type PropertyResult<T> = Result<T, PropertyError>;

/// One dynamic property slot, typed at the call site.
///
/// Scope is declared up front: [`world_dynamic`](Self::world_dynamic)
/// allows world-level access, and each [`entity_type`](Self::entity_type)
/// allows per-actor access for that engine type id. Writes against an
/// undeclared scope fail instead of silently landing in the wrong slot.
pub struct DynamicProperty<T> {
    identifier: String,
    root_type: RootType,
    world_dynamic: bool,
    entity_types: Vec<String>,
    _value: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> DynamicProperty<T> {
    pub fn new(identifier: impl Into<String>, root_type: RootType) -> DynamicProperty<T> {
        DynamicProperty {
            identifier: identifier.into(),
            root_type,
            world_dynamic: false,
            entity_types: Vec::new(),
            _value: PhantomData,
        }
    }

    pub fn world_dynamic(mut self) -> Self {
        self.world_dynamic = true;
        self
    }

    pub fn register_entity_types(mut self, type_ids: &[&str]) -> Self {
        self.entity_types
            .extend(type_ids.iter().map(|t| t.to_string()));
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Reads the world slot. Absent, malformed, or mis-scoped values come
    /// back as `None`; readers treat all three as "not set yet".
    pub fn get(&self, world: &dyn World) -> Option<T> {
        if !self.world_dynamic {
            warn!(identifier = %self.identifier, "read of a non-world-dynamic property");
            return None;
        }
        let raw = world.get_property(&self.identifier)?;
        match self.uncompile(raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(identifier = %self.identifier, "stored value is unreadable: {err}");
                None
            }
        }
    }

    pub fn set(&self, world: &dyn World, value: &T) -> PropertyResult<()> {
        if !self.world_dynamic {
            return Err(PropertyError::NotWorldDynamic {
                identifier: self.identifier.clone(),
            });
        }
        let raw = self.compile(value)?;
        world.set_property(&self.identifier, Some(raw))?;
        Ok(())
    }

    /// Clears the world slot. Removing an absent property is a no-op.
    pub fn remove(&self, world: &dyn World) -> PropertyResult<()> {
        if !self.world_dynamic {
            return Err(PropertyError::NotWorldDynamic {
                identifier: self.identifier.clone(),
            });
        }
        world.set_property(&self.identifier, None)?;
        Ok(())
    }

    /// Reads this property off one actor. Same leniency as [`get`](Self::get).
    pub fn get_entity(&self, actor: &dyn Actor) -> Option<T> {
        if !self.allows_entity(actor) {
            warn!(
                identifier = %self.identifier,
                type_id = %actor.type_id(),
                "read of a property off an unregistered entity type"
            );
            return None;
        }
        let raw = actor.get_property(&self.identifier)?;
        match self.uncompile(raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(identifier = %self.identifier, "stored value is unreadable: {err}");
                None
            }
        }
    }

    pub fn set_entity(&self, actor: &dyn Actor, value: &T) -> PropertyResult<()> {
        if !self.allows_entity(actor) {
            return Err(PropertyError::UnregisteredEntityType {
                identifier: self.identifier.clone(),
                type_id: actor.type_id(),
            });
        }
        let raw = self.compile(value)?;
        actor.set_property(&self.identifier, Some(raw))?;
        Ok(())
    }

    pub fn remove_entity(&self, actor: &dyn Actor) -> PropertyResult<()> {
        if !self.allows_entity(actor) {
            return Err(PropertyError::UnregisteredEntityType {
                identifier: self.identifier.clone(),
                type_id: actor.type_id(),
            });
        }
        actor.set_property(&self.identifier, None)?;
        Ok(())
    }

    fn allows_entity(&self, actor: &dyn Actor) -> bool {
        let type_id = actor.type_id();
        self.entity_types.iter().any(|t| *t == type_id)
    }

    /// `T` down to the raw slot value the engine accepts.
    fn compile(&self, value: &T) -> PropertyResult<PropertyValue> {
        let value = serde_json::to_value(value)?;
        match self.root_type {
            RootType::Number => value
                .as_f64()
                .map(PropertyValue::Number)
                .ok_or(PropertyError::ShapeMismatch {
                    identifier: self.identifier.clone(),
                    expected: RootType::Number,
                }),
            RootType::Boolean => value
                .as_bool()
                .map(PropertyValue::Boolean)
                .ok_or(PropertyError::ShapeMismatch {
                    identifier: self.identifier.clone(),
                    expected: RootType::Boolean,
                }),
            RootType::String => value
                .as_str()
                .map(|s| PropertyValue::String(s.to_string()))
                .ok_or(PropertyError::ShapeMismatch {
                    identifier: self.identifier.clone(),
                    expected: RootType::String,
                }),
            RootType::Object => Ok(PropertyValue::String(serde_json::to_string(&value)?)),
        }
    }

    /// The raw slot value back up to `T`.
    fn uncompile(&self, raw: PropertyValue) -> PropertyResult<T> {
        let value = match (self.root_type, raw) {
            // The engine stores every number as f64; re-tag whole values as
            // integers so integer-typed `T`s deserialize.
            (RootType::Number, PropertyValue::Number(n)) if n.fract() == 0.0 => {
                json!(n as i64)
            }
            (RootType::Number, PropertyValue::Number(n)) => json!(n),
            (RootType::Boolean, PropertyValue::Boolean(b)) => json!(b),
            (RootType::String, PropertyValue::String(s)) => json!(s),
            (RootType::Object, PropertyValue::String(s)) => serde_json::from_str(&s)?,
            (expected, _) => {
                return Err(PropertyError::ShapeMismatch {
                    identifier: self.identifier.clone(),
                    expected,
                })
            }
        };
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankchat_host::fake::FakeWorld;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct RankConfig {
        start: String,
        joiner: String,
        weight: i64,
    }

    fn config_property() -> DynamicProperty<RankConfig> {
        DynamicProperty::new("test:config", RootType::Object).world_dynamic()
    }

    #[test]
    fn composite_values_round_trip_through_json() {
        let world = FakeWorld::new();
        let property = config_property();
        let config = RankConfig {
            start: "§8[".to_string(),
            joiner: "][".to_string(),
            weight: 3,
        };

        property.set(&world, &config).unwrap();
        // On the wire it is a single string slot.
        assert!(matches!(
            world.get_property("test:config"),
            Some(PropertyValue::String(_))
        ));
        assert_eq!(property.get(&world), Some(config));
    }

    #[test]
    fn whole_numbers_deserialize_into_integer_types() {
        let world = FakeWorld::new();
        let property: DynamicProperty<i64> =
            DynamicProperty::new("test:count", RootType::Number).world_dynamic();

        property.set(&world, &42).unwrap();
        assert_eq!(world.get_property("test:count"), Some(PropertyValue::Number(42.0)));
        assert_eq!(property.get(&world), Some(42));
    }

    #[test]
    fn remove_is_idempotent() {
        let world = FakeWorld::new();
        let property = config_property();
        let config = RankConfig {
            start: "[".to_string(),
            joiner: "][".to_string(),
            weight: 0,
        };

        property.set(&world, &config).unwrap();
        property.remove(&world).unwrap();
        assert_eq!(property.get(&world), None);
        property.remove(&world).unwrap();
        assert_eq!(property.get(&world), None);
    }

    #[test]
    fn world_access_requires_the_world_dynamic_flag() {
        let world = FakeWorld::new();
        let property: DynamicProperty<i64> = DynamicProperty::new("test:count", RootType::Number);

        assert!(matches!(
            property.set(&world, &1),
            Err(PropertyError::NotWorldDynamic { .. })
        ));
        assert_eq!(property.get(&world), None);
    }

    #[test]
    fn entity_access_requires_a_registered_type() {
        let world = FakeWorld::new();
        let actor = world.spawn("Steve");
        let open: DynamicProperty<bool> = DynamicProperty::new("test:flag", RootType::Boolean)
            .register_entity_types(&["minecraft:player"]);
        let closed: DynamicProperty<bool> = DynamicProperty::new("test:flag", RootType::Boolean);

        open.set_entity(actor.as_ref(), &true).unwrap();
        assert_eq!(open.get_entity(actor.as_ref()), Some(true));

        assert!(matches!(
            closed.set_entity(actor.as_ref(), &true),
            Err(PropertyError::UnregisteredEntityType { .. })
        ));
        assert_eq!(closed.get_entity(actor.as_ref()), None);
    }

    #[test]
    fn corrupt_stored_json_reads_as_absent() {
        let world = FakeWorld::new();
        world
            .set_property("test:config", Some(PropertyValue::String("{not json".into())))
            .unwrap();
        assert_eq!(config_property().get(&world), None);
    }
}
