//! The boundary between the add-on and the embedding game engine.
//!
//! Every persistent value, chat hook, and UI surface the add-on touches is
//! delegated to the host runtime. This crate defines that surface as traits
//! so the rest of the workspace never names the engine directly, plus
//! in-memory fakes (behind the `testing` feature) that the other crates test
//! against.

use std::sync::Arc;
use thiserror::Error;

#[cfg(any(test, feature = "testing"))]
pub mod fake;

/// A position or direction vector in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Vec3 {
        Vec3 { x, y, z }
    }
}

/// A raw value as the engine's dynamic property store accepts it.
/// Composite values are serialized to JSON strings before they get here.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Number(f64),
    Boolean(bool),
    String(String),
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("entity {id} is no longer valid")]
    InvalidEntity { id: String },
    #[error("{0}")]
    Message(String),
}

pub type HostResult<T> = Result<T, HostError>;

/// A connected entity (usually a player) as exposed by the host runtime.
///
/// Implementations use interior mutability; the engine hands out shared
/// handles and the add-on runs on its single cooperative thread.
pub trait Actor {
    /// Stable identity for the lifetime of the session. Cooldown ledger keys.
    fn id(&self) -> String;
    /// Display name, used for `Player` argument matching.
    fn name(&self) -> String;
    /// Engine type id, e.g. `minecraft:player`.
    fn type_id(&self) -> String;
    fn position(&self) -> Vec3;
    fn view_direction(&self) -> Vec3;
    fn is_op(&self) -> bool;
    fn set_op(&self, value: bool);
    fn tags(&self) -> Vec<String>;
    /// Returns false if the tag was already present.
    fn add_tag(&self, tag: &str) -> bool;
    /// Returns false if the tag was not present.
    fn remove_tag(&self, tag: &str) -> bool;
    fn send_message(&self, message: &str);
    fn get_property(&self, identifier: &str) -> Option<PropertyValue>;
    /// `None` removes the property.
    fn set_property(&self, identifier: &str, value: Option<PropertyValue>) -> HostResult<()>;
}

/// The world-level host surface: actor directory, chat broadcast, and the
/// world-scoped slot of the dynamic property store.
pub trait World {
    fn actors(&self) -> Vec<Arc<dyn Actor>>;

    fn actor_by_name(&self, name: &str) -> Option<Arc<dyn Actor>> {
        self.actors().into_iter().find(|a| a.name() == name)
    }

    fn send_message(&self, message: &str);
    fn get_property(&self, identifier: &str) -> Option<PropertyValue>;
    fn set_property(&self, identifier: &str, value: Option<PropertyValue>) -> HostResult<()>;
}

/// One outgoing chat line, delivered to the add-on before the engine
/// broadcasts it. The hook's return value decides whether the raw line is
/// suppressed.
#[derive(Clone)]
pub struct ChatEvent {
    pub message: String,
    pub sender: Arc<dyn Actor>,
}

/// A dialog description, ready for the engine to render.
pub struct FormPayload {
    pub title: String,
    pub kind: FormPayloadKind,
}

pub enum FormPayloadKind {
    Message {
        body: String,
        button1: String,
        button2: String,
    },
    Action {
        body: Option<String>,
        buttons: Vec<ActionButtonSpec>,
    },
    Modal {
        fields: Vec<ModalFieldSpec>,
    },
}

pub struct ActionButtonSpec {
    pub text: String,
    pub icon: Option<String>,
}

pub enum ModalFieldSpec {
    Dropdown {
        label: String,
        options: Vec<String>,
        default_index: Option<usize>,
    },
    Slider {
        label: String,
        min: f64,
        max: f64,
        step: f64,
        default: Option<f64>,
    },
    TextField {
        label: String,
        placeholder: String,
        default: Option<String>,
    },
    Toggle {
        label: String,
        default: bool,
    },
}

/// What came back from showing a form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormResponse {
    /// Modal submission, one value per field in declaration order.
    Submitted(Vec<FormValue>),
    /// Message/action button selection by index.
    Button(usize),
    /// The user explicitly closed the dialog.
    Closed,
    /// Transient cancellation: the actor had another UI open. Retryable.
    Busy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Toggle(bool),
    Slider(f64),
    TextField(String),
    /// Selected option index of a dropdown.
    Dropdown(usize),
}

/// The engine's dialog renderer. Showing is synchronous from the add-on's
/// point of view; the engine parks the cooperative thread until the player
/// responds or the request is cancelled.
pub trait UiSurface {
    fn show_form(&self, actor: &dyn Actor, form: &FormPayload) -> FormResponse;
}
