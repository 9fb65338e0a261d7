//! In-memory host doubles for tests.

use crate::{
    Actor, ChatEvent, FormPayload, FormResponse, HostResult, PropertyValue, UiSurface, Vec3, World,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

static NEXT_ACTOR_ID: AtomicU64 = AtomicU64::new(1);

struct FakeActorState {
    position: Vec3,
    view_direction: Vec3,
    op: bool,
    tags: Vec<String>,
    properties: HashMap<String, PropertyValue>,
    messages: Vec<String>,
}

pub struct FakeActor {
    id: String,
    name: String,
    type_id: String,
    state: Mutex<FakeActorState>,
}

impl FakeActor {
    pub fn new(name: &str) -> Arc<FakeActor> {
        let id = NEXT_ACTOR_ID.fetch_add(1, Ordering::Relaxed);
        Arc::new(FakeActor {
            id: format!("-{id}"),
            name: name.to_string(),
            type_id: "minecraft:player".to_string(),
            state: Mutex::new(FakeActorState {
                position: Vec3::default(),
                view_direction: Vec3::new(0.0, 0.0, 1.0),
                op: false,
                tags: Vec::new(),
                properties: HashMap::new(),
                messages: Vec::new(),
            }),
        })
    }

    pub fn set_position(&self, position: Vec3) {
        self.state.lock().unwrap().position = position;
    }

    pub fn set_view_direction(&self, view: Vec3) {
        self.state.lock().unwrap().view_direction = view;
    }

    /// Everything sent to this actor so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.state.lock().unwrap().messages.clone()
    }

    pub fn clear_messages(&self) {
        self.state.lock().unwrap().messages.clear();
    }
}

impl Actor for FakeActor {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn type_id(&self) -> String {
        self.type_id.clone()
    }

    fn position(&self) -> Vec3 {
        self.state.lock().unwrap().position
    }

    fn view_direction(&self) -> Vec3 {
        self.state.lock().unwrap().view_direction
    }

    fn is_op(&self) -> bool {
        self.state.lock().unwrap().op
    }

    fn set_op(&self, value: bool) {
        self.state.lock().unwrap().op = value;
    }

    fn tags(&self) -> Vec<String> {
        self.state.lock().unwrap().tags.clone()
    }

    fn add_tag(&self, tag: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.tags.iter().any(|t| t == tag) {
            return false;
        }
        state.tags.push(tag.to_string());
        true
    }

    fn remove_tag(&self, tag: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        let before = state.tags.len();
        state.tags.retain(|t| t != tag);
        state.tags.len() != before
    }

    fn send_message(&self, message: &str) {
        self.state.lock().unwrap().messages.push(message.to_string());
    }

    fn get_property(&self, identifier: &str) -> Option<PropertyValue> {
        self.state.lock().unwrap().properties.get(identifier).cloned()
    }

    fn set_property(&self, identifier: &str, value: Option<PropertyValue>) -> HostResult<()> {
        let mut state = self.state.lock().unwrap();
        match value {
            Some(value) => {
                state.properties.insert(identifier.to_string(), value);
            }
            None => {
                state.properties.remove(identifier);
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct FakeWorldState {
    actors: Vec<Arc<FakeActor>>,
    properties: HashMap<String, PropertyValue>,
    messages: Vec<String>,
}

#[derive(Default)]
pub struct FakeWorld {
    state: Mutex<FakeWorldState>,
}

impl FakeWorld {
    pub fn new() -> FakeWorld {
        FakeWorld::default()
    }

    /// Connects a new actor with the given display name.
    pub fn spawn(&self, name: &str) -> Arc<FakeActor> {
        let actor = FakeActor::new(name);
        self.state.lock().unwrap().actors.push(actor.clone());
        actor
    }

    pub fn disconnect(&self, actor: &FakeActor) {
        self.state
            .lock()
            .unwrap()
            .actors
            .retain(|a| a.id != actor.id);
    }

    /// Everything broadcast to the whole world so far.
    pub fn messages(&self) -> Vec<String> {
        self.state.lock().unwrap().messages.clone()
    }

    pub fn chat(&self, sender: &Arc<FakeActor>, message: &str) -> ChatEvent {
        ChatEvent {
            message: message.to_string(),
            sender: sender.clone() as Arc<dyn Actor>,
        }
    }
}

impl World for FakeWorld {
    fn actors(&self) -> Vec<Arc<dyn Actor>> {
        self.state
            .lock()
            .unwrap()
            .actors
            .iter()
            .map(|a| a.clone() as Arc<dyn Actor>)
            .collect()
    }

    fn send_message(&self, message: &str) {
        self.state.lock().unwrap().messages.push(message.to_string());
    }

    fn get_property(&self, identifier: &str) -> Option<PropertyValue> {
        self.state.lock().unwrap().properties.get(identifier).cloned()
    }

    fn set_property(&self, identifier: &str, value: Option<PropertyValue>) -> HostResult<()> {
        let mut state = self.state.lock().unwrap();
        match value {
            Some(value) => {
                state.properties.insert(identifier.to_string(), value);
            }
            None => {
                state.properties.remove(identifier);
            }
        }
        Ok(())
    }
}

/// A scripted dialog renderer: responses are popped in order, and every
/// payload shown is recorded for assertions. An exhausted script answers
/// `Closed`.
#[derive(Default)]
pub struct FakeUi {
    responses: Mutex<VecDeque<FormResponse>>,
    shown: Mutex<Vec<String>>,
}

impl FakeUi {
    pub fn new() -> FakeUi {
        FakeUi::default()
    }

    pub fn respond_with(&self, response: FormResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Titles of every form shown, in order.
    pub fn shown_titles(&self) -> Vec<String> {
        self.shown.lock().unwrap().clone()
    }

    pub fn shown_count(&self) -> usize {
        self.shown.lock().unwrap().len()
    }
}

impl UiSurface for FakeUi {
    fn show_form(&self, _actor: &dyn Actor, form: &FormPayload) -> FormResponse {
        self.shown.lock().unwrap().push(form.title.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(FormResponse::Closed)
    }
}
