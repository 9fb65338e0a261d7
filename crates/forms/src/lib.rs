//! Dialog models over the host UI surface.
//!
//! Each form is built with a consuming builder, then shown once. Showing
//! retries while the player has another UI open, up to a fixed ceiling;
//! button and submit callbacks only run for an actual response.

use rankchat_host::{
    ActionButtonSpec, Actor, FormPayload, FormPayloadKind, FormResponse, FormValue, ModalFieldSpec,
    UiSurface,
};
use tracing::warn;

/// How many `Busy` answers to absorb before giving up on a show request.
/// The host answers busy roughly once per tick while another UI is open.
pub const MAX_SHOW_RETRIES: usize = 200;

const TIMEOUT_MESSAGE: &str =
    "§cForm timed out! Please close your current UI and try again.";

type Callback<'a> = Box<dyn FnOnce() + 'a>;

fn show_with_retry(
    actor: &dyn Actor,
    ui: &dyn UiSurface,
    payload: &FormPayload,
) -> Option<FormResponse> {
    for _ in 0..MAX_SHOW_RETRIES {
        match ui.show_form(actor, payload) {
            FormResponse::Busy => continue,
            response => return Some(response),
        }
    }
    warn!(actor = %actor.name(), title = %payload.title, "form show timed out");
    actor.send_message(TIMEOUT_MESSAGE);
    None
}

/// A two-button prompt.
pub struct MessageForm<'a> {
    title: String,
    body: String,
    button1: Option<(String, Callback<'a>)>,
    button2: Option<(String, Callback<'a>)>,
    on_closed: Option<Callback<'a>>,
}

impl<'a> MessageForm<'a> {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> MessageForm<'a> {
        MessageForm {
            title: title.into(),
            body: body.into(),
            button1: None,
            button2: None,
            on_closed: None,
        }
    }

    pub fn button1(mut self, text: impl Into<String>, callback: impl FnOnce() + 'a) -> Self {
        self.button1 = Some((text.into(), Box::new(callback)));
        self
    }

    pub fn button2(mut self, text: impl Into<String>, callback: impl FnOnce() + 'a) -> Self {
        self.button2 = Some((text.into(), Box::new(callback)));
        self
    }

    pub fn on_closed(mut self, callback: impl FnOnce() + 'a) -> Self {
        self.on_closed = Some(Box::new(callback));
        self
    }

    pub fn show(self, actor: &dyn Actor, ui: &dyn UiSurface) {
        let (text1, callback1) = self.button1.map(|(t, c)| (t, Some(c))).unwrap_or_default();
        let (text2, callback2) = self.button2.map(|(t, c)| (t, Some(c))).unwrap_or_default();
        let payload = FormPayload {
            title: self.title,
            kind: FormPayloadKind::Message {
                body: self.body,
                button1: text1,
                button2: text2,
            },
        };

        match show_with_retry(actor, ui, &payload) {
            Some(FormResponse::Button(0)) => {
                if let Some(callback) = callback1 {
                    callback();
                }
            }
            Some(FormResponse::Button(_)) => {
                if let Some(callback) = callback2 {
                    callback();
                }
            }
            Some(FormResponse::Closed) => {
                if let Some(callback) = self.on_closed {
                    callback();
                }
            }
            _ => {}
        }
    }
}

/// A button list, one callback per button.
pub struct ActionForm<'a> {
    title: String,
    body: Option<String>,
    buttons: Vec<(ActionButtonSpec, Callback<'a>)>,
    on_closed: Option<Callback<'a>>,
}

impl<'a> ActionForm<'a> {
    pub fn new(title: impl Into<String>) -> ActionForm<'a> {
        ActionForm {
            title: title.into(),
            body: None,
            buttons: Vec::new(),
            on_closed: None,
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn button(
        mut self,
        text: impl Into<String>,
        icon: Option<String>,
        callback: impl FnOnce() + 'a,
    ) -> Self {
        self.buttons.push((
            ActionButtonSpec {
                text: text.into(),
                icon,
            },
            Box::new(callback),
        ));
        self
    }

    pub fn on_closed(mut self, callback: impl FnOnce() + 'a) -> Self {
        self.on_closed = Some(Box::new(callback));
        self
    }

    pub fn show(self, actor: &dyn Actor, ui: &dyn UiSurface) {
        let (specs, callbacks): (Vec<_>, Vec<_>) = self.buttons.into_iter().unzip();
        let payload = FormPayload {
            title: self.title,
            kind: FormPayloadKind::Action {
                body: self.body,
                buttons: specs,
            },
        };

        match show_with_retry(actor, ui, &payload) {
            Some(FormResponse::Button(index)) => {
                let mut callbacks = callbacks;
                if index < callbacks.len() {
                    let callback = callbacks.swap_remove(index);
                    callback();
                }
            }
            Some(FormResponse::Closed) => {
                if let Some(callback) = self.on_closed {
                    callback();
                }
            }
            _ => {}
        }
    }
}

/// A submitted modal field, in declaration order. Dropdown selections come
/// back as the chosen option text, not the index.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalValue {
    Dropdown(String),
    Slider(f64),
    TextField(String),
    Toggle(bool),
}

/// A multi-field input dialog with a single submit callback.
pub struct ModalForm<'a> {
    title: String,
    fields: Vec<ModalFieldSpec>,
    on_closed: Option<Callback<'a>>,
}

impl<'a> ModalForm<'a> {
    pub fn new(title: impl Into<String>) -> ModalForm<'a> {
        ModalForm {
            title: title.into(),
            fields: Vec::new(),
            on_closed: None,
        }
    }

    pub fn dropdown(
        mut self,
        label: impl Into<String>,
        options: Vec<String>,
        default_index: Option<usize>,
    ) -> Self {
        self.fields.push(ModalFieldSpec::Dropdown {
            label: label.into(),
            options,
            default_index,
        });
        self
    }

    pub fn slider(
        mut self,
        label: impl Into<String>,
        min: f64,
        max: f64,
        step: f64,
        default: Option<f64>,
    ) -> Self {
        self.fields.push(ModalFieldSpec::Slider {
            label: label.into(),
            min,
            max,
            step,
            default,
        });
        self
    }

    pub fn text_field(
        mut self,
        label: impl Into<String>,
        placeholder: impl Into<String>,
        default: Option<String>,
    ) -> Self {
        self.fields.push(ModalFieldSpec::TextField {
            label: label.into(),
            placeholder: placeholder.into(),
            default,
        });
        self
    }

    pub fn toggle(mut self, label: impl Into<String>, default: bool) -> Self {
        self.fields.push(ModalFieldSpec::Toggle {
            label: label.into(),
            default,
        });
        self
    }

    pub fn on_closed(mut self, callback: impl FnOnce() + 'a) -> Self {
        self.on_closed = Some(Box::new(callback));
        self
    }

    pub fn show(self, actor: &dyn Actor, ui: &dyn UiSurface, on_submit: impl FnOnce(Vec<ModalValue>)) {
        let payload = FormPayload {
            title: self.title,
            kind: FormPayloadKind::Modal {
                fields: self.fields,
            },
        };

        match show_with_retry(actor, ui, &payload) {
            Some(FormResponse::Submitted(values)) => {
                let FormPayloadKind::Modal { fields } = &payload.kind else {
                    unreachable!()
                };
                let values = values
                    .into_iter()
                    .zip(fields)
                    .map(|(value, field)| resolve_value(value, field))
                    .collect();
                on_submit(values);
            }
            Some(FormResponse::Closed) => {
                if let Some(callback) = self.on_closed {
                    callback();
                }
            }
            _ => {}
        }
    }
}

fn resolve_value(value: FormValue, field: &ModalFieldSpec) -> ModalValue {
    match (value, field) {
        (FormValue::Dropdown(index), ModalFieldSpec::Dropdown { options, .. }) => {
            ModalValue::Dropdown(options.get(index).cloned().unwrap_or_default())
        }
        (FormValue::Dropdown(index), _) => ModalValue::Dropdown(index.to_string()),
        (FormValue::Slider(value), _) => ModalValue::Slider(value),
        (FormValue::TextField(text), _) => ModalValue::TextField(text),
        (FormValue::Toggle(value), _) => ModalValue::Toggle(value),
    }
}

/// The shared "are you sure" prompt.
pub fn confirm_action<'a>(
    actor: &dyn Actor,
    ui: &dyn UiSurface,
    body: impl Into<String>,
    on_confirm: impl FnOnce() + 'a,
) {
    MessageForm::new("Confirm To Continue", body)
        .button1("Confirm", on_confirm)
        .button2("Never Mind", || {})
        .show(actor, ui);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankchat_host::fake::{FakeUi, FakeWorld};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn busy_responses_retry_until_an_answer_arrives() {
        let world = FakeWorld::new();
        let actor = world.spawn("Steve");
        let ui = FakeUi::new();
        for _ in 0..5 {
            ui.respond_with(FormResponse::Busy);
        }
        ui.respond_with(FormResponse::Button(0));

        let hits = Rc::new(Cell::new(0));
        let hits2 = hits.clone();
        MessageForm::new("Prompt", "body")
            .button1("Yes", move || hits2.set(hits2.get() + 1))
            .button2("No", || {})
            .show(actor.as_ref(), &ui);

        assert_eq!(ui.shown_count(), 6);
        assert_eq!(hits.get(), 1);
        assert!(actor.messages().is_empty());
    }

    #[test]
    fn a_busy_host_eventually_times_out_with_a_message() {
        let world = FakeWorld::new();
        let actor = world.spawn("Steve");
        let ui = FakeUi::new();
        for _ in 0..MAX_SHOW_RETRIES {
            ui.respond_with(FormResponse::Busy);
        }

        let hits = Rc::new(Cell::new(0));
        let hits2 = hits.clone();
        MessageForm::new("Prompt", "body")
            .button1("Yes", move || hits2.set(hits2.get() + 1))
            .show(actor.as_ref(), &ui);

        assert_eq!(ui.shown_count(), MAX_SHOW_RETRIES);
        assert_eq!(hits.get(), 0);
        assert_eq!(actor.messages(), vec![TIMEOUT_MESSAGE.to_string()]);
    }

    #[test]
    fn closing_runs_only_the_closed_callback() {
        let world = FakeWorld::new();
        let actor = world.spawn("Steve");
        let ui = FakeUi::new();
        ui.respond_with(FormResponse::Closed);

        let closed = Rc::new(Cell::new(false));
        let closed2 = closed.clone();
        MessageForm::new("Prompt", "body")
            .button1("Yes", || panic!("button callback must not run"))
            .on_closed(move || closed2.set(true))
            .show(actor.as_ref(), &ui);

        assert!(closed.get());
    }

    #[test]
    fn action_buttons_dispatch_by_index() {
        let world = FakeWorld::new();
        let actor = world.spawn("Steve");
        let ui = FakeUi::new();
        ui.respond_with(FormResponse::Button(1));

        let picked = Rc::new(Cell::new(0));
        let p1 = picked.clone();
        let p2 = picked.clone();
        ActionForm::new("Ranks")
            .button("Create", None, move || p1.set(1))
            .button("Delete", None, move || p2.set(2))
            .show(actor.as_ref(), &ui);

        assert_eq!(picked.get(), 2);
    }

    #[test]
    fn modal_submit_maps_dropdown_indices_to_option_text() {
        let world = FakeWorld::new();
        let actor = world.spawn("Steve");
        let ui = FakeUi::new();
        ui.respond_with(FormResponse::Submitted(vec![
            FormValue::Dropdown(1),
            FormValue::TextField("§bVIP".to_string()),
            FormValue::Toggle(true),
        ]));

        let seen = Rc::new(Cell::new(None));
        let seen2 = seen.clone();
        ModalForm::new("Edit Rank")
            .dropdown(
                "Target",
                vec!["Steve".to_string(), "Alex".to_string()],
                None,
            )
            .text_field("Rank", "rank text", None)
            .toggle("Announce", false)
            .show(actor.as_ref(), &ui, move |values| {
                seen2.set(Some(values));
            });

        assert_eq!(
            seen.take(),
            Some(vec![
                ModalValue::Dropdown("Alex".to_string()),
                ModalValue::TextField("§bVIP".to_string()),
                ModalValue::Toggle(true),
            ])
        );
    }
}
