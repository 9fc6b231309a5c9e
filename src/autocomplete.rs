//src/autocomplete.rs
//! Exercise-name autocomplete as a state machine.
//!
//! [`transition`] is the whole behaviour: it takes the current state and one
//! input event and returns the next state plus the committed name, if any.
//! [`AutocompleteController`] owns a state value and exposes one method per
//! event for hosts that prefer that shape.

use crate::catalog::{self, CatalogEntry};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AutocompleteState {
    pub query: String,
    pub is_open: bool,
    pub suggestions: Vec<CatalogEntry>,
    /// `None` means nothing is highlighted.
    pub selected_index: Option<usize>,
}

impl AutocompleteState {
    #[must_use]
    pub fn selected(&self) -> Option<&CatalogEntry> {
        self.selected_index.and_then(|i| self.suggestions.get(i))
    }

    fn open_with(mut self, query: String) -> Self {
        self.suggestions = catalog::search(&query);
        self.query = query;
        self.is_open = true;
        self.selected_index = None;
        self
    }

    fn close(mut self) -> Self {
        self.is_open = false;
        self.selected_index = None;
        self
    }

    fn commit(mut self, entry: CatalogEntry) -> Transition {
        self.query = entry.name.to_string();
        Transition {
            state: self.close(),
            committed: Some(entry.name.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutocompleteEvent {
    QueryChanged(String),
    Focus,
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    OutsideInteraction,
    SuggestionClicked(CatalogEntry),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: AutocompleteState,
    /// Exercise name to write into the entry form.
    pub committed: Option<String>,
}

impl From<AutocompleteState> for Transition {
    fn from(state: AutocompleteState) -> Self {
        Self {
            state,
            committed: None,
        }
    }
}

#[must_use]
pub fn transition(state: AutocompleteState, event: AutocompleteEvent) -> Transition {
    match event {
        AutocompleteEvent::QueryChanged(query) => state.open_with(query).into(),
        AutocompleteEvent::Focus => {
            let query = state.query.clone();
            state.open_with(query).into()
        }
        AutocompleteEvent::ArrowDown if state.is_open => {
            let Some(last) = state.suggestions.len().checked_sub(1) else {
                return state.into();
            };
            let next = state.selected_index.map_or(0, |i| (i + 1).min(last));
            AutocompleteState {
                selected_index: Some(next),
                ..state
            }
            .into()
        }
        AutocompleteEvent::ArrowUp if state.is_open => {
            let previous = state.selected_index.and_then(|i| i.checked_sub(1));
            AutocompleteState {
                selected_index: previous,
                ..state
            }
            .into()
        }
        AutocompleteEvent::Enter if state.is_open => match state.selected().copied() {
            Some(entry) => state.commit(entry),
            None => state.into(),
        },
        AutocompleteEvent::Escape | AutocompleteEvent::OutsideInteraction => state.close().into(),
        AutocompleteEvent::SuggestionClicked(entry) => state.commit(entry),
        AutocompleteEvent::ArrowDown | AutocompleteEvent::ArrowUp | AutocompleteEvent::Enter => {
            state.into()
        }
    }
}

/// Identifies one outside-interaction subscription held by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The UI layer that can report clicks or focus landing outside the input.
///
/// The host owns the listener; the controller only asks for one while it is
/// attached and hands it back on detach.
pub trait InteractionHost {
    fn subscribe_outside_interaction(&mut self) -> ListenerId;
    fn unsubscribe(&mut self, id: ListenerId);
}

/// A live subscription. Dropping it releases the listener.
#[derive(Debug)]
pub struct Attachment<'h, H: InteractionHost + ?Sized> {
    host: &'h mut H,
    id: Option<ListenerId>,
}

impl<'h, H: InteractionHost + ?Sized> Attachment<'h, H> {
    #[must_use]
    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }

    pub fn host(&mut self) -> &mut H {
        self.host
    }

    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(id) = self.id.take() {
            self.host.unsubscribe(id);
        }
    }
}

impl<H: InteractionHost + ?Sized> Drop for Attachment<'_, H> {
    fn drop(&mut self) {
        self.release();
    }
}

#[derive(Debug, Default)]
pub struct AutocompleteController {
    state: AutocompleteState,
}

impl AutocompleteController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &AutocompleteState {
        &self.state
    }

    /// Subscribes to outside interactions on `host` until the returned
    /// attachment is detached or dropped.
    pub fn attach<'h, H: InteractionHost + ?Sized>(&self, host: &'h mut H) -> Attachment<'h, H> {
        let id = host.subscribe_outside_interaction();
        Attachment { host, id: Some(id) }
    }

    pub fn detach<H: InteractionHost + ?Sized>(&self, attachment: Attachment<'_, H>) {
        attachment.detach();
    }

    /// Applies one event and returns the committed name, if the event committed.
    pub fn dispatch(&mut self, event: AutocompleteEvent) -> Option<String> {
        let Transition { state, committed } = transition(std::mem::take(&mut self.state), event);
        self.state = state;
        committed
    }

    pub fn on_query_change(&mut self, query: impl Into<String>) -> &AutocompleteState {
        self.dispatch(AutocompleteEvent::QueryChanged(query.into()));
        &self.state
    }

    pub fn on_focus(&mut self) -> &AutocompleteState {
        self.dispatch(AutocompleteEvent::Focus);
        &self.state
    }

    pub fn on_arrow_down(&mut self) -> &AutocompleteState {
        self.dispatch(AutocompleteEvent::ArrowDown);
        &self.state
    }

    pub fn on_arrow_up(&mut self) -> &AutocompleteState {
        self.dispatch(AutocompleteEvent::ArrowUp);
        &self.state
    }

    pub fn on_enter(&mut self) -> (&AutocompleteState, Option<String>) {
        let committed = self.dispatch(AutocompleteEvent::Enter);
        (&self.state, committed)
    }

    pub fn on_escape(&mut self) -> &AutocompleteState {
        self.dispatch(AutocompleteEvent::Escape);
        &self.state
    }

    pub fn on_outside_interaction(&mut self) -> &AutocompleteState {
        self.dispatch(AutocompleteEvent::OutsideInteraction);
        &self.state
    }

    pub fn on_suggestion_click(&mut self, entry: CatalogEntry) -> (&AutocompleteState, Option<String>) {
        let committed = self.dispatch(AutocompleteEvent::SuggestionClicked(entry));
        (&self.state, committed)
    }
}
