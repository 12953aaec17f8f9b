//! Change notifications for the render layer.
//!
//! Every state mutation in the console emits a [`ConsoleEvent`]; a view
//! subscribes with [`EventBus::subscribe`] and redraws what changed.

use crate::catalog::DraftMode;
use crate::models::{ProductField, SessionState};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    /// The gate switched between the login view and the catalog view.
    SessionChanged(SessionState),
    /// The product list was replaced by a fresh fetch.
    ProductsReplaced { count: usize },
    /// The form opened on a new draft.
    DraftOpened(DraftMode),
    /// One draft field was edited.
    DraftChanged(ProductField),
    /// The form closed and the draft was reset.
    DraftClosed,
    /// The detail view now shows this product id, or nothing.
    DetailSelected(Option<String>),
    /// A blocking, user-visible message.
    Alert(String),
}

type Observer = Box<dyn Fn(&ConsoleEvent) + Send>;

#[derive(Default)]
pub struct EventBus {
    observers: Vec<Observer>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&ConsoleEvent) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn emit(&self, event: ConsoleEvent) {
        for observer in &self.observers {
            observer(&event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .finish()
    }
}
