//! Asset access event and its subscribers.
//!
//! The resolver publishes one event per resolved request. Subscribers carry
//! all authorization and delivery policy; the core never decides on its own.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::models::AssetReference;

/// What a subscriber wants done with a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "location", rename_all = "snake_case")]
pub enum AccessDecision {
    /// No opinion; later subscribers decide.
    Pass,
    /// Deliver the file through the conditional responder.
    Serve,
    /// Refuse access.
    Deny,
    /// Send the client elsewhere (login page, placeholder image).
    Redirect(String),
    /// Pretend the file does not exist.
    NotFound,
}

impl AccessDecision {
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Serve => "serve",
            Self::Deny => "deny",
            Self::Redirect(_) => "redirect",
            Self::NotFound => "not_found",
        }
    }
}

/// Subscriber to the asset access event.
pub trait AssetAccessHandler: Send + Sync {
    fn on_asset_access(&self, asset: &AssetReference) -> AccessDecision;
}

impl<F> AssetAccessHandler for F
where
    F: Fn(&AssetReference) -> AccessDecision + Send + Sync,
{
    fn on_asset_access(&self, asset: &AssetReference) -> AccessDecision {
        self(asset)
    }
}

/// Ordered registry of access subscribers.
#[derive(Clone, Default)]
pub struct AccessHooks {
    handlers: Vec<Arc<dyn AssetAccessHandler>>,
}

impl fmt::Debug for AccessHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessHooks")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl AccessHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. Subscribers run in registration order.
    pub fn on_asset_access(&mut self, handler: impl AssetAccessHandler + 'static) -> &mut Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Builder-style variant of [`Self::on_asset_access`].
    #[must_use]
    pub fn with(mut self, handler: impl AssetAccessHandler + 'static) -> Self {
        self.on_asset_access(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Publish the event to every subscriber exactly once.
    ///
    /// The first non-`Pass` answer wins; later subscribers still observe the
    /// event but cannot override it.
    pub fn dispatch(&self, asset: &AssetReference) -> AccessDecision {
        let mut outcome = AccessDecision::Pass;
        for handler in &self.handlers {
            let decision = handler.on_asset_access(asset);
            if outcome.is_pass() && !decision.is_pass() {
                outcome = decision;
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetId;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn reference(id: Option<i64>) -> AssetReference {
        AssetReference {
            id: id.map(AssetId::new),
            url: "https://example.com/uploads/a.jpg".to_string(),
            path: PathBuf::from("/srv/uploads/a.jpg"),
            is_variant: false,
        }
    }

    #[test]
    fn empty_registry_passes() {
        let hooks = AccessHooks::new();
        assert!(hooks.is_empty());
        assert_eq!(hooks.dispatch(&reference(Some(1))), AccessDecision::Pass);
    }

    #[test]
    fn first_opinion_wins_but_everyone_observes() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);

        let hooks = AccessHooks::new()
            .with(|_: &AssetReference| AccessDecision::Pass)
            .with(|asset: &AssetReference| {
                if asset.is_resolved() {
                    AccessDecision::Serve
                } else {
                    AccessDecision::NotFound
                }
            })
            .with(|_: &AssetReference| AccessDecision::Deny)
            .with(move |_: &AssetReference| {
                counter.fetch_add(1, Ordering::SeqCst);
                AccessDecision::Pass
            });

        assert_eq!(hooks.len(), 4);
        assert_eq!(hooks.dispatch(&reference(Some(1))), AccessDecision::Serve);
        assert_eq!(hooks.dispatch(&reference(None)), AccessDecision::NotFound);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn decision_serializes_with_action_tag() {
        let json = serde_json::to_value(AccessDecision::Redirect("/login".to_string())).unwrap();
        assert_eq!(json["action"], "redirect");
        assert_eq!(json["location"], "/login");
        assert_eq!(AccessDecision::Deny.label(), "deny");
    }
}
