//! Error types used by the hub, its facade and subscriptions.
//!
//! This module defines two main error enums:
//!
//! - [`HubError`] — errors raised by hub operations (lifecycle misuse).
//! - [`SubscriptionError`] — errors raised when retrieving a subscription's handler.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.
//!
//! Operational conditions (queue overflow, queue pressure, handler panics) are
//! **not** errors: they are absorbed by the hub and reported through
//! [`Host`](crate::Host) logging sinks.

use thiserror::Error;

/// # Errors produced by hub operations.
///
/// Every public operation on a [`Hub`](crate::Hub) fails fast with
/// [`HubError::Disposed`] once the hub has been disposed. The remaining
/// variants only come from the thread-local facade.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubError {
    /// No hub is bound to the facade yet.
    #[error("hub is not initialized")]
    NotInitialized,

    /// The facade already holds a live hub and refuses to re-initialize.
    #[error("hub is already initialized")]
    AlreadyInitialized,

    /// The hub was disposed; no further operations are accepted.
    #[error("hub has been disposed")]
    Disposed,
}

impl HubError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use tickbus::HubError;
    ///
    /// assert_eq!(HubError::Disposed.as_label(), "hub_disposed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HubError::NotInitialized => "hub_not_initialized",
            HubError::AlreadyInitialized => "hub_already_initialized",
            HubError::Disposed => "hub_disposed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HubError::NotInitialized => "no hub bound; call init() first".to_string(),
            HubError::AlreadyInitialized => {
                "a live hub is already bound; use rebind() to replace it".to_string()
            }
            HubError::Disposed => "operation on a disposed hub".to_string(),
        }
    }
}

/// # Errors produced by handler retrieval.
///
/// Retrieval is only expected after a liveness check, so
/// [`SubscriptionError::InvalidState`] signals an internal invariant violation
/// rather than a user mistake.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The subscription was disposed.
    #[error("subscription has been disposed")]
    NotSubscribed,

    /// The subscription is not disposed but its weak handler is no longer reachable.
    #[error("handler for {event} is no longer reachable")]
    InvalidState {
        /// Event type name of the subscription.
        event: &'static str,
    },
}

impl SubscriptionError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use tickbus::SubscriptionError;
    ///
    /// let err = SubscriptionError::InvalidState { event: "Ping" };
    /// assert_eq!(err.as_label(), "subscription_invalid_state");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SubscriptionError::NotSubscribed => "subscription_not_subscribed",
            SubscriptionError::InvalidState { .. } => "subscription_invalid_state",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SubscriptionError::NotSubscribed => "subscription disposed".to_string(),
            SubscriptionError::InvalidState { event } => {
                format!("weak handler for {event} reported alive but was unreachable")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_error_labels_are_stable() {
        assert_eq!(HubError::NotInitialized.as_label(), "hub_not_initialized");
        assert_eq!(
            HubError::AlreadyInitialized.as_label(),
            "hub_already_initialized"
        );
        assert_eq!(HubError::Disposed.to_string(), "hub has been disposed");
    }

    #[test]
    fn test_invalid_state_names_event() {
        let err = SubscriptionError::InvalidState { event: "demo::Ping" };
        assert!(err.to_string().contains("demo::Ping"));
        assert!(err.as_message().contains("demo::Ping"));
    }
}
