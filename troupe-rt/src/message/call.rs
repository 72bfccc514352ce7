//! Method invocations and their promise-style completions.
//!
//! An [`Invocation`] is the payload the proxy enqueues for every method
//! call: the method name, the serialized arguments, and a completion the
//! harness settles exactly once. The caller holds the matching
//! [`PendingReply`] and awaits it like a future.

// Layer 1: Standard library imports
use std::fmt;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;

// Layer 3: Internal module imports
use super::error::ActorError;

type SettleSender = oneshot::Sender<Result<Value, ActorError>>;

/// Take-once settle slot shared between queue copies of an invocation.
///
/// The slot is consumed by the first resolve/reject; later settle attempts
/// find it empty and do nothing. Dropping the slot unsettled closes the
/// caller's channel, which the caller observes as [`ActorError::Abandoned`].
struct Completion {
    tx: Mutex<Option<SettleSender>>,
}

impl Completion {
    fn settle(&self, outcome: Result<Value, ActorError>) {
        if let Some(tx) = self.tx.lock().take() {
            // Receiver may be gone if the caller stopped waiting.
            let _ = tx.send(outcome);
        }
    }

    fn detached() -> Self {
        Self {
            tx: Mutex::new(None),
        }
    }
}

/// A single serialized method call travelling through the mailbox.
///
/// Cloning an invocation (the mailbox clones the queue head for delivery)
/// shares the completion: whichever copy settles first wins, the rest
/// become no-ops.
///
/// # Example
/// ```rust
/// use serde_json::json;
/// use troupe_rt::message::Invocation;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (invocation, reply) = Invocation::new("greet", vec![json!("hello")]);
/// assert_eq!(invocation.method(), "greet");
///
/// invocation.resolve(json!("hi back"));
/// assert_eq!(reply.await_reply().await.unwrap(), json!("hi back"));
/// # }
/// ```
#[derive(Clone)]
pub struct Invocation {
    method: String,
    args: Vec<Value>,
    completion: Arc<Completion>,
}

impl Invocation {
    /// Build an invocation together with the caller's pending reply.
    pub fn new(method: impl Into<String>, args: Vec<Value>) -> (Self, PendingReply) {
        let (tx, rx) = oneshot::channel();
        let invocation = Self {
            method: method.into(),
            args,
            completion: Arc::new(Completion {
                tx: Mutex::new(Some(tx)),
            }),
        };
        (invocation, PendingReply { rx })
    }

    /// Build an invocation nobody is waiting on.
    ///
    /// Used for scheduled self-sends where the result is irrelevant; resolve
    /// and reject become no-ops.
    pub fn detached(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            args,
            completion: Arc::new(Completion::detached()),
        }
    }

    /// The method name the caller asked for.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The serialized call arguments.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Settle the caller's reply with a success value.
    ///
    /// A no-op when the invocation has already settled.
    pub fn resolve(&self, value: Value) {
        self.completion.settle(Ok(value));
    }

    /// Settle the caller's reply with a failure.
    ///
    /// A no-op when the invocation has already settled.
    pub fn reject(&self, error: ActorError) {
        self.completion.settle(Err(error));
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("method", &self.method)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// The caller's half of an invocation: a future for the call's result.
#[derive(Debug)]
pub struct PendingReply {
    rx: oneshot::Receiver<Result<Value, ActorError>>,
}

impl PendingReply {
    /// Wait until the invocation settles.
    ///
    /// A dropped completion (target unsubscribed, partition empty, system
    /// freed) surfaces as [`ActorError::Abandoned`].
    pub async fn await_reply(self) -> Result<Value, ActorError> {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(ActorError::Abandoned),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_resolve_settles_reply() {
        let (invocation, reply) = Invocation::new("m", vec![json!(1)]);
        invocation.resolve(json!(2));
        assert_eq!(reply.await_reply().await.unwrap(), json!(2));
    }

    #[tokio::test]
    async fn test_reject_settles_reply() {
        let (invocation, reply) = Invocation::new("m", vec![]);
        invocation.reject(ActorError::failure("boom"));
        assert_eq!(
            reply.await_reply().await.unwrap_err(),
            ActorError::failure("boom")
        );
    }

    #[tokio::test]
    async fn test_second_settle_is_noop() {
        let (invocation, reply) = Invocation::new("m", vec![]);
        invocation.resolve(json!("first"));
        invocation.reject(ActorError::failure("late"));
        assert_eq!(reply.await_reply().await.unwrap(), json!("first"));
    }

    #[tokio::test]
    async fn test_clones_share_one_completion() {
        let (invocation, reply) = Invocation::new("m", vec![]);
        let twin = invocation.clone();
        twin.resolve(json!(true));
        invocation.resolve(json!(false)); // loses the race, no-op
        assert_eq!(reply.await_reply().await.unwrap(), json!(true));
    }

    #[tokio::test]
    async fn test_dropped_invocation_abandons_caller() {
        let (invocation, reply) = Invocation::new("m", vec![]);
        drop(invocation);
        assert_eq!(reply.await_reply().await.unwrap_err(), ActorError::Abandoned);
    }

    #[tokio::test]
    async fn test_detached_settle_is_noop() {
        let invocation = Invocation::detached("tick", vec![]);
        invocation.resolve(json!(null)); // nothing listening, nothing panics
    }
}
