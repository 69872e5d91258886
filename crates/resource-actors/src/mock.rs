//! # Mock Framework & Testing Guide
//!
//! `MockClient<T>` hands out a real [`ResourceClient<T>`] whose requests are answered from a
//! queue of expectations instead of by an actor. Use it to test code that sits *around* a
//! client (typed wrappers, orchestration) without standing up the resource actors.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Speed** | Instant | Fast (involves a spawned task) |
//! | **State** | Scripted responses | Real store, real hooks |
//! | **Error Injection** | `return_err` | Requires provoking the failure |
//!
//! ## Example
//!
//! ```rust
//! use resource_actors::mock::MockClient;
//! use resource_actors::{FrameworkError, ManagedResource};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Queue { name: String }
//! #[derive(Debug)] struct QueueCreate { name: String }
//! #[derive(Debug)] struct QueueUpdate;
//! #[derive(Debug)] enum QueueAction {}
//! #[derive(Debug, thiserror::Error)] #[error("queue error")] struct QueueError;
//!
//! #[async_trait]
//! impl ManagedResource for Queue {
//!     type Id = String; type Create = QueueCreate; type Update = QueueUpdate;
//!     type Action = QueueAction; type ActionResult = (); type Context = (); type Error = QueueError;
//!     fn id_for(p: &QueueCreate) -> String { p.name.clone() }
//!     fn from_create_params(_: String, p: QueueCreate) -> Result<Self, QueueError> { Ok(Self { name: p.name }) }
//!     async fn on_update(&mut self, _: QueueUpdate, _: &()) -> Result<(), QueueError> { Ok(()) }
//!     async fn handle_action(&mut self, _: QueueAction, _: &()) -> Result<(), QueueError> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Queue>::new();
//!     mock.expect_get("jobs".to_string()).return_err(FrameworkError::ActorClosed);
//!
//!     let result = mock.client().get("jobs".to_string()).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```
//!
//! For step-by-step control use [`create_mock_client`] with the `expect_*` helpers, which
//! hand back the request payload and its responder.

use crate::client::ResourceClient;
use crate::entity::ManagedResource;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the scripted response to it.
enum Expectation<T: ManagedResource> {
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with ordered expectation tracking.
///
/// Requests must arrive in the order the expectations were registered and must target the
/// expected identifier; anything else fails the test.
pub struct MockClient<T: ManagedResource> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ManagedResource> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ManagedResource> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let pending = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = pending.lock().unwrap().pop_front();

                match (request, expectation) {
                    (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get { id: want, response })) => {
                        assert_eq!(id, want, "get targeted an unexpected resource");
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update { id: want, response }),
                    ) => {
                        assert_eq!(id, want, "update targeted an unexpected resource");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Delete { id, respond_to },
                        Some(Expectation::Delete { id: want, response }),
                    ) => {
                        assert_eq!(id, want, "delete targeted an unexpected resource");
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::List { respond_to }, Some(Expectation::List { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action { id: want, response }),
                    ) => {
                        assert_eq!(id, want, "action targeted an unexpected resource");
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn push(&self, expectation: Expectation<T>) {
        self.expectations.lock().unwrap().push_back(expectation);
    }

    /// Expects a `get` operation.
    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<'_, T, Option<T>> {
        ExpectationBuilder::new(self, move |response| Expectation::Get { id, response })
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> ExpectationBuilder<'_, T, T::Id> {
        ExpectationBuilder::new(self, |response| Expectation::Create { response })
    }

    /// Expects an `update` operation.
    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<'_, T, T> {
        ExpectationBuilder::new(self, move |response| Expectation::Update { id, response })
    }

    /// Expects a `delete` operation.
    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<'_, T, ()> {
        ExpectationBuilder::new(self, move |response| Expectation::Delete { id, response })
    }

    /// Expects a `list` operation.
    pub fn expect_list(&mut self) -> ExpectationBuilder<'_, T, Vec<T>> {
        ExpectationBuilder::new(self, |response| Expectation::List { response })
    }

    /// Expects an `action` operation.
    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<'_, T, T::ActionResult> {
        ExpectationBuilder::new(self, move |response| Expectation::Action { id, response })
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

/// Builder finishing an expectation with its scripted response.
pub struct ExpectationBuilder<'a, T: ManagedResource, R> {
    mock: &'a MockClient<T>,
    make: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + 'a>,
}

impl<'a, T: ManagedResource, R> ExpectationBuilder<'a, T, R> {
    fn new(
        mock: &'a MockClient<T>,
        make: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + 'a,
    ) -> Self {
        Self {
            mock,
            make: Box::new(make),
        }
    }

    /// Answers the request successfully with `value`.
    pub fn return_ok(self, value: R) {
        self.mock.push((self.make)(Ok(value)));
    }

    /// Answers the request with `error`.
    pub fn return_err(self, error: FrameworkError) {
        self.mock.push((self.make)(Err(error)));
    }
}

// =============================================================================
// CHANNEL-LEVEL HELPERS
// =============================================================================

/// Creates a client whose requests land on a receiver the test controls.
///
/// Useful when the test needs to inspect the request payload before answering it.
pub fn create_mock_client<T: ManagedResource>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request.
pub async fn expect_create<T: ManagedResource>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request.
pub async fn expect_update<T: ManagedResource>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Update, oneshot::Sender<Result<T, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update {
            id,
            update,
            respond_to,
        }) => Some((id, update, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request.
pub async fn expect_get<T: ManagedResource>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request.
pub async fn expect_action<T: ManagedResource>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Topic {
        name: String,
        partitions: u32,
    }

    #[derive(Debug)]
    struct TopicCreate {
        name: String,
        partitions: u32,
    }

    #[derive(Debug)]
    struct TopicUpdate {
        partitions: u32,
    }

    #[derive(Debug)]
    enum TopicAction {}

    #[derive(Debug, thiserror::Error)]
    #[error("Topic error")]
    struct TopicError;

    #[async_trait]
    impl ManagedResource for Topic {
        type Id = String;
        type Create = TopicCreate;
        type Update = TopicUpdate;
        type Action = TopicAction;
        type ActionResult = ();
        type Context = ();
        type Error = TopicError;

        fn id_for(params: &TopicCreate) -> String {
            params.name.clone()
        }

        fn from_create_params(_id: String, params: TopicCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                name: params.name,
                partitions: params.partitions,
            })
        }

        async fn on_update(&mut self, update: TopicUpdate, _ctx: &()) -> Result<(), Self::Error> {
            self.partitions = update.partitions;
            Ok(())
        }

        async fn handle_action(&mut self, _action: TopicAction, _ctx: &()) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn topic(name: &str, partitions: u32) -> Topic {
        Topic {
            name: name.to_string(),
            partitions,
        }
    }

    #[tokio::test]
    async fn test_channel_level_mock() {
        let (client, mut receiver) = create_mock_client::<Topic>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(TopicCreate {
                    name: "events".to_string(),
                    partitions: 4,
                })
                .await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.partitions, 4);
        responder.send(Ok("events".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert!(matches!(result, Ok(id) if id == "events"));
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Topic>::new();
        mock.expect_create().return_ok("events".to_string());
        mock.expect_update("events".to_string())
            .return_ok(topic("events", 8));
        mock.expect_list().return_ok(vec![topic("events", 8)]);
        mock.expect_delete("events".to_string()).return_ok(());

        let client = mock.client();
        let id = client
            .create(TopicCreate {
                name: "events".to_string(),
                partitions: 4,
            })
            .await
            .unwrap();
        let updated = client
            .update(id.clone(), TopicUpdate { partitions: 8 })
            .await
            .unwrap();
        assert_eq!(updated.partitions, 8);
        assert_eq!(client.list().await.unwrap().len(), 1);
        client.delete(id).await.unwrap();

        mock.verify();
    }

    #[tokio::test]
    async fn test_mock_client_injects_errors() {
        let mut mock = MockClient::<Topic>::new();
        mock.expect_delete("events".to_string())
            .return_err(FrameworkError::NotFound("events".to_string()));

        let result = mock.client().delete("events".to_string()).await;
        assert!(matches!(result, Err(FrameworkError::NotFound(_))));
        mock.verify();
    }
}
