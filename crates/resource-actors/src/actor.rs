//! # Generic Resource Actor
//!
//! `ResourceActor<T>` is the server half of a resource kind. It owns the in-memory store of
//! every resource of that kind and processes requests one at a time, so the store needs no
//! locking.

use crate::client::ResourceClient;
use crate::entity::ManagedResource;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages every resource of kind `T`.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new()` returns the actor and its client.
/// 2.  **Wire**: pass dependencies (other clients) into `actor.run(context)`.
/// 3.  **Run**: spawn the run loop on its own task.
///
/// ```rust
/// use resource_actors::{ManagedResource, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Disk { name: String, size_gb: u32 }
/// #[derive(Debug)] struct DiskCreate { name: String, size_gb: u32 }
/// #[derive(Debug)] struct DiskUpdate { size_gb: u32 }
/// #[derive(Debug)] enum DiskAction {}
/// #[derive(Debug, thiserror::Error)] #[error("disk error")] struct DiskError;
///
/// #[async_trait]
/// impl ManagedResource for Disk {
///     type Id = String;
///     type Create = DiskCreate;
///     type Update = DiskUpdate;
///     type Action = DiskAction;
///     type ActionResult = ();
///     type Context = ();
///     type Error = DiskError;
///
///     fn id_for(params: &DiskCreate) -> String { params.name.clone() }
///     fn from_create_params(_: String, p: DiskCreate) -> Result<Self, DiskError> {
///         Ok(Self { name: p.name, size_gb: p.size_gb })
///     }
///     async fn on_update(&mut self, u: DiskUpdate, _: &()) -> Result<(), DiskError> {
///         self.size_gb = u.size_gb;
///         Ok(())
///     }
///     async fn handle_action(&mut self, _: DiskAction, _: &()) -> Result<(), DiskError> { Ok(()) }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Disk>::new(10);
///     tokio::spawn(actor.run(()));
///
///     let id = client.create(DiskCreate { name: "os".into(), size_gb: 30 }).await.unwrap();
///     assert_eq!(id, "os");
///     // Same name again is a conflict.
///     assert!(client.create(DiskCreate { name: "os".into(), size_gb: 60 }).await.is_err());
/// }
/// ```
pub struct ResourceActor<T: ManagedResource> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
}

impl<T: ManagedResource> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; clients wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the actor's event loop until every client has been dropped.
    ///
    /// The `context` is handed to every hook of every resource.
    pub async fn run(mut self, context: T::Context) {
        let resource_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(resource_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(resource_type, ?params, "Create");
                    let id = T::id_for(&params);
                    if self.store.contains_key(&id) {
                        warn!(resource_type, %id, "Already exists");
                        let _ = respond_to.send(Err(FrameworkError::Conflict(id.to_string())));
                        continue;
                    }

                    match T::from_create_params(id.clone(), params) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(resource_type, %id, error = %e, "on_create failed");
                                let _ =
                                    respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                                continue;
                            }
                            self.store.insert(id.clone(), item);
                            info!(resource_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(resource_type, %id, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(resource_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(resource_type, %id, ?update, "Update");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(resource_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    // Hooks mutate a copy so a rejected update leaves the stored state intact.
                    let mut candidate = item.clone();
                    match candidate.on_update(update, &context).await {
                        Ok(()) => {
                            *item = candidate.clone();
                            info!(resource_type, %id, "Updated");
                            let _ = respond_to.send(Ok(candidate));
                        }
                        Err(e) => {
                            warn!(resource_type, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(resource_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        warn!(resource_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(resource_type, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.remove(&id);
                    info!(resource_type, %id, size = self.store.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::List { respond_to } => {
                    let mut items: Vec<(String, T)> = self
                        .store
                        .iter()
                        .map(|(id, item)| (id.to_string(), item.clone()))
                        .collect();
                    items.sort_by(|a, b| a.0.cmp(&b.0));
                    debug!(resource_type, count = items.len(), "List");
                    let _ = respond_to.send(Ok(items.into_iter().map(|(_, item)| item).collect()));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(resource_type, %id, ?action, "Action");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(resource_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let result = item
                        .handle_action(action, &context)
                        .await
                        .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                    match &result {
                        Ok(_) => info!(resource_type, %id, "Action ok"),
                        Err(e) => warn!(resource_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(resource_type, size = self.store.len(), "Shutdown");
    }
}
