//! # Generic Messages
//!
//! Message types exchanged between a `ResourceClient` and its `ResourceActor`.

use crate::entity::ManagedResource;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Request sent to a resource actor.
///
/// The variants map onto the verbs a resource manager exposes for every resource type:
///
/// - **Create**: PUT of a new resource. The identifier is derived from the payload.
/// - **Get**: read a single resource.
/// - **Update**: PATCH an existing resource. Collections inside the payload replace
///   the stored ones wholesale.
/// - **Delete**: remove a resource after its `on_delete` hook succeeds.
/// - **List**: snapshot of every resource the actor holds.
/// - **Action**: a resource-specific operation (e.g. listing keys).
#[derive(Debug)]
pub enum ResourceRequest<T: ManagedResource> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
