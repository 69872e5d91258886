use async_trait::async_trait;
use resource_actors::{
    FrameworkError, ManagedResource, Operation, OperationStatus, ResourceActor, ResourceClient,
    WaitUntil,
};
use std::time::Duration;

// --- Test Resources: a folder that owns files ---

#[derive(Clone, Debug, PartialEq)]
struct File {
    folder: String,
    name: String,
    size: u64,
}

#[derive(Debug)]
struct FileCreate {
    folder: String,
    name: String,
    size: u64,
}

#[derive(Debug)]
struct FileUpdate {
    size: u64,
}

#[derive(Debug)]
enum FileAction {
    Size,
}

#[derive(Debug, thiserror::Error)]
#[error("file error")]
struct FileError;

#[async_trait]
impl ManagedResource for File {
    type Id = String;
    type Create = FileCreate;
    type Update = FileUpdate;
    type Action = FileAction;
    type ActionResult = u64;
    type Context = ();
    type Error = FileError;

    fn id_for(params: &FileCreate) -> String {
        format!("{}/{}", params.folder, params.name)
    }

    fn from_create_params(_id: String, params: FileCreate) -> Result<Self, FileError> {
        Ok(Self {
            folder: params.folder,
            name: params.name,
            size: params.size,
        })
    }

    async fn on_update(&mut self, update: FileUpdate, _ctx: &()) -> Result<(), FileError> {
        self.size = update.size;
        Ok(())
    }

    async fn handle_action(&mut self, action: FileAction, _ctx: &()) -> Result<u64, FileError> {
        match action {
            FileAction::Size => Ok(self.size),
        }
    }
}

#[derive(Clone, Debug)]
struct Folder {
    name: String,
}

#[derive(Debug)]
struct FolderCreate {
    name: String,
}

#[derive(Debug)]
struct FolderUpdate;

#[derive(Debug)]
enum FolderAction {}

#[derive(Debug, thiserror::Error)]
#[error("folder cascade failed: {0}")]
struct FolderError(String);

#[async_trait]
impl ManagedResource for Folder {
    type Id = String;
    type Create = FolderCreate;
    type Update = FolderUpdate;
    type Action = FolderAction;
    type ActionResult = ();
    type Context = ResourceClient<File>;
    type Error = FolderError;

    fn id_for(params: &FolderCreate) -> String {
        params.name.clone()
    }

    fn from_create_params(_id: String, params: FolderCreate) -> Result<Self, FolderError> {
        Ok(Self { name: params.name })
    }

    async fn on_update(&mut self, _: FolderUpdate, _: &Self::Context) -> Result<(), FolderError> {
        Ok(())
    }

    async fn on_delete(&self, files: &Self::Context) -> Result<(), FolderError> {
        let owned = files
            .list()
            .await
            .map_err(|e| FolderError(e.to_string()))?
            .into_iter()
            .filter(|f| f.folder == self.name);
        for file in owned {
            files
                .delete(format!("{}/{}", file.folder, file.name))
                .await
                .map_err(|e| FolderError(e.to_string()))?;
        }
        Ok(())
    }

    async fn handle_action(&mut self, _: FolderAction, _: &Self::Context) -> Result<(), FolderError> {
        Ok(())
    }
}

fn file(folder: &str, name: &str, size: u64) -> FileCreate {
    FileCreate {
        folder: folder.to_string(),
        name: name.to_string(),
        size,
    }
}

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::<File>::new(10);
    tokio::spawn(actor.run(()));

    let id = client.create(file("docs", "a.txt", 10)).await.unwrap();
    assert_eq!(id, "docs/a.txt");

    let size = client.perform_action(id.clone(), FileAction::Size).await.unwrap();
    assert_eq!(size, 10);

    let updated = client.update(id.clone(), FileUpdate { size: 42 }).await.unwrap();
    assert_eq!(updated.size, 42);

    client.delete(id.clone()).await.unwrap();
    assert!(client.get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_parent_delete_cascades_through_context() {
    let (file_actor, files) = ResourceActor::<File>::new(10);
    let (folder_actor, folders) = ResourceActor::<Folder>::new(10);
    tokio::spawn(file_actor.run(()));
    tokio::spawn(folder_actor.run(files.clone()));

    folders
        .create(FolderCreate {
            name: "docs".to_string(),
        })
        .await
        .unwrap();
    files.create(file("docs", "a.txt", 1)).await.unwrap();
    files.create(file("docs", "b.txt", 2)).await.unwrap();
    files.create(file("pics", "c.png", 3)).await.unwrap();

    folders.delete("docs".to_string()).await.unwrap();

    let remaining = files.list().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].folder, "pics");
}

#[tokio::test]
async fn test_operation_wraps_actor_calls() {
    let (actor, client) = ResourceActor::<File>::new(10);
    tokio::spawn(actor.run(()));

    let create_client = client.clone();
    let op: Operation<String, FrameworkError> = Operation::start(
        WaitUntil::Completed,
        Duration::from_millis(1),
        async move { create_client.create(file("docs", "a.txt", 5)).await },
    )
    .await;
    assert_eq!(op.status(), OperationStatus::Succeeded);
    assert_eq!(op.wait().await.unwrap(), "docs/a.txt");

    let dup_client = client.clone();
    let dup: Operation<String, FrameworkError> = Operation::start(
        WaitUntil::Started,
        Duration::ZERO,
        async move { dup_client.create(file("docs", "a.txt", 9)).await },
    )
    .await;
    assert!(matches!(dup.wait().await, Err(FrameworkError::Conflict(_))));
}

#[tokio::test]
async fn test_dropped_actor_reports_closed() {
    let (actor, client) = ResourceActor::<File>::new(10);
    drop(actor);
    let result = client.get("docs/a.txt".to_string()).await;
    assert!(matches!(result, Err(FrameworkError::ActorClosed)));
}
