use std::collections::HashMap;
use std::hash::Hash;
use std::fmt::{Debug, Display};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Params, and Actions)
// =============================================================================

/// Trait that any domain entity must implement to be managed by ResourceActor
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Ord + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;
    type Error: std::error::Error + Clone + Send + Sync + 'static;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from a freshly generated ID and the creation params
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> { Ok(()) }

    /// Applies a patch. Implementations must leave `self` untouched when they fail.
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;

    // --- Action Handler ---

    /// Handle a custom domain-specific action. Must be all-or-nothing.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

/// Errors reported by the framework itself, wrapping the entity's own error.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError<E> {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    AlreadyExists(String),
    #[error("{0}")]
    Entity(E),
    #[error("Actor does not generate ids")]
    NoIdSource,
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<Result<T, FrameworkError<E>>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T::Id, T::Error>,
    },
    /// Stores an already-identified item, e.g. a record loaded from persistence.
    Insert {
        item: T,
        respond_to: Response<(), T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    List {
        respond_to: Response<Vec<T>, T::Error>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T, T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// Single owner of a `HashMap` of entities. Every request is handled to
/// completion before the next one is received, so each message is atomic
/// with respect to concurrent clients.
pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Option<Box<dyn Fn() -> T::Id + Send + Sync>>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        Self::build(buffer_size, Some(Box::new(next_id_fn)))
    }

    /// Actor for records that arrive with their own ids. Items only enter
    /// through `Insert`; `Create` is refused with `NoIdSource`.
    pub fn with_supplied_ids(buffer_size: usize) -> (Self, ResourceClient<T>) {
        Self::build(buffer_size, None)
    }

    fn build(
        buffer_size: usize,
        next_id_fn: Option<Box<dyn Fn() -> T::Id + Send + Sync>>,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    #[instrument(name = "resource_actor", skip(self), fields(entity = std::any::type_name::<T>()))]
    pub async fn run(mut self) {
        info!("ResourceActor starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params));
                }
                ResourceRequest::Insert { item, respond_to } => {
                    let _ = respond_to.send(self.handle_insert(item));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    let mut items: Vec<T> = self.store.values().cloned().collect();
                    items.sort_by(|a, b| a.id().cmp(b.id()));
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, patch));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let _ = respond_to.send(self.handle_action(id, action));
                }
            }
        }

        info!(items = self.store.len(), "ResourceActor stopped");
    }

    fn handle_create(&mut self, params: T::CreateParams) -> Result<T::Id, FrameworkError<T::Error>> {
        let next_id = self.next_id_fn.as_ref().ok_or(FrameworkError::NoIdSource)?;
        let id = next_id();
        if self.store.contains_key(&id) {
            warn!(id = %id, "Generated id collides with a stored item");
            return Err(FrameworkError::AlreadyExists(id.to_string()));
        }
        let mut item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Entity)?;
        item.on_create().map_err(FrameworkError::Entity)?;
        self.store.insert(id.clone(), item);
        debug!(id = %id, "Item created");
        Ok(id)
    }

    fn handle_insert(&mut self, mut item: T) -> Result<(), FrameworkError<T::Error>> {
        let id = item.id().clone();
        if self.store.contains_key(&id) {
            return Err(FrameworkError::AlreadyExists(id.to_string()));
        }
        item.on_create().map_err(FrameworkError::Entity)?;
        self.store.insert(id, item);
        Ok(())
    }

    fn handle_update(&mut self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError<T::Error>> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_update(patch).map_err(FrameworkError::Entity)?;
        Ok(item.clone())
    }

    fn handle_action(&mut self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError<T::Error>> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.handle_action(action).map_err(FrameworkError::Entity)
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub(crate) fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T::Id, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn insert(&self, item: T) -> Result<(), FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Insert { item, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::List { respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: String,
        value: u32,
    }

    #[derive(Debug)]
    struct CounterCreate {
        start: u32,
    }

    #[derive(Debug, Clone, Error, PartialEq)]
    enum CounterError {
        #[error("counter would underflow")]
        Underflow,
    }

    #[derive(Debug)]
    enum CounterAction {
        Take(u32),
    }

    impl Entity for Counter {
        type Id = String;
        type CreateParams = CounterCreate;
        type Patch = u32;
        type Action = CounterAction;
        type ActionResult = u32;
        type Error = CounterError;

        fn id(&self) -> &String { &self.id }

        fn from_create_params(id: String, params: CounterCreate) -> Result<Self, CounterError> {
            Ok(Self { id, value: params.start })
        }

        fn on_update(&mut self, patch: u32) -> Result<(), CounterError> {
            self.value = patch;
            Ok(())
        }

        fn handle_action(&mut self, action: CounterAction) -> Result<u32, CounterError> {
            match action {
                CounterAction::Take(n) => {
                    self.value = self.value.checked_sub(n).ok_or(CounterError::Underflow)?;
                    Ok(self.value)
                }
            }
        }
    }

    fn spawn_counters() -> ResourceClient<Counter> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || format!("counter_{}", counter.fetch_add(1, Ordering::SeqCst));
        let (actor, client) = ResourceActor::new(10, next_id);
        tokio::spawn(actor.run());
        client
    }

    // --- Test ---

    #[tokio::test]
    async fn test_resource_actor_with_actions() {
        let client = spawn_counters();

        let id = client.create(CounterCreate { start: 5 }).await.unwrap();
        assert_eq!(id, "counter_1");

        let left = client.perform_action(id.clone(), CounterAction::Take(3)).await.unwrap();
        assert_eq!(left, 2);

        let err = client.perform_action(id.clone(), CounterAction::Take(3)).await.unwrap_err();
        assert_eq!(err, FrameworkError::Entity(CounterError::Underflow));

        let counter = client.get(id.clone()).await.unwrap().unwrap();
        assert_eq!(counter.value, 2);
    }

    #[tokio::test]
    async fn test_missing_items_report_not_found() {
        let client = spawn_counters();

        assert_eq!(client.get("nope".to_string()).await.unwrap(), None);
        assert_eq!(
            client.update("nope".to_string(), 1).await.unwrap_err(),
            FrameworkError::NotFound("nope".to_string())
        );
        assert_eq!(
            client.perform_action("nope".to_string(), CounterAction::Take(1)).await.unwrap_err(),
            FrameworkError::NotFound("nope".to_string())
        );
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates_and_list_is_sorted() {
        let client = spawn_counters();

        client.insert(Counter { id: "b".into(), value: 1 }).await.unwrap();
        client.insert(Counter { id: "a".into(), value: 2 }).await.unwrap();
        let err = client.insert(Counter { id: "a".into(), value: 9 }).await.unwrap_err();
        assert_eq!(err, FrameworkError::AlreadyExists("a".to_string()));

        let ids: Vec<String> = client.list().await.unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_supplied_id_actor_refuses_create() {
        let (actor, client) = ResourceActor::<Counter>::with_supplied_ids(4);
        tokio::spawn(actor.run());

        let err = client.create(CounterCreate { start: 1 }).await.unwrap_err();
        assert_eq!(err, FrameworkError::NoIdSource);

        client.insert(Counter { id: "given".into(), value: 3 }).await.unwrap();
        assert_eq!(client.perform_action("given".to_string(), CounterAction::Take(1)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_closed_actor_is_reported() {
        let (actor, client) = ResourceActor::<Counter>::new(1, || "x".to_string());
        drop(actor);

        let err = client.get("x".to_string()).await.unwrap_err();
        assert_eq!(err, FrameworkError::ActorClosed);
    }
}
