//! Test support utilities shared across unit and integration tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use crate::params::RequestParameters;
use crate::service::{Resource, ResourceService, ServiceError};

/// Records a single call made through [`ScriptedService`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ServiceCall {
    /// `list` with the parameters it received.
    List(RequestParameters),
    /// `get` for the rendered identifier.
    Get(String),
    /// `patch` for the identifier, with the patch serialised as JSON.
    Patch {
        /// Rendered identifier.
        id: String,
        /// Serialised patch body.
        body: String,
    },
    /// `create` with the request serialised as JSON.
    Create(String),
    /// `delete` for the rendered identifier.
    Delete(String),
}

/// Scripted resource service that answers from pre-seeded state.
///
/// `list` and `create` responses are returned in FIFO order. A drained list
/// queue answers with an empty list and a drained create queue reports the
/// operation as unsupported. `get` answers from the seeded entities and
/// failures, keyed by the identifier's display form, and reports unknown IDs
/// as not found.
pub struct ScriptedService<R: Resource> {
    list_responses: Rc<RefCell<VecDeque<Result<Vec<R::Entity>, ServiceError>>>>,
    entities: Rc<RefCell<BTreeMap<String, Result<R::Entity, ServiceError>>>>,
    patch_failures: Rc<RefCell<BTreeMap<String, ServiceError>>>,
    delete_failures: Rc<RefCell<BTreeMap<String, ServiceError>>>,
    create_responses: Rc<RefCell<VecDeque<Result<R::Id, ServiceError>>>>,
    calls: Rc<RefCell<Vec<ServiceCall>>>,
}

impl<R: Resource> ScriptedService<R> {
    /// Creates a service with no seeded state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the outcome of the next `list` call.
    pub fn push_list(&self, response: Result<Vec<R::Entity>, ServiceError>) {
        self.list_responses.borrow_mut().push_back(response);
    }

    /// Queues the outcome of the next `create` call.
    pub fn push_create(&self, response: Result<R::Id, ServiceError>) {
        self.create_responses.borrow_mut().push_back(response);
    }

    /// Seeds an entity returned by `get`.
    pub fn insert(&self, id: impl fmt::Display, entity: R::Entity) {
        self.entities.borrow_mut().insert(id.to_string(), Ok(entity));
    }

    /// Makes `get` fail for `id` with an opaque backend message.
    pub fn fail_get(&self, id: impl fmt::Display, message: &str) {
        self.entities
            .borrow_mut()
            .insert(id.to_string(), Err(ServiceError::Backend(message.to_owned())));
    }

    /// Makes `patch` fail for `id` with an opaque backend message.
    pub fn fail_patch(&self, id: impl fmt::Display, message: &str) {
        self.patch_failures
            .borrow_mut()
            .insert(id.to_string(), ServiceError::Backend(message.to_owned()));
    }

    /// Makes `delete` fail for `id` with an opaque backend message.
    pub fn fail_delete(&self, id: impl fmt::Display, message: &str) {
        self.delete_failures
            .borrow_mut()
            .insert(id.to_string(), ServiceError::Backend(message.to_owned()));
    }

    /// Returns a snapshot of all calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: ServiceCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl<R: Resource> Default for ScriptedService<R> {
    fn default() -> Self {
        Self {
            list_responses: Rc::default(),
            entities: Rc::default(),
            patch_failures: Rc::default(),
            delete_failures: Rc::default(),
            create_responses: Rc::default(),
            calls: Rc::default(),
        }
    }
}

impl<R: Resource> Clone for ScriptedService<R> {
    fn clone(&self) -> Self {
        Self {
            list_responses: Rc::clone(&self.list_responses),
            entities: Rc::clone(&self.entities),
            patch_failures: Rc::clone(&self.patch_failures),
            delete_failures: Rc::clone(&self.delete_failures),
            create_responses: Rc::clone(&self.create_responses),
            calls: Rc::clone(&self.calls),
        }
    }
}

impl<R: Resource> fmt::Debug for ScriptedService<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedService")
            .field("kind", &R::KIND)
            .field("calls", &self.calls.borrow().len())
            .finish_non_exhaustive()
    }
}

impl<R: Resource> ResourceService<R> for ScriptedService<R> {
    fn list(&self, params: &RequestParameters) -> Result<Vec<R::Entity>, ServiceError> {
        self.record(ServiceCall::List(params.clone()));
        self.list_responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn get(&self, id: &R::Id) -> Result<R::Entity, ServiceError> {
        let key = id.to_string();
        self.record(ServiceCall::Get(key.clone()));
        self.entities
            .borrow()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(ServiceError::not_found::<R>(&key)))
    }

    fn patch(&self, id: &R::Id, patch: &R::Patch) -> Result<(), ServiceError> {
        let key = id.to_string();
        self.record(ServiceCall::Patch {
            id: key.clone(),
            body: serde_json::to_string(patch).unwrap_or_default(),
        });
        match self.patch_failures.borrow().get(&key) {
            Some(err) => Err(err.clone()),
            None if self.entities.borrow().contains_key(&key) => Ok(()),
            None => Err(ServiceError::not_found::<R>(&key)),
        }
    }

    fn create(&self, request: &R::Create) -> Result<R::Id, ServiceError> {
        self.record(ServiceCall::Create(
            serde_json::to_string(request).unwrap_or_default(),
        ));
        self.create_responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ServiceError::Unsupported {
                    kind: R::KIND.to_owned(),
                    operation: String::from("create"),
                })
            })
    }

    fn delete(&self, id: &R::Id) -> Result<(), ServiceError> {
        let key = id.to_string();
        self.record(ServiceCall::Delete(key.clone()));
        if let Some(err) = self.delete_failures.borrow().get(&key) {
            return Err(err.clone());
        }
        self.entities
            .borrow_mut()
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found::<R>(&key))
    }
}
