//! Collaborators the screens talk to. Views receive them bundled in [`Services`]
//! instead of reaching for globals, so controllers can run against test doubles.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::query_cache::QueryCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

/// A file picked by the user, before any bytes are read.
pub trait FileLike {
    fn name(&self) -> String;
    fn size(&self) -> u64;
}

/// HTTP access to the backend (with credentials) and to the object store.
#[allow(async_fn_in_trait)]
pub trait RequestClient {
    type File: FileLike;

    /// Send a JSON request to a backend path. Non-2xx responses become errors;
    /// an empty 2xx body reads as `Value::Null`.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError>;

    /// PUT raw file bytes to an absolute upload URL.
    async fn put_file(&self, url: &str, file: &Self::File) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }
}

pub trait Toaster {
    fn show(&self, toast: Toast);
}

pub trait Navigator {
    /// Client-side route change.
    fn navigate(&self, path: &str);
    /// Full page load, leaving the application.
    fn redirect(&self, url: &str);
}

/// Handle to a scheduled task. Dropping it leaves the task scheduled.
pub struct TaskHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TaskHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle for a task that cannot be cancelled (or was never scheduled).
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    /// Stop the task if it has not fired yet.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle;
}

/// Alive flag shared between a view and the async work it started.
#[derive(Debug, Clone)]
pub struct Lifetime(Rc<Cell<bool>>);

impl Lifetime {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    pub fn end(&self) {
        self.0.set(false);
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a screen needs from the outside world. Built once at startup.
pub struct Services<C> {
    pub client: Rc<C>,
    pub cache: QueryCache,
    pub toasts: Rc<dyn Toaster>,
    pub navigator: Rc<dyn Navigator>,
    pub scheduler: Rc<dyn Scheduler>,
    pub config: AppConfig,
}

impl<C> Clone for Services<C> {
    fn clone(&self) -> Self {
        Self {
            client: Rc::clone(&self.client),
            cache: self.cache.clone(),
            toasts: Rc::clone(&self.toasts),
            navigator: Rc::clone(&self.navigator),
            scheduler: Rc::clone(&self.scheduler),
            config: self.config.clone(),
        }
    }
}
