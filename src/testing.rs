//! Scripted stand-ins for the browser services.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::UserProfile;
use crate::query_cache::{CacheEvent, QueryCache};
use crate::services::{
    FileLike, Method, Navigator, RequestClient, Scheduler, Services, TaskHandle, Toast, Toaster,
};

/// Ordered record of side effects across all doubles.
#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<String>>>);

impl EventLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

#[derive(Debug, Clone)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct TestFile {
    name: String,
    size: u64,
}

impl TestFile {
    pub fn new(name: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            size,
        }
    }
}

impl FileLike for TestFile {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// Responses are scripted per (method, path). The last scripted response repeats.
#[derive(Default)]
pub struct MockClient {
    routes: RefCell<HashMap<(Method, String), VecDeque<Result<Value, ApiError>>>>,
    calls: RefCell<Vec<Call>>,
    puts: RefCell<Vec<String>>,
    put_error: RefCell<Option<ApiError>>,
    suspend: Cell<bool>,
    log: EventLog,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_log(log: EventLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    pub fn respond(&self, method: Method, path: &str, response: Result<Value, ApiError>) {
        self.routes
            .borrow_mut()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    pub fn fail_puts(&self, err: ApiError) {
        *self.put_error.borrow_mut() = Some(err);
    }

    /// Make every call yield once before resolving, so callers can observe the in-flight window.
    pub fn suspend_calls(&self) {
        self.suspend.set(true);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    pub fn puts(&self) -> Vec<String> {
        self.puts.borrow().clone()
    }

    fn next_response(&self, method: Method, path: &str) -> Result<Value, ApiError> {
        let mut routes = self.routes.borrow_mut();
        match routes.get_mut(&(method, path.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Ok(Value::Null)),
            Some(queue) => queue.front().cloned().unwrap_or(Ok(Value::Null)),
            None => Err(ApiError::Network(format!(
                "no response scripted for {} {}",
                method.as_str(),
                path
            ))),
        }
    }
}

impl RequestClient for MockClient {
    type File = TestFile;

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        self.calls.borrow_mut().push(Call {
            method,
            path: path.to_string(),
            body,
        });
        self.log.push(format!("request:{} {}", method.as_str(), path));
        if self.suspend.get() {
            tokio::task::yield_now().await;
        }
        self.next_response(method, path)
    }

    async fn put_file(&self, url: &str, _file: &TestFile) -> Result<(), ApiError> {
        self.puts.borrow_mut().push(url.to_string());
        self.log.push(format!("put:{}", url));
        if self.suspend.get() {
            tokio::task::yield_now().await;
        }
        match self.put_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct RecordingToaster {
    toasts: RefCell<Vec<Toast>>,
    log: EventLog,
}

impl RecordingToaster {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.borrow().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.toasts.borrow().iter().map(|t| t.title.clone()).collect()
    }
}

impl Toaster for RecordingToaster {
    fn show(&self, toast: Toast) {
        self.log.push(format!("toast:{}", toast.title));
        self.toasts.borrow_mut().push(toast);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nav {
    Navigate(String),
    Redirect(String),
}

#[derive(Default)]
pub struct RecordingNavigator {
    events: RefCell<Vec<Nav>>,
    log: EventLog,
}

impl RecordingNavigator {
    pub fn events(&self) -> Vec<Nav> {
        self.events.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.log.push(format!("navigate:{}", path));
        self.events.borrow_mut().push(Nav::Navigate(path.to_string()));
    }

    fn redirect(&self, url: &str) {
        self.log.push(format!("redirect:{}", url));
        self.events.borrow_mut().push(Nav::Redirect(url.to_string()));
    }
}

struct ScheduledTask {
    delay: Duration,
    task: Option<Box<dyn FnOnce()>>,
    cancelled: Rc<Cell<bool>>,
}

/// Holds scheduled tasks until the test fires them.
#[derive(Default)]
pub struct ManualScheduler {
    tasks: RefCell<Vec<ScheduledTask>>,
}

impl ManualScheduler {
    pub fn delays(&self) -> Vec<Duration> {
        self.tasks.borrow().iter().map(|t| t.delay).collect()
    }

    /// Tasks that are neither cancelled nor fired.
    pub fn pending(&self) -> usize {
        self.tasks
            .borrow()
            .iter()
            .filter(|t| t.task.is_some() && !t.cancelled.get())
            .count()
    }

    /// Fire every pending task, as if all timers elapsed.
    pub fn run_all(&self) {
        let due: Vec<Box<dyn FnOnce()>> = self
            .tasks
            .borrow_mut()
            .iter_mut()
            .filter(|t| !t.cancelled.get())
            .filter_map(|t| t.task.take())
            .collect();
        for task in due {
            task();
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle {
        let cancelled = Rc::new(Cell::new(false));
        self.tasks.borrow_mut().push(ScheduledTask {
            delay,
            task: Some(task),
            cancelled: Rc::clone(&cancelled),
        });
        TaskHandle::new(move || cancelled.set(true))
    }
}

/// A full set of doubles sharing one event log.
pub struct TestEnv {
    pub client: Rc<MockClient>,
    pub toasts: Rc<RecordingToaster>,
    pub navigator: Rc<RecordingNavigator>,
    pub scheduler: Rc<ManualScheduler>,
    pub cache: QueryCache,
    pub log: EventLog,
}

impl TestEnv {
    pub fn new() -> Self {
        let log = EventLog::default();
        let cache = QueryCache::new();
        let cache_log = log.clone();
        cache.subscribe(move |event| match event {
            CacheEvent::Invalidated(key) => cache_log.push(format!("invalidate:{}", key)),
            CacheEvent::Cleared => cache_log.push("clear"),
        });

        Self {
            client: Rc::new(MockClient::with_log(log.clone())),
            toasts: Rc::new(RecordingToaster {
                log: log.clone(),
                ..RecordingToaster::default()
            }),
            navigator: Rc::new(RecordingNavigator {
                log: log.clone(),
                ..RecordingNavigator::default()
            }),
            scheduler: Rc::new(ManualScheduler::default()),
            cache,
            log,
        }
    }

    pub fn services(&self) -> Services<MockClient> {
        Services {
            client: Rc::clone(&self.client),
            cache: self.cache.clone(),
            toasts: self.toasts.clone(),
            navigator: self.navigator.clone(),
            scheduler: self.scheduler.clone(),
            config: AppConfig::default(),
        }
    }
}

pub fn user(id: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        first_name: "Julia".to_string(),
        last_name: "Child".to_string(),
        email: Some("julia@example.com".to_string()),
        bio: None,
        profile_image_url: None,
        followers_count: Some(12),
        following_count: None,
    }
}

pub fn recipe_json(id: u32, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{} description", title),
        "cookTime": "30 min",
        "servings": "4",
        "imageUrl": null,
        "likesCount": null,
    })
}
