//! Scripted platform fakes shared by the integration tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use async_trait::async_trait;
use fos_push::platform::*;
use fos_push::*;
use fos_push_store::{Database, Namespace, OpenedDatabase};
use serde_json::Value;

pub const APP_ID: &str = "app-1";
pub const PAGE_URL: &str = "https://site.test/shop";
pub const SCOPE: &str = "https://site.test/";
pub const PRIMARY: &str = "https://site.test/FosPushSDKWorker.js";
pub const UPDATER: &str = "https://site.test/FosPushSDKUpdaterWorker.js";

// ============================================================================
// TRANSPORT
// ============================================================================

/// Transport answering by method and path fragment, recording every request
#[derive(Default)]
pub struct ScriptedTransport {
    routes: RefCell<Vec<(Method, String, u16, String)>>,
    sent: RefCell<Vec<Request>>,
    /// Live guard count of the watched event, sampled on every request
    pub guards_seen: RefCell<Vec<usize>>,
    watched: RefCell<Option<Rc<Cell<usize>>>>,
}

impl ScriptedTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Answer `method` requests whose URL contains `path`
    pub fn reply(&self, method: Method, path: &str, status: u16, body: Value) {
        self.routes
            .borrow_mut()
            .push((method, path.to_string(), status, body.to_string()));
    }

    /// Sample `event`'s live guards on every request
    pub fn watch(&self, event: &CountingEvent) {
        *self.watched.borrow_mut() = Some(event.held.clone());
    }

    pub fn sent(&self) -> Vec<Request> {
        self.sent.borrow().clone()
    }

    /// `METHOD path` of each request, relative to the API root
    pub fn calls(&self) -> Vec<String> {
        self.sent
            .borrow()
            .iter()
            .map(|r| {
                let path = r.url.strip_prefix(DEFAULT_API_BASE).unwrap_or(&r.url);
                format!("{} {}", r.method, path)
            })
            .collect()
    }

    /// JSON body of the last request to `path`
    pub fn body_of(&self, method: Method, path: &str) -> Option<Value> {
        self.sent
            .borrow()
            .iter()
            .rev()
            .find(|r| r.method == method && r.url.contains(path))
            .and_then(Request::json_body)
    }
}

#[async_trait(?Send)]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: Request) -> Result<Response, NetError> {
        if let Some(held) = self.watched.borrow().as_ref() {
            self.guards_seen.borrow_mut().push(held.get());
        }
        let reply = self
            .routes
            .borrow()
            .iter()
            .find(|(method, path, _, _)| *method == request.method && request.url.contains(path.as_str()))
            .map(|(_, _, status, body)| (*status, body.clone()));
        self.sent.borrow_mut().push(request);

        match reply {
            Some((status, body)) => Ok(Response::new(status, body.into_bytes())),
            None => Err(NetError::Network("no route".into())),
        }
    }
}

// ============================================================================
// STORE
// ============================================================================

/// Engine whose reads hand the scheduler back before returning their value
pub struct SlowEngine {
    inner: MemoryEngine,
    yields: usize,
}

impl SlowEngine {
    pub fn new(inner: MemoryEngine, yields: usize) -> Rc<Self> {
        Rc::new(Self { inner, yields })
    }
}

#[async_trait(?Send)]
impl StoreEngine for SlowEngine {
    async fn open(&self, name: &str, version: u32) -> Result<OpenedDatabase, StoreError> {
        let opened = self.inner.open(name, version).await?;
        Ok(OpenedDatabase {
            database: Rc::new(SlowDatabase {
                inner: opened.database,
                yields: self.yields,
            }),
            previous_version: opened.previous_version,
        })
    }
}

struct SlowDatabase {
    inner: Rc<dyn Database>,
    yields: usize,
}

#[async_trait(?Send)]
impl Database for SlowDatabase {
    fn has_namespace(&self, namespace: Namespace) -> bool {
        self.inner.has_namespace(namespace)
    }

    async fn create_namespace(&self, namespace: Namespace, key_path: &str) -> Result<(), StoreError> {
        self.inner.create_namespace(namespace, key_path).await
    }

    async fn get(&self, namespace: Namespace, key: &str) -> Result<Option<Value>, StoreError> {
        let value = self.inner.get(namespace, key).await;
        for _ in 0..self.yields {
            smol::future::yield_now().await;
        }
        value
    }

    async fn put(&self, namespace: Namespace, record: Value) -> Result<(), StoreError> {
        self.inner.put(namespace, record).await
    }

    async fn delete(&self, namespace: Namespace, key: &str) -> Result<(), StoreError> {
        self.inner.delete(namespace, key).await
    }
}

// ============================================================================
// PAGE SIDE
// ============================================================================

pub struct FakeHost {
    pub url: RefCell<String>,
    pub title: RefCell<String>,
    pub visibility: Cell<VisibilityState>,
    pub markers: RefCell<HashSet<String>>,
}

impl FakeHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            url: RefCell::new(PAGE_URL.to_string()),
            title: RefCell::new("Shop".to_string()),
            visibility: Cell::new(VisibilityState::Visible),
            markers: RefCell::new(HashSet::new()),
        })
    }
}

impl PageHost for FakeHost {
    fn url(&self) -> String {
        self.url.borrow().clone()
    }

    fn title(&self) -> String {
        self.title.borrow().clone()
    }

    fn visibility(&self) -> VisibilityState {
        self.visibility.get()
    }

    fn session_marker(&self, key: &str) -> bool {
        self.markers.borrow().contains(key)
    }

    fn set_session_marker(&self, key: &str) {
        self.markers.borrow_mut().insert(key.to_string());
    }
}

/// State shared by the fake container and the registrations it hands out
#[derive(Default)]
pub struct WorkerLog {
    pub events: RefCell<Vec<String>>,
    pub subscription: RefCell<Option<PushSubscription>>,
    pub subscribe_fails: Cell<bool>,
}

impl WorkerLog {
    fn push(&self, event: String) {
        self.events.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

pub struct FakeRegistration {
    pub active: Option<String>,
    pub installing: bool,
    log: Rc<WorkerLog>,
}

impl FakeRegistration {
    pub fn new(active: Option<&str>, installing: bool, log: Rc<WorkerLog>) -> Rc<Self> {
        Rc::new(Self {
            active: active.map(str::to_string),
            installing,
            log,
        })
    }
}

#[async_trait(?Send)]
impl WorkerRegistration for FakeRegistration {
    fn scope(&self) -> String {
        SCOPE.to_string()
    }

    fn active_script_url(&self) -> Option<String> {
        self.active.clone()
    }

    fn is_installing(&self) -> bool {
        self.installing
    }

    async fn unregister(&self) -> Result<bool, PlatformError> {
        self.log.push("unregister".into());
        Ok(true)
    }

    async fn subscribe(&self) -> Result<Option<PushSubscription>, PlatformError> {
        self.log.push("subscribe".into());
        if self.log.subscribe_fails.get() {
            return Err(PlatformError::Rejected("subscribe".into()));
        }
        Ok(self.log.subscription.borrow().clone())
    }
}

pub struct FakeContainer {
    pub supported: Cell<bool>,
    pub push: Cell<bool>,
    pub notifications: Cell<bool>,
    pub permission: Cell<NotificationPermission>,
    pub current: RefCell<Option<Rc<FakeRegistration>>>,
    pub log: Rc<WorkerLog>,
}

impl FakeContainer {
    pub fn new() -> Rc<Self> {
        let log = Rc::new(WorkerLog::default());
        *log.subscription.borrow_mut() = Some(PushSubscription {
            endpoint: "https://push.test/send/R1".into(),
            subscription_id: Some("R1".into()),
        });
        Rc::new(Self {
            supported: Cell::new(true),
            push: Cell::new(true),
            notifications: Cell::new(true),
            permission: Cell::new(NotificationPermission::Granted),
            current: RefCell::new(None),
            log,
        })
    }

    /// Pretend `script` is already the active worker
    pub fn with_active(&self, script: &str) {
        *self.current.borrow_mut() = Some(FakeRegistration::new(Some(script), false, self.log.clone()));
    }
}

#[async_trait(?Send)]
impl WorkerContainer for FakeContainer {
    fn is_supported(&self) -> bool {
        self.supported.get()
    }

    fn push_supported(&self) -> bool {
        self.push.get()
    }

    fn notifications_supported(&self) -> bool {
        self.notifications.get()
    }

    fn permission(&self) -> NotificationPermission {
        self.permission.get()
    }

    async fn registration(&self) -> Result<Option<Rc<dyn WorkerRegistration>>, PlatformError> {
        Ok(self
            .current
            .borrow()
            .clone()
            .map(|r| r as Rc<dyn WorkerRegistration>))
    }

    async fn register(&self, script_url: &str) -> Result<Rc<dyn WorkerRegistration>, PlatformError> {
        self.log.push(format!("register {}", script_url));
        let registration = FakeRegistration::new(Some(script_url), false, self.log.clone());
        *self.current.borrow_mut() = Some(registration.clone());
        Ok(registration)
    }

    async fn ready(&self) -> Rc<dyn WorkerRegistration> {
        match self.current.borrow().clone() {
            Some(registration) => registration,
            None => FakeRegistration::new(None, false, self.log.clone()),
        }
    }
}

pub fn descriptor() -> Rc<StaticDescriptor> {
    Rc::new(StaticDescriptor {
        language: Some("fr-FR".into()),
        utc_offset_seconds: 7200,
        device_model: "Linux x86_64 Firefox".into(),
        device_os: "128".into(),
    })
}

/// Page context over fresh fakes
pub struct PageHarness {
    pub ctx: PageContext,
    pub host: Rc<FakeHost>,
    pub workers: Rc<FakeContainer>,
    pub transport: Rc<ScriptedTransport>,
    pub store: MemoryEngine,
}

impl PageHarness {
    pub fn new() -> Self {
        Self::with_store(MemoryEngine::new())
    }

    /// Page context over an existing store, as on a later page load
    pub fn with_store(store: MemoryEngine) -> Self {
        Self::with_config(store, SdkConfig::default())
    }

    pub fn with_config(store: MemoryEngine, config: SdkConfig) -> Self {
        let engine = Rc::new(store.clone());
        Self::with_engine(store, engine, config)
    }

    /// Page context reading `store` through `engine`
    pub fn with_engine(store: MemoryEngine, engine: Rc<dyn StoreEngine>, config: SdkConfig) -> Self {
        let host = FakeHost::new();
        let workers = FakeContainer::new();
        let transport = ScriptedTransport::new();
        let ctx = PageContext::new(
            config,
            PagePlatform {
                host: host.clone(),
                workers: workers.clone(),
                descriptor: descriptor(),
                store: engine,
                transport: transport.clone(),
            },
        )
        .unwrap();

        Self {
            ctx,
            host,
            workers,
            transport,
            store,
        }
    }

    /// Initialize with default options
    pub fn init(self) -> Self {
        self.ctx.init(InitOptions::new(APP_ID)).unwrap();
        self
    }
}

// ============================================================================
// WORKER SIDE
// ============================================================================

pub struct FakeWindow {
    pub url: String,
    pub focusable: bool,
    pub focused: Cell<bool>,
    pub messages: RefCell<Vec<NotificationPayload>>,
}

impl FakeWindow {
    pub fn new(url: &str, focusable: bool) -> Rc<Self> {
        Rc::new(Self {
            url: url.to_string(),
            focusable,
            focused: Cell::new(false),
            messages: RefCell::new(Vec::new()),
        })
    }
}

impl WindowClient for FakeWindow {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn can_focus(&self) -> bool {
        self.focusable
    }

    fn focus(&self) {
        self.focused.set(true);
    }

    fn post_message(&self, payload: &NotificationPayload) {
        self.messages.borrow_mut().push(payload.clone());
    }
}

pub struct FakeGlobal {
    pub script: String,
    pub shown: RefCell<Vec<DisplayRequest>>,
    pub windows: RefCell<Vec<Rc<FakeWindow>>>,
    pub opened: RefCell<Vec<String>>,
    /// Live guard count of the watched event, sampled on every platform call
    pub guards_seen: RefCell<Vec<usize>>,
    watched: RefCell<Option<Rc<Cell<usize>>>>,
}

impl FakeGlobal {
    pub fn new(script: &str) -> Rc<Self> {
        Rc::new(Self {
            script: script.to_string(),
            shown: RefCell::new(Vec::new()),
            windows: RefCell::new(Vec::new()),
            opened: RefCell::new(Vec::new()),
            guards_seen: RefCell::new(Vec::new()),
            watched: RefCell::new(None),
        })
    }

    /// Sample `event`'s live guards whenever the worker touches the platform
    pub fn watch(&self, event: &CountingEvent) {
        *self.watched.borrow_mut() = Some(event.held.clone());
    }

    fn sample(&self) {
        if let Some(held) = self.watched.borrow().as_ref() {
            self.guards_seen.borrow_mut().push(held.get());
        }
    }
}

#[async_trait(?Send)]
impl WorkerGlobal for FakeGlobal {
    fn scope(&self) -> String {
        SCOPE.to_string()
    }

    fn script_url(&self) -> String {
        self.script.clone()
    }

    fn show_notification(&self, request: DisplayRequest) {
        self.sample();
        self.shown.borrow_mut().push(request);
    }

    async fn match_windows(&self) -> Vec<Rc<dyn WindowClient>> {
        self.sample();
        self.windows
            .borrow()
            .iter()
            .map(|w| w.clone() as Rc<dyn WindowClient>)
            .collect()
    }

    async fn open_window(&self, url: &str) -> Result<(), PlatformError> {
        self.sample();
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

pub struct FakeNotification {
    pub tag: String,
    pub closed: Cell<bool>,
}

impl FakeNotification {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            closed: Cell::new(false),
        }
    }
}

impl ActivatedNotification for FakeNotification {
    fn tag(&self) -> String {
        self.tag.clone()
    }

    fn close(&self) {
        self.closed.set(true);
    }
}

/// Event counting live lifetime guards
#[derive(Default)]
pub struct CountingEvent {
    pub extended: Cell<usize>,
    pub held: Rc<Cell<usize>>,
}

impl ExtendableEvent for CountingEvent {
    fn extend_lifetime(&self) -> LifetimeGuard {
        self.extended.set(self.extended.get() + 1);
        self.held.set(self.held.get() + 1);
        let held = self.held.clone();
        LifetimeGuard::new(move || held.set(held.get() - 1))
    }
}

/// Worker context over fresh fakes
pub struct WorkerHarness {
    pub ctx: WorkerContext,
    pub global: Rc<FakeGlobal>,
    pub transport: Rc<ScriptedTransport>,
    pub store: MemoryEngine,
}

impl WorkerHarness {
    pub fn new(store: MemoryEngine) -> Self {
        Self::with_script(store, PRIMARY)
    }

    pub fn with_script(store: MemoryEngine, script: &str) -> Self {
        let global = FakeGlobal::new(script);
        let transport = ScriptedTransport::new();
        let ctx = WorkerContext::new(
            SdkConfig::default(),
            WorkerPlatform {
                global: global.clone(),
                descriptor: descriptor(),
                store: Rc::new(store.clone()),
                transport: transport.clone(),
            },
        )
        .unwrap();

        Self {
            ctx,
            global,
            transport,
            store,
        }
    }
}

/// Seed identity records the way a previous registration would have
pub fn seed_id(store: &MemoryEngine, key: IdKey, value: Value) {
    store.insert_raw(
        fos_push_store::DEFAULT_DB_NAME,
        fos_push_store::Namespace::Ids,
        key.as_str(),
        serde_json::json!({ "key": key.as_str(), "value": value }),
    );
}

pub fn seed_option(store: &MemoryEngine, key: OptionKey, value: &str) {
    store.insert_raw(
        fos_push_store::DEFAULT_DB_NAME,
        fos_push_store::Namespace::Options,
        key.as_str(),
        serde_json::json!({ "key": key.as_str(), "value": value }),
    );
}
