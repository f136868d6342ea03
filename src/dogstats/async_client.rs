use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, warn};

use super::client::{Client, Request};
use super::encoder::{EventFields, MetricType, MetricValue};
use super::options::ClientOptions;
use super::writer::{UdpSocketWriter, Writer};
use crate::MetricResult;

/// Completion counter shared by scheduled sends.
///
/// Each [`SendTask`] registers itself when it is created and signals completion
/// once its write attempt is over, whether it succeeded or failed. A task that
/// is dropped without running also signals completion, so [`SendGroup::wait`]
/// never hangs on work that will not happen.
///
/// Errors of scheduled sends never reach the caller. They are logged and
/// counted in [`SendGroup::failures`].
#[derive(Clone, Default)]
pub struct SendGroup {
    inner: Arc<GroupInner>,
}

#[derive(Default)]
struct GroupInner {
    pending: Mutex<usize>,
    zero: Condvar,
    failures: AtomicU64,
}

impl SendGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until every registered task has completed.
    ///
    /// This is a synchronization point only: a completed UDP send may still be
    /// dropped on the way to the agent.
    pub fn wait(&self) {
        let mut pending = self.inner.pending.lock();
        while *pending > 0 {
            self.inner.zero.wait(&mut pending);
        }
    }

    /// Number of registered tasks that have not completed yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        *self.inner.pending.lock()
    }

    /// Number of tasks in this group whose send failed.
    #[must_use]
    pub fn failures(&self) -> u64 {
        self.inner.failures.load(Ordering::Relaxed)
    }

    fn register(&self) -> Completion {
        *self.inner.pending.lock() += 1;
        Completion {
            group: self.clone(),
        }
    }

    fn done(&self) {
        let mut pending = self.inner.pending.lock();
        if *pending == 0 {
            error!("send group completed more tasks than were registered");
            return;
        }
        *pending -= 1;
        if *pending == 0 {
            self.inner.zero.notify_all();
        }
    }
}

impl std::fmt::Debug for SendGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendGroup")
            .field("pending", &self.pending())
            .field("failures", &self.failures())
            .finish()
    }
}

/// Signals completion to its group when dropped, including during unwinding.
struct Completion {
    group: SendGroup,
}

impl Completion {
    fn fail(&self) {
        self.group.inner.failures.fetch_add(1, Ordering::Relaxed);
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.group.done();
    }
}

type Job = Box<dyn FnOnce() -> MetricResult<()> + Send + 'static>;

/// A send waiting to be launched.
///
/// The caller decides how it runs: [`SendTask::spawn`] runs it on a new
/// thread, [`SendTask::run`] runs it on the current one, and the task can be
/// handed to any executor as a plain `FnOnce`.
#[must_use = "a send task does nothing until it is run or spawned"]
pub struct SendTask {
    job: Job,
    completion: Completion,
}

impl SendTask {
    fn new(group: &SendGroup, job: Job) -> Self {
        Self {
            completion: group.register(),
            job,
        }
    }

    /// Performs the send and signals completion. Errors are logged and counted
    /// on the group, not returned.
    pub fn run(self) {
        let Self { job, completion } = self;
        if let Err(err) = job() {
            warn!("Scheduled send failed: {err}");
            completion.fail();
        }
    }

    /// Runs the task on a newly spawned thread.
    pub fn spawn(self) -> JoinHandle<()> {
        std::thread::spawn(move || self.run())
    }
}

impl std::fmt::Debug for SendTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendTask").finish_non_exhaustive()
    }
}

/// Fire-and-forget `DogStatsD` client.
///
/// Every send method packages the same encode, guard and write steps as
/// [`Client`] into a [`SendTask`] registered with the given [`SendGroup`]. The
/// caller launches the task and, when it needs a synchronization point, waits
/// on the group. No ordering is guaranteed between tasks.
///
/// # Example
///
/// ```no_run
/// use rylv_dogstatsd::{AsyncClient, NO_TAGS};
///
/// let client = AsyncClient::new_default()?;
/// let group = client.group();
///
/// client.gauge("example.gauge", 1, NO_TAGS, group).spawn();
/// client.event("example event", "something happened", None, NO_TAGS, group).spawn();
///
/// group.wait();
/// # Ok::<(), rylv_dogstatsd::MetricsError>(())
/// ```
pub struct AsyncClient<W: Writer = UdpSocketWriter> {
    shared: Arc<Shared<W>>,
    group: SendGroup,
}

/// The client as held by the handle and by every scheduled task.
///
/// When the handle is closed while tasks still hold it, the last holder to
/// drop it closes the transport.
struct Shared<W: Writer> {
    client: Client<W>,
    close_on_drop: AtomicBool,
}

impl<W: Writer> Drop for Shared<W> {
    fn drop(&mut self) {
        if self.close_on_drop.load(Ordering::Acquire) {
            debug!("closing dogstatsd client after its last pending task");
            if let Err(err) = self.client.writer().close() {
                warn!("Deferred transport close failed: {err}");
            }
        }
    }
}

impl AsyncClient<UdpSocketWriter> {
    /// Creates a client sending to `host:port` over UDP.
    ///
    /// # Errors
    /// Returns an error if the address cannot be resolved or the socket cannot be bound.
    pub fn new(host: &str, port: u16, auto_truncate: bool) -> MetricResult<Self> {
        Ok(Self::from_client(Client::new(host, port, auto_truncate)?))
    }

    /// Creates a client for the local agent with [`ClientOptions::default`].
    ///
    /// # Errors
    /// Returns an error if the socket cannot be bound.
    pub fn new_default() -> MetricResult<Self> {
        Ok(Self::from_client(Client::new_default()?))
    }

    /// Creates a UDP client from `options`.
    ///
    /// # Errors
    /// Returns an error if the address cannot be resolved or the socket cannot be bound.
    pub fn with_options(options: ClientOptions) -> MetricResult<Self> {
        Ok(Self::from_client(Client::with_options(options)?))
    }
}

impl<W: Writer + 'static> AsyncClient<W> {
    /// Creates a client writing to a custom transport.
    #[must_use]
    pub fn with_writer(writer: W, options: ClientOptions) -> Self {
        Self::from_client(Client::with_writer(writer, options))
    }

    /// Wraps an existing synchronous client. Both share one transport and one
    /// namespace/tag state.
    #[must_use]
    pub fn from_client(client: Client<W>) -> Self {
        Self {
            shared: Arc::new(Shared {
                client,
                close_on_drop: AtomicBool::new(false),
            }),
            group: SendGroup::new(),
        }
    }

    /// The group owned by this client, for callers that do not manage their own.
    #[must_use]
    pub const fn group(&self) -> &SendGroup {
        &self.group
    }

    /// Waits for every task registered with [`AsyncClient::group`].
    pub fn wait(&self) {
        self.group.wait();
    }

    /// The synchronous client behind this one, for sends that should report errors.
    #[must_use]
    pub fn client(&self) -> &Client<W> {
        &self.shared.client
    }

    /// Sets the namespace prepended to every metric name.
    pub fn set_namespace(&self, namespace: impl Into<String>) {
        self.shared.client.set_namespace(namespace);
    }

    /// Adds a tag, unless already present. Returns the resulting tags.
    pub fn add_tag(&self, tag: impl AsRef<str>) -> Vec<String> {
        self.shared.client.add_tag(tag)
    }

    /// Adds several tags in order, skipping those already present.
    /// Returns the resulting tags.
    pub fn add_tags<I>(&self, tags: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.shared.client.add_tags(tags)
    }

    /// Current namespace.
    #[must_use]
    pub fn namespace(&self) -> String {
        self.shared.client.namespace()
    }

    /// Current instance tags, in insertion order.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        self.shared.client.tags()
    }

    /// Schedules a metric of any type.
    pub fn send<T: AsRef<str>>(
        &self,
        stat: &str,
        metric_type: MetricType,
        value: impl Into<MetricValue>,
        sample_rate: f64,
        tags: &[T],
        group: &SendGroup,
    ) -> SendTask {
        self.schedule(
            Request::metric(stat, metric_type, value.into(), sample_rate, tags),
            group,
        )
    }

    /// Schedules adding `count` to a counter.
    pub fn count<T: AsRef<str>>(
        &self,
        stat: &str,
        count: impl Into<MetricValue>,
        tags: &[T],
        group: &SendGroup,
    ) -> SendTask {
        self.send(stat, MetricType::Count, count, 1.0, tags, group)
    }

    /// Schedules incrementing a counter by one.
    pub fn incr<T: AsRef<str>>(&self, stat: &str, tags: &[T], group: &SendGroup) -> SendTask {
        self.send(stat, MetricType::Count, 1, 1.0, tags, group)
    }

    /// Schedules decrementing a counter by one.
    pub fn decr<T: AsRef<str>>(&self, stat: &str, tags: &[T], group: &SendGroup) -> SendTask {
        self.send(stat, MetricType::Count, -1, 1.0, tags, group)
    }

    /// Schedules a gauge value.
    pub fn gauge<T: AsRef<str>>(
        &self,
        stat: &str,
        value: impl Into<MetricValue>,
        tags: &[T],
        group: &SendGroup,
    ) -> SendTask {
        self.send(stat, MetricType::Gauge, value, 1.0, tags, group)
    }

    /// Schedules a histogram value.
    pub fn histogram<T: AsRef<str>>(
        &self,
        stat: &str,
        value: impl Into<MetricValue>,
        tags: &[T],
        group: &SendGroup,
    ) -> SendTask {
        self.send(stat, MetricType::Histogram, value, 1.0, tags, group)
    }

    /// Schedules a timing in milliseconds.
    pub fn timing<T: AsRef<str>>(
        &self,
        stat: &str,
        value: impl Into<MetricValue>,
        tags: &[T],
        group: &SendGroup,
    ) -> SendTask {
        self.send(stat, MetricType::Timing, value, 1.0, tags, group)
    }

    /// Schedules a set value.
    pub fn set<T: AsRef<str>>(
        &self,
        stat: &str,
        value: impl Into<MetricValue>,
        tags: &[T],
        group: &SendGroup,
    ) -> SendTask {
        self.send(stat, MetricType::Set, value, 1.0, tags, group)
    }

    /// Schedules an event. An empty title or text fails inside the task and is
    /// only visible through [`SendGroup::failures`].
    pub fn event<T: AsRef<str>>(
        &self,
        title: &str,
        text: &str,
        fields: Option<&EventFields>,
        tags: &[T],
        group: &SendGroup,
    ) -> SendTask {
        self.schedule(Request::event(title, text, fields, tags), group)
    }

    /// Waits for the client's own group, then closes the transport.
    ///
    /// If tasks from other groups still hold the client, the transport is
    /// closed when the last of them finishes or is dropped, and a failure to
    /// close is logged instead of returned.
    ///
    /// # Errors
    /// Returns the transport's error if closing fails.
    pub fn close(self) -> MetricResult<()> {
        self.group.wait();
        match Arc::try_unwrap(self.shared) {
            Ok(shared) => {
                debug!("closing dogstatsd client");
                shared.client.writer().close()?;
                Ok(())
            }
            Err(shared) => {
                debug!("dogstatsd client still referenced by pending tasks, deferring close");
                shared.close_on_drop.store(true, Ordering::Release);
                Ok(())
            }
        }
    }

    fn schedule(&self, request: Request<'_>, group: &SendGroup) -> SendTask {
        let request = request.into_owned();
        let shared = Arc::clone(&self.shared);
        SendTask::new(group, Box::new(move || shared.client.dispatch(&request)))
    }
}

impl<W: Writer> std::fmt::Debug for AsyncClient<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncClient")
            .field("client", &self.shared.client)
            .field("group", &self.group)
            .finish()
    }
}
