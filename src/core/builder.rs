use std::marker::PhantomData;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio_util::sync::CancellationToken;

use super::{
    config::RegistryConfig,
    registry::{Shared, TaskRegistry, WakeFn},
};
use crate::{
    error::RegistryError,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
    timer::Timer,
};

/// Builder for constructing a [`TaskRegistry`] with optional features.
pub struct RegistryBuilder<I, O> {
    timer: Arc<dyn Timer>,
    cfg: RegistryConfig,
    wake: Option<WakeFn>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    _types: PhantomData<fn(I) -> O>,
}

impl<I, O> RegistryBuilder<I, O>
where
    I: Send + Sync + 'static,
    O: Send + 'static,
{
    /// Creates a new builder arming deadlines on `timer`, with default configuration.
    pub fn new(timer: Arc<dyn Timer>) -> Self {
        Self {
            timer,
            cfg: RegistryConfig::default(),
            wake: None,
            subscribers: Vec::new(),
            _types: PhantomData,
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: RegistryConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the worker-wake callback.
    ///
    /// Invoked after the registry lock is released, once per empty → non-empty
    /// transition. It must not block indefinitely; it may call back into the registry.
    pub fn with_worker<F>(mut self, wake: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.wake = Some(Arc::new(wake));
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive registry events through dedicated workers with
    /// bounded queues; building then requires a tokio runtime.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the registry.
    ///
    /// With subscribers configured, spawns their workers and a listener that
    /// forwards bus events to them; the listener stops when the last registry
    /// handle is dropped. Fails with [`RegistryError::NoRuntime`] if that
    /// happens outside a tokio runtime.
    pub fn build(self) -> Result<TaskRegistry<I, O>, RegistryError> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        let listener = if self.subscribers.is_empty() {
            None
        } else {
            let rt = Handle::try_current().map_err(|_| RegistryError::NoRuntime {
                context: "subscribers",
            })?;
            let set = SubscriberSet::new(self.subscribers, bus.clone(), &rt);
            let stop = CancellationToken::new();
            spawn_listener(&rt, &bus, set, stop.clone());
            Some(stop.drop_guard())
        };

        Ok(TaskRegistry::from_shared(Shared::new(
            self.timer, self.wake, bus, self.cfg, listener,
        )))
    }
}

/// Forwards bus events to the subscriber set until `stop` is cancelled,
/// then flushes what is already buffered and shuts the set down.
fn spawn_listener(rt: &Handle, bus: &Bus, set: SubscriberSet, stop: CancellationToken) {
    let mut rx = bus.subscribe();
    rt.spawn(async move {
        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                msg = rx.recv() => match msg {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        }
        loop {
            match rx.try_recv() {
                Ok(ev) => set.emit(&ev),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        set.shutdown().await;
    });
}
