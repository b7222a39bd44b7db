//! # Runtime Wiring
//!
//! ## Startup Sequence
//!
//! 1. Load the topology file.
//! 2. If the mode serves status: build the api context from the topology and
//!    start answering `status` and `queryRealmModificationDates`.
//! 3. If the mode works on realm data: build the worker context through a
//!    status round trip on the messenger and start its subjects.
//! 4. Start the sync trigger listener and the compute trigger listener when
//!    the mode hosts them.
//!
//! Any failing step aborts startup.
//!
//! ## Shutdown
//!
//! One stop handle is shared by every subscription. Shutdown signals it, then
//! waits for each subscription to report that it has been torn down.

use crate::config::RuntimeConfig;
use crate::transport::Transport;
use ah_01_state::{
    FsNamespaceProvisioner, MessengerStatusSource, ProcessMode, StartupError, StateContext,
    TopologyConfig, TopologyStatusSource,
};
use ah_02_query::{DispatchTable, InMemoryLiveAuctions, LiveAuctionsStore, QueryDeps};
use ah_03_topic_monitor::{listen_for_sync, JsonFileTopicRegistry, SystemTimeSource, TopicMonitor};
use ah_04_gateway::{listen_for_compute, GatewayError, HttpRemoteGateway, RemoteGateway};
use ah_telemetry::PrometheusReporter;
use shared_bus::{
    stop_channel, BusError, MessengerError, StopHandle, SubscriptionHandle, SubscriptionSignals,
};
use shared_types::QuerySubject;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{info, warn};

/// How long shutdown waits for each subscription to stop.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error("failed to subscribe: {0}")]
    Messenger(#[from] MessengerError),

    #[error("failed to subscribe to bus topic: {0}")]
    Bus(#[from] BusError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("mode {0} needs a remote gateway")]
    MissingGateway(ProcessMode),

    #[error("subscription to {0} never became ready")]
    NotReady(String),
}

/// Everything a running process holds on to.
pub struct AuctionHouseRuntime {
    config: RuntimeConfig,
    transport: Transport,
    live_auctions: Arc<dyn LiveAuctionsStore>,
    gateway: Option<Arc<dyn RemoteGateway>>,
    stop: StopHandle,
    handles: Vec<SubscriptionHandle>,
    listeners: Vec<(String, SubscriptionSignals)>,
    api_state: Option<Arc<StateContext>>,
    worker_state: Option<Arc<StateContext>>,
    subjects: Vec<QuerySubject>,
}

impl AuctionHouseRuntime {
    /// A runtime that has not started anything yet.
    ///
    /// Live auctions are served from an empty in-memory store and the
    /// gateway, if any, is built from `config.gateway_endpoint`.
    pub fn new(config: RuntimeConfig, transport: Transport) -> Self {
        let (stop, _) = stop_channel();
        Self {
            config,
            transport,
            live_auctions: Arc::new(InMemoryLiveAuctions::new()),
            gateway: None,
            stop,
            handles: Vec::new(),
            listeners: Vec::new(),
            api_state: None,
            worker_state: None,
            subjects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_live_auctions(mut self, store: Arc<dyn LiveAuctionsStore>) -> Self {
        self.live_auctions = store;
        self
    }

    #[must_use]
    pub fn with_gateway(mut self, gateway: Arc<dyn RemoteGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Context answering status queries, when the mode serves them.
    pub fn api_state(&self) -> Option<&Arc<StateContext>> {
        self.api_state.as_ref()
    }

    /// Context built from the status round trip, when the mode needs one.
    pub fn worker_state(&self) -> Option<&Arc<StateContext>> {
        self.worker_state.as_ref()
    }

    /// Query subjects this process answers.
    pub fn subjects(&self) -> &[QuerySubject] {
        &self.subjects
    }

    /// Run the startup sequence for the configured mode.
    pub async fn start(&mut self) -> Result<(), RuntimeError> {
        let mode = self.config.mode;
        info!("===========================================");
        info!("  Auction House Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("  Mode: {}", mode);
        info!("===========================================");

        let topology = TopologyConfig::load(&self.config.topology_path)?;
        let provisioner = FsNamespaceProvisioner::new(self.config.databases_dir());

        if mode.serves_status() {
            let state = Arc::new(
                StateContext::bootstrap(
                    ProcessMode::Api,
                    &topology,
                    Arc::new(TopologyStatusSource::new(topology.clone())),
                    &provisioner,
                )
                .await?,
            );
            self.serve_queries(ProcessMode::Api, Arc::clone(&state)).await?;
            self.api_state = Some(state);
        }

        if mode.hosts(ProcessMode::LiveAuctions) || mode.hosts(ProcessMode::PricelistHistories) {
            let status_source = Arc::new(MessengerStatusSource::new(
                Arc::clone(&self.transport.messenger),
                self.config.status_timeout,
            ));
            let state = Arc::new(
                StateContext::bootstrap(mode, &topology, status_source, &provisioner).await?,
            );
            if mode.hosts(ProcessMode::LiveAuctions) {
                self.serve_queries(ProcessMode::LiveAuctions, Arc::clone(&state))
                    .await?;
            }
            self.worker_state = Some(state);
        }

        if mode.hosts(ProcessMode::PubsubTopicsMonitor) {
            let monitor = Arc::new(TopicMonitor::new(
                Arc::clone(&self.transport.bus),
                Arc::new(JsonFileTopicRegistry::new(self.config.topic_registry_path())),
                Arc::new(SystemTimeSource),
                Arc::new(PrometheusReporter),
                self.config.monitor,
            ));
            let signals = listen_for_sync(
                monitor,
                Arc::clone(&self.transport.bus),
                self.stop.signal(),
            )
            .await?;
            self.track("sync trigger", signals).await?;
        }

        if mode.hosts(ProcessMode::Gateway) {
            let gateway = self.gateway()?;
            let signals = listen_for_compute(
                gateway,
                Arc::clone(&self.transport.bus),
                self.stop.signal(),
                self.config.gateway_queue_capacity,
            )
            .await?;
            self.track("compute trigger", signals).await?;
        }

        info!(
            mode = %mode,
            subjects = self.subjects.len(),
            listeners = self.listeners.len(),
            "Runtime started"
        );
        Ok(())
    }

    /// Stop every subscription and wait for them to be torn down.
    pub async fn shutdown(self) {
        info!("Initiating graceful shutdown...");
        self.stop.stop();

        for handle in self.handles {
            let subject = handle.subject().to_string();
            if timeout(STOP_TIMEOUT, handle.stopped()).await.is_err() {
                warn!(subject = %subject, "Subscription did not stop in time");
            }
        }
        for (name, signals) in self.listeners {
            match timeout(STOP_TIMEOUT, signals.on_stopped).await {
                Ok(Ok(())) => {}
                Ok(Err(_)) => warn!(listener = %name, "Listener dropped its stop signal"),
                Err(_) => warn!(listener = %name, "Listener did not stop in time"),
            }
        }

        info!("Shutdown complete");
    }

    async fn serve_queries(
        &mut self,
        owner: ProcessMode,
        state: Arc<StateContext>,
    ) -> Result<(), RuntimeError> {
        let deps = QueryDeps {
            state,
            live_auctions: Arc::clone(&self.live_auctions),
        };
        let table = DispatchTable::for_mode(owner, &deps, Arc::clone(&self.transport.messenger));
        let handles = table.subscribe_all(&self.stop.signal()).await?;
        self.subjects.extend(table.subjects());
        self.handles.extend(handles);
        Ok(())
    }

    async fn track(
        &mut self,
        name: &str,
        mut signals: SubscriptionSignals,
    ) -> Result<(), RuntimeError> {
        match timeout(STOP_TIMEOUT, &mut signals.on_ready).await {
            Ok(Ok(())) => {}
            _ => return Err(RuntimeError::NotReady(name.to_string())),
        }
        self.listeners.push((name.to_string(), signals));
        Ok(())
    }

    fn gateway(&self) -> Result<Arc<dyn RemoteGateway>, RuntimeError> {
        if let Some(gateway) = &self.gateway {
            return Ok(Arc::clone(gateway));
        }
        let endpoint = self
            .config
            .gateway_endpoint
            .as_deref()
            .ok_or(RuntimeError::MissingGateway(self.config.mode))?;
        Ok(Arc::new(HttpRemoteGateway::new(endpoint)?))
    }
}
