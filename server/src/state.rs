//! Wires C1-C8 into one shared handle, installed as axum's router state.

use std::sync::Arc;

use diplomacy_core::{BroadcastHub, Cache, EventHub, GameLog, InMemoryCache, InMemoryLog, PhaseController, ReferenceAdjudicator, Timer, TokioTimer};
use diplomacy_engine_client::{EngineBackedStrategy, EnginePool, EngineSpec};
use tokio::sync::mpsc;
use tracing::warn;

use crate::config::Config;

pub struct AppState {
    pub config: Config,
    pub log: Arc<dyn GameLog>,
    pub cache: Arc<dyn Cache>,
    pub hub: Arc<dyn EventHub>,
    pub timer: Arc<dyn Timer>,
    pub controller: Arc<PhaseController>,
}

impl AppState {
    /// Builds the default in-memory profile. A durable backend swap is not
    /// implemented here, only documented as a drop-in point in DESIGN.md.
    pub fn new(config: Config) -> (Arc<Self>, mpsc::UnboundedReceiver<diplomacy_core::Expiry>) {
        let log: Arc<dyn GameLog> = Arc::new(InMemoryLog::new());
        let cache: Arc<dyn Cache> = Arc::new(InMemoryCache::new());
        let hub: Arc<dyn EventHub> = Arc::new(BroadcastHub::new());
        let (timer_impl, expiry_rx) = TokioTimer::new();
        let timer: Arc<dyn Timer> = Arc::new(timer_impl);
        let adjudicator = Arc::new(ReferenceAdjudicator);

        let engine_pool = config.engine_binary.clone().map(|program| {
            Arc::new(EnginePool::new(EngineSpec { program, args: Vec::new() }, config.engine_pool_capacity))
        });
        let resolver: diplomacy_core::controller::StrategyResolver = match engine_pool {
            Some(pool) => Arc::new(move |name: &str| -> Option<Box<dyn diplomacy_core::bots::Strategy>> {
                if name == "engine" {
                    // Checking out a process needs to suspend; bot dispatch
                    // calls this resolver synchronously, so a pooled handle
                    // is fetched eagerly the first time this difficulty is
                    // seen and then reused for the seat's lifetime isn't
                    // possible from a sync closure. We hand back a strategy
                    // that checks the pool out fresh on every call instead,
                    // trading a little latency for a resolver signature the
                    // controller can call without `.await`.
                    let pool = pool.clone();
                    Some(Box::new(LazyEngineStrategy { pool }))
                } else {
                    diplomacy_core::bots::by_name(name)
                }
            }),
            None => Arc::new(diplomacy_core::bots::by_name),
        };

        let controller = Arc::new(PhaseController::with_strategy_resolver(
            log.clone(),
            cache.clone(),
            hub.clone(),
            timer.clone(),
            adjudicator,
            resolver,
        ));

        (Arc::new(AppState { config, log, cache, hub, timer, controller }), expiry_rx)
    }
}

/// Checks an engine out of the pool on every call rather than holding one
/// for the strategy's lifetime — see the comment where this is
/// constructed for why the resolver can't do the checkout itself.
struct LazyEngineStrategy {
    pool: Arc<EnginePool>,
}

#[async_trait::async_trait]
impl diplomacy_core::bots::Strategy for LazyEngineStrategy {
    async fn choose_orders(
        &self,
        power: diplomacy_protocol::Power,
        board: &diplomacy_core::BoardState,
        phase_type: diplomacy_protocol::PhaseType,
        year: u16,
    ) -> Vec<diplomacy_protocol::Order> {
        let process = match self.pool.checkout().await {
            Ok(p) => p,
            Err(err) => {
                warn!(%err, "failed to check out an engine process, falling back to easy");
                return diplomacy_core::bots::EasyStrategy.choose_orders(power, board, phase_type, year).await;
            }
        };
        let strategy = EngineBackedStrategy::new(process.clone(), std::time::Duration::from_secs(5), Box::new(diplomacy_core::bots::EasyStrategy));
        let orders = strategy.choose_orders(power, board, phase_type, year).await;
        self.pool.checkin(process).await;
        orders
    }

    fn name(&self) -> &'static str {
        "engine"
    }
}
