//! Background maintenance tasks
//!
//! Two periodic tokio tasks drive the registry: the idle sweep and the
//! stats log. Both run on whatever runtime is current when
//! [`Scheduler::start`] is called.

use crate::registry::{ParticipantId, SessionRegistry};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

/// Called once for every participant whose game was swept
pub type SweepNotifier = Arc<dyn Fn(&ParticipantId) + Send + Sync>;

#[derive(Clone)]
pub struct SchedulerConfig {
    /// Age after which a game is swept
    pub idle_timeout: Duration,
    pub sweep_interval: Duration,
    pub stats_interval: Duration,
    pub on_sweep: Option<SweepNotifier>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(3600),
            sweep_interval: Duration::from_secs(60),
            stats_interval: Duration::from_secs(300),
            on_sweep: None,
        }
    }
}

impl fmt::Debug for SchedulerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerConfig")
            .field("idle_timeout", &self.idle_timeout)
            .field("sweep_interval", &self.sweep_interval)
            .field("stats_interval", &self.stats_interval)
            .field("on_sweep", &self.on_sweep.is_some())
            .finish()
    }
}

/// Handles to the running maintenance tasks
#[derive(Debug)]
pub struct Scheduler {
    sweep_task: JoinHandle<()>,
    stats_task: JoinHandle<()>,
}

impl Scheduler {
    /// Spawn the sweep and stats tasks
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn start(registry: Arc<SessionRegistry>, config: &SchedulerConfig) -> Self {
        let sweep_task = {
            let registry = Arc::clone(&registry);
            let idle_timeout = config.idle_timeout;
            let on_sweep = config.on_sweep.clone();
            let mut ticker = time::interval(config.sweep_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tokio::spawn(async move {
                loop {
                    ticker.tick().await;
                    for participant in registry.sweep_idle(idle_timeout) {
                        info!(participant = %participant, "Ended idle game");
                        if let Some(notify) = &on_sweep {
                            notify(&participant);
                        }
                    }
                }
            })
        };

        let stats_task = {
            let mut ticker = time::interval(config.stats_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tokio::spawn(async move {
                loop {
                    ticker.tick().await;
                    registry.log_stats();
                }
            })
        };

        debug!(
            sweep_secs = config.sweep_interval.as_secs(),
            stats_secs = config.stats_interval.as_secs(),
            "Scheduler started"
        );
        Self {
            sweep_task,
            stats_task,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.sweep_task.is_finished() && !self.stats_task.is_finished()
    }

    /// Stop both tasks
    pub fn shutdown(self) {
        self.sweep_task.abort();
        self.stats_task.abort();
        debug!("Scheduler stopped");
    }
}
