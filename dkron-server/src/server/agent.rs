use std::{future::Future, sync::Arc};

use faststr::FastStr;
use tokio::sync::{broadcast, mpsc};

use crate::{
    cluster::{ClusterService, ClusterWatcher, MemberEvent},
    shutdown::Shutdown,
};

use super::cfg::DEFAULT_REGION;

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub region: FastStr,
    /// Number of servers to wait for before the initial quorum is formed,
    /// `0` disables the bootstrap check.
    pub bootstrap_expect: i64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            region: FastStr::from_static_str(DEFAULT_REGION),
            bootstrap_expect: 0,
        }
    }
}

/// Keeps `watcher` in sync with the member events until `shutdown` resolves
/// or the event channel is closed.
pub async fn run(
    config: AgentConfig,
    watcher: Arc<ClusterWatcher>,
    events: mpsc::Receiver<MemberEvent>,
    shutdown: impl Future,
) {
    let (notify_shutdown, _) = broadcast::channel::<()>(1);
    let (shutdown_complete_tx, mut shutdown_complete_rx) = mpsc::channel::<()>(1);

    tracing::info!(
        region = %config.region,
        bootstrap_expect = config.bootstrap_expect,
        "dkron agent starting"
    );

    let cluster_service = ClusterService::new(watcher, config.region, config.bootstrap_expect);
    cluster_service.background_task(
        events,
        Shutdown::new(notify_shutdown.subscribe()),
        shutdown_complete_tx,
    );

    tokio::select! {
        _ = shutdown => {
            // The shutdown signal has been received.
            tracing::info!("shutting down");
        }
        _ = shutdown_complete_rx.recv() => {
            tracing::info!("member event stream closed");
        }
    }

    drop(notify_shutdown);

    let _ = shutdown_complete_rx.recv().await;

    tracing::info!(
        servers = cluster_service.watcher().num_servers(),
        "dkron agent has shutdown!!"
    );
}

#[cfg(test)]
mod test {
    use std::{
        net::{IpAddr, Ipv4Addr},
        sync::Arc,
    };

    use tokio::sync::{mpsc, oneshot};

    use crate::cluster::{ClusterWatcher, EventKind, Member, MemberEvent, Tags};

    use super::{run, AgentConfig};

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!("global", config.region.as_str());
        assert_eq!(0, config.bootstrap_expect);
    }

    #[tokio::test]
    async fn test_run_until_events_closed() {
        let watcher = Arc::new(ClusterWatcher::new());
        let (event_tx, event_rx) = mpsc::channel(4);
        let (_shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let tags: Tags = [("role", "dkron"), ("server", "true"), ("port", "6868")]
            .into_iter()
            .collect();
        let member = Member::new("a", IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), tags);
        event_tx
            .send(MemberEvent::new(EventKind::Join, vec![member]))
            .await
            .unwrap();
        drop(event_tx);

        run(AgentConfig::default(), watcher.clone(), event_rx, shutdown_rx).await;

        assert!(watcher.server("a").is_some());
    }

    #[tokio::test]
    async fn test_run_until_shutdown() {
        let watcher = Arc::new(ClusterWatcher::new());
        let (_event_tx, event_rx) = mpsc::channel::<MemberEvent>(4);

        run(AgentConfig::default(), watcher.clone(), event_rx, async {}).await;

        assert_eq!(0, watcher.num_servers());
    }
}
