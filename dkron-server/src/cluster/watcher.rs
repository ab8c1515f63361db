use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ahash::AHashMap;
use faststr::FastStr;
use tokio::sync::mpsc;

use crate::shutdown::Shutdown;

use super::{
    error::ClusterError,
    member::{Member, MemberStatus},
    server::{classify, Classification, ServerParts},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Join,
    Leave,
    Failed,
    Update,
    Reap,
}

/// A batch of membership changes delivered by the gossip layer.
#[derive(Debug, Clone)]
pub struct MemberEvent {
    pub kind: EventKind,
    pub members: Vec<Member>,
}

impl MemberEvent {
    pub fn new(kind: EventKind, members: Vec<Member>) -> MemberEvent {
        MemberEvent { kind, members }
    }
}

/// Known dkron servers, keyed by member name.
#[derive(Debug, Default)]
pub struct ClusterWatcher {
    servers: Mutex<AHashMap<FastStr, ServerParts>>,
    bootstrap_peers: Mutex<Option<Vec<ServerParts>>>,
}

impl ClusterWatcher {
    pub fn new() -> ClusterWatcher {
        ClusterWatcher::default()
    }

    pub fn handle_event(&self, event: &MemberEvent) {
        match event.kind {
            EventKind::Join | EventKind::Update => {
                for member in event.members.iter() {
                    self.member_join(member);
                }
            }
            EventKind::Leave | EventKind::Failed | EventKind::Reap => {
                for member in event.members.iter() {
                    self.member_remove(member.name.as_str(), event.kind);
                }
            }
        }
    }

    /// Classifies `member` and records it when it is a server.
    ///
    /// A member that stops qualifying as a server is forgotten.
    pub fn member_join(&self, member: &Member) -> Option<ServerParts> {
        match classify(member) {
            Classification::Server(parts) => {
                tracing::info!(
                    server = %parts,
                    region = %parts.region,
                    version = %parts.build_version,
                    "adding server"
                );
                self.lock_servers()
                    .insert(parts.name.clone(), parts.clone());
                Some(parts)
            }
            Classification::Malformed(reason) => {
                tracing::warn!(member = %member.name, %reason, "member has malformed server tags, ignoring it");
                self.lock_servers().remove(&member.name);
                None
            }
            Classification::NotServer => {
                if let Some(parts) = self.lock_servers().remove(&member.name) {
                    tracing::info!(server = %parts, "member no longer advertises the server role");
                }
                None
            }
        }
    }

    pub fn member_remove(&self, name: &str, kind: EventKind) -> Option<ServerParts> {
        let removed = self.lock_servers().remove(name);
        if let Some(parts) = &removed {
            tracing::info!(server = %parts, event = ?kind, "removing server");
        }
        removed
    }

    pub fn server(&self, name: &str) -> Option<ServerParts> {
        self.lock_servers().get(name).cloned()
    }

    pub fn servers(&self, region: &str) -> Vec<ServerParts> {
        let mut servers: Vec<ServerParts> = self
            .lock_servers()
            .values()
            .filter(|parts| parts.region.as_str() == region)
            .cloned()
            .collect();
        servers.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        servers
    }

    pub fn all_servers(&self) -> Vec<ServerParts> {
        let mut servers: Vec<ServerParts> = self.lock_servers().values().cloned().collect();
        servers.sort_by(|a, b| {
            (a.region.as_str(), a.name.as_str()).cmp(&(b.region.as_str(), b.name.as_str()))
        });
        servers
    }

    pub fn regions(&self) -> Vec<FastStr> {
        let mut regions: Vec<FastStr> = self
            .lock_servers()
            .values()
            .map(|parts| parts.region.clone())
            .collect();
        regions.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        regions.dedup();
        regions
    }

    pub fn num_servers(&self) -> usize {
        self.lock_servers().len()
    }

    /// Checks whether enough alive servers of `region` are known to form the
    /// initial quorum. `bootstrap_expect == 0` disables the check.
    pub fn maybe_bootstrap(
        &self,
        region: &str,
        bootstrap_expect: i64,
    ) -> Result<Option<Vec<ServerParts>>, ClusterError> {
        bootstrap_servers(region, bootstrap_expect, self.servers(region))
    }

    pub fn bootstrap_peers(&self) -> Option<Vec<ServerParts>> {
        self.bootstrap_peers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_bootstrap_peers(&self, peers: Vec<ServerParts>) {
        *self
            .bootstrap_peers
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(peers);
    }

    fn lock_servers(&self) -> MutexGuard<'_, AHashMap<FastStr, ServerParts>> {
        self.servers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Selects the servers that make up the bootstrap quorum of `region`.
///
/// Every alive server must either not declare `expect` or agree with
/// `bootstrap_expect`, and none may run in bootstrap mode.
pub fn bootstrap_servers<I>(
    region: &str,
    bootstrap_expect: i64,
    servers: I,
) -> Result<Option<Vec<ServerParts>>, ClusterError>
where
    I: IntoIterator<Item = ServerParts>,
{
    if bootstrap_expect <= 0 {
        return Ok(None);
    }

    let mut peers = vec![];
    for parts in servers {
        if parts.status != MemberStatus::Alive || parts.region.as_str() != region {
            continue;
        }
        if parts.expect != 0 && parts.expect != bootstrap_expect {
            return Err(ClusterError::ExpectConflict {
                member: parts.name,
                expect: parts.expect,
                bootstrap_expect,
            });
        }
        if parts.bootstrap {
            return Err(ClusterError::BootstrapModeConflict { member: parts.name });
        }
        peers.push(parts);
    }

    if peers.len() < bootstrap_expect as usize {
        return Ok(None);
    }

    peers.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
    Ok(Some(peers))
}

/// Applies member events until shutdown or until every sender is gone.
pub async fn member_event_task(
    watcher: Arc<ClusterWatcher>,
    region: FastStr,
    bootstrap_expect: i64,
    mut events: mpsc::Receiver<MemberEvent>,
    mut shutdown: Shutdown,
    _shutdown_complete: mpsc::Sender<()>,
) {
    let mut bootstrapped = bootstrap_expect <= 0;

    while !shutdown.is_shutdown() {
        let event = tokio::select! {
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
            _ = shutdown.recv() => break,
        };

        watcher.handle_event(&event);

        if bootstrapped || event.kind != EventKind::Join {
            continue;
        }

        match watcher.maybe_bootstrap(&region, bootstrap_expect) {
            Ok(Some(peers)) => {
                let names: Vec<&str> = peers.iter().map(|p| p.name.as_str()).collect();
                tracing::info!(%region, peers = ?names, "bootstrap quorum reached");
                watcher.set_bootstrap_peers(peers);
                bootstrapped = true;
            }
            Ok(None) => {
                tracing::debug!(%region, bootstrap_expect, "waiting for more servers to bootstrap");
            }
            Err(err) => {
                tracing::error!(error = %err, "bootstrap check failed");
            }
        }
    }

    tracing::info!("member event task has shutdown");
}
