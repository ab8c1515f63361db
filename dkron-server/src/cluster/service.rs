use std::sync::Arc;

use faststr::FastStr;
use tokio::sync::mpsc;

use crate::shutdown::Shutdown;

use super::watcher::{member_event_task, ClusterWatcher, MemberEvent};

#[derive(Debug)]
pub struct ClusterService {
    watcher: Arc<ClusterWatcher>,
    region: FastStr,
    bootstrap_expect: i64,
}

impl ClusterService {
    pub fn new(watcher: Arc<ClusterWatcher>, region: FastStr, bootstrap_expect: i64) -> Self {
        ClusterService {
            watcher,
            region,
            bootstrap_expect,
        }
    }

    pub fn watcher(&self) -> &Arc<ClusterWatcher> {
        &self.watcher
    }

    pub fn background_task(
        &self,
        events: mpsc::Receiver<MemberEvent>,
        shutdown: Shutdown,
        shutdown_complete: mpsc::Sender<()>,
    ) {
        tokio::spawn(member_event_task(
            self.watcher.clone(),
            self.region.clone(),
            self.bootstrap_expect,
            events,
            shutdown,
            shutdown_complete,
        ));
    }
}
