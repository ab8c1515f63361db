use tokio::sync::broadcast;

/// Listens for the agent shutdown signal.
///
/// Dropping the `broadcast::Sender` held by the agent closes the channel,
/// which every `Shutdown` observes as the signal.
#[derive(Debug)]
pub struct Shutdown {
    is_shutdown: bool,
    notify: broadcast::Receiver<()>,
}

impl Shutdown {
    pub fn new(notify: broadcast::Receiver<()>) -> Shutdown {
        Shutdown {
            is_shutdown: false,
            notify,
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.is_shutdown
    }

    pub async fn recv(&mut self) {
        if self.is_shutdown {
            return;
        }

        // Lagging is impossible, only one value is ever sent.
        let _ = self.notify.recv().await;

        self.is_shutdown = true;
    }
}
