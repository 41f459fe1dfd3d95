//! Connectivity capability.
//!
//! The shell owns network-path observation (NWPathMonitor,
//! ConnectivityManager, `navigator.onLine`). The core opens one watch
//! stream at startup and receives a [`ConnectivityStatus`] for every
//! change the shell reports.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectivityOperation {
    Watch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityStatus {
    pub online: bool,
}

impl Operation for ConnectivityOperation {
    type Output = ConnectivityStatus;
}

#[derive(Clone)]
pub struct Connectivity<E> {
    context: CapabilityContext<ConnectivityOperation, E>,
}

impl<Ev> Capability<Ev> for Connectivity<Ev> {
    type Operation = ConnectivityOperation;
    type MappedSelf<MappedEv> = Connectivity<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Connectivity::new(self.context.map_event(f))
    }
}

impl<E> Connectivity<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<ConnectivityOperation, E>) -> Self {
        Self { context }
    }

    /// Start watching for connectivity changes. The stream stays open
    /// for the life of the core; every shell report becomes one event.
    pub fn watch<F>(&self, make_event: F)
    where
        F: Fn(bool) -> E + Send + Sync + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let mut statuses = context.stream_from_shell(ConnectivityOperation::Watch);
            while let Some(status) = statuses.next().await {
                context.update_app(make_event(status.online));
            }
        });
    }
}
