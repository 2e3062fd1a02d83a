use crate::clients::{ContactClient, MediaClient, OrderClient, ServiceClient, UserClient};
use crate::config::ConsoleConfig;
use crate::credentials::{CredentialStore, FileCredentialStore};
use crate::dashboard::DashboardStore;
use crate::error::ConsoleError;
use crate::session::Session;
use std::sync::Arc;
use store_framework::{CredentialSlot, EntityStore, HttpTransport, Transport};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Owns every store of the console and the session they share.
///
/// Each Resource Store runs as its own actor task. All of them send through the same
/// transport, which reads the bearer token from the same [`CredentialSlot`] the session
/// writes.
///
/// # Example
///
/// ```rust
/// use admin_console::config::ConsoleConfig;
/// use admin_console::credentials::MemoryCredentialStore;
/// use admin_console::lifecycle::ConsoleSystem;
/// use store_framework::mock::MockTransport;
/// use store_framework::CredentialSlot;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let system = ConsoleSystem::with_transport(
///         &ConsoleConfig::default(),
///         Arc::new(MockTransport::new()),
///         CredentialSlot::new(),
///         Arc::new(MemoryCredentialStore::new()),
///     );
///     assert!(!system.session.is_authenticated());
///     system.shutdown().await.unwrap();
/// }
/// ```
pub struct ConsoleSystem {
    pub users: UserClient,
    pub orders: OrderClient,
    pub services: ServiceClient,
    pub media: MediaClient,
    pub contacts: ContactClient,
    pub dashboard: DashboardStore,
    pub session: Session,

    /// Actor tasks, awaited on shutdown.
    handles: Vec<JoinHandle<()>>,
}

impl ConsoleSystem {
    /// Builds the system against the configured HTTP API, persisting credentials in the
    /// configured directory.
    pub fn new(config: &ConsoleConfig) -> Result<Self, ConsoleError> {
        let slot = CredentialSlot::new();
        let transport =
            HttpTransport::new(&config.api_base_url, config.request_timeout(), slot.clone())?;
        let credentials = FileCredentialStore::new(&config.credentials_dir);
        Ok(Self::with_transport(
            config,
            Arc::new(transport),
            slot,
            Arc::new(credentials),
        ))
    }

    /// Builds the system over any transport. Must be called inside a Tokio runtime.
    pub fn with_transport(
        config: &ConsoleConfig,
        transport: Arc<dyn Transport>,
        slot: CredentialSlot,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        let (user_actor, users) = crate::users::new(config, transport.clone());
        let (order_actor, orders) = crate::orders::new(config, transport.clone());
        let (service_actor, services) = crate::services::new(config, transport.clone());
        let (media_actor, media) = crate::media::new(config, transport.clone());
        let (contact_actor, contacts) = crate::contacts::new(config, transport.clone());

        let handles = vec![
            tokio::spawn(user_actor.run()),
            tokio::spawn(order_actor.run()),
            tokio::spawn(service_actor.run()),
            tokio::spawn(media_actor.run()),
            tokio::spawn(contact_actor.run()),
        ];

        let dashboard = DashboardStore::new(transport.clone());
        let session = Session::new(transport, slot, credentials);
        info!(stores = handles.len(), "Console started");

        Self {
            users,
            orders,
            services,
            media,
            contacts,
            dashboard,
            session,
            handles,
        }
    }

    /// Signs out and invalidates every store.
    ///
    /// The stores are reset even when the persisted credentials cannot be removed; that
    /// error is returned afterwards.
    pub async fn logout(&self) -> Result<(), ConsoleError> {
        let signed_out = self.session.logout();
        self.users.reset().await?;
        self.orders.reset().await?;
        self.services.reset().await?;
        self.media.reset().await?;
        self.contacts.reset().await?;
        self.dashboard.reset();
        info!("All stores reset");
        signed_out
    }

    /// Gracefully shuts down every store actor.
    ///
    /// Returns an error if any actor task panicked.
    pub async fn shutdown(self) -> Result<(), ConsoleError> {
        info!("Shutting down console...");

        // Dropping the clients closes every store channel.
        drop(self.users);
        drop(self.orders);
        drop(self.services);
        drop(self.media);
        drop(self.contacts);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(ConsoleError::Shutdown(e.to_string()));
            }
        }

        info!("Console shutdown complete.");
        Ok(())
    }
}
