use admin_console::config::ConsoleConfig;
use admin_console::lifecycle::{setup_tracing, ConsoleSystem};
use admin_console::ConsoleError;
use store_framework::EntityStore;
use tracing::{error, info, warn, Instrument};

const ENV_EMAIL: &str = "ADMIN_CONSOLE_EMAIL";
const ENV_PASSWORD: &str = "ADMIN_CONSOLE_PASSWORD";

#[tokio::main]
async fn main() -> Result<(), ConsoleError> {
    setup_tracing();

    let config = ConsoleConfig::load_default()?;
    let system = ConsoleSystem::new(&config)?;

    if !system.session.restore()? {
        let email = std::env::var(ENV_EMAIL).unwrap_or_default();
        let password = std::env::var(ENV_PASSWORD).unwrap_or_default();
        if let Err(e) = system.session.login(&email, &password).await {
            error!(error = %e, "Sign-in failed");
            return system.shutdown().await;
        }
    }

    let span = tracing::info_span!("dashboard");
    async {
        match system.dashboard.refresh().await {
            Ok(kpi) => info!(
                users = kpi.total_users,
                partners = kpi.active_partners,
                open_orders = kpi.open_orders,
                revenue = kpi.revenue,
                "Dashboard"
            ),
            Err(e) => warn!(error = %e, "Dashboard unavailable"),
        }
    }
    .instrument(span)
    .await;

    let span = tracing::info_span!("orders");
    async {
        match system.orders.list().await {
            Ok(page) => {
                info!(shown = page.records.len(), total = page.total, "Orders");
                for order in &page.records {
                    info!(id = %order.id, status = %order.status, amount = order.total_amount, "Order");
                }
            }
            Err(e) => warn!(error = %e, "Orders unavailable"),
        }
    }
    .instrument(span)
    .await;

    system.shutdown().await
}
