//! Shared handler state and its construction from [`Config`].

use std::sync::Arc;

use reqwest::Client;
use tracing::{info, warn};

use aqualan_core::ports::{Notifier, RouteTableSource, SystemClock};
use aqualan_core::{AqualanService, InMemoryOrderStore, InMemoryProductStore, SharedScheduler};
use aqualan_mailer::{HttpMailer, LogMailer};
use aqualan_source_sheet::from_location;

use crate::config::Config;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Business operations.
    pub service: Arc<AqualanService>,
    /// Sheet used by `POST /api/routes/reload`, when configured.
    pub route_source: Option<Arc<dyn RouteTableSource>>,
}

impl AppState {
    /// State without a route sheet.
    #[must_use]
    pub fn new(service: Arc<AqualanService>) -> Self {
        Self {
            service,
            route_source: None,
        }
    }

    /// Attach the route sheet used for reloads.
    #[must_use]
    pub fn with_route_source(mut self, source: Arc<dyn RouteTableSource>) -> Self {
        self.route_source = Some(source);
        self
    }

    /// Wire the service from `config`, seed the catalog, and load the route
    /// sheet once. A sheet that cannot be read leaves the built-in table in
    /// place.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or seeding fails.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("aqualan/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let notifier: Arc<dyn Notifier> = match &config.mail_api_url {
            Some(url) => {
                info!(%url, "sending email through HTTP API");
                Arc::new(
                    HttpMailer::new(client.clone(), url, config.mail_api_key.clone())
                        .with_from(&config.mail_from),
                )
            }
            None => {
                warn!("MAIL_API_URL not set, emails will only be logged");
                Arc::new(LogMailer)
            }
        };

        let service = AqualanService::new(
            Arc::new(SharedScheduler::builtin()),
            Arc::new(InMemoryProductStore::new()),
            Arc::new(InMemoryOrderStore::new()),
            notifier,
            Arc::new(SystemClock),
        )
        .with_staff_email(&config.staff_email);

        service.seed_catalog().await?;

        let mut state = Self::new(Arc::new(service));
        if let Some(location) = &config.route_sheet {
            let source = from_location(location, client);
            // reload_routes already logged the cause
            if state.service.reload_routes(source.as_ref()).await.is_err() {
                warn!("starting with the built-in route table");
            }
            state = state.with_route_source(source);
        }

        let tables = state.service.scheduler().tables();
        info!(
            biweekly = tables.biweekly().len(),
            weekly = tables.weekly().len(),
            "route table ready"
        );
        Ok(state)
    }
}
