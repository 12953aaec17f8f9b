//! Admin console SDK for a product catalog hosted by a remote e-commerce API.
//!
//! Provides a session gate (cookie-token login and session check) and a
//! catalog editor (product list, one shared create/edit draft, detail
//! selection). State changes are reported to subscribers as
//! [`ConsoleEvent`]s so a view layer can redraw.
//!
//! # Quick start
//!
//! ```no_run
//! use catalog_console::{AdminConsole, Credential, DraftSource, ProductField};
//!
//! let mut console = AdminConsole::builder()
//!     .api_path("my-shop")
//!     .build()
//!     .unwrap();
//!
//! console.subscribe(|event| println!("{:?}", event));
//!
//! if !console.start().is_authenticated() {
//!     console.login(&Credential::new("admin@example.com", "secret")).unwrap();
//! }
//!
//! console.open_draft(DraftSource::Empty).unwrap();
//! console.update_draft_field(ProductField::Title, "Bat".into()).unwrap();
//! console.update_draft_field(ProductField::Price, "100".into()).unwrap();
//! console.submit_draft().unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod session;
pub mod token_store;
pub mod transport;

#[cfg(feature = "async")]
pub use async_client::AsyncAdminConsole;
pub use catalog::{CatalogEditor, DraftMode, DraftSource};
pub use client::{ApiClient, SessionContext};
pub use error::{ConsoleError, Result};
pub use events::{ConsoleEvent, EventBus};
pub use models::{
    Availability, Credential, FieldInput, Product, ProductField, SessionState, SessionToken,
};
pub use session::SessionGate;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};

use std::fmt;
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// AdminConsoleBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AdminConsole`].
///
/// Anything not set explicitly comes from the environment
/// (`CATALOG_API_BASE`, `CATALOG_API_PATH`) or the platform defaults.
#[derive(Default)]
pub struct AdminConsoleBuilder {
    api_base: Option<String>,
    api_path: Option<String>,
    timeout: Option<Duration>,
    token_store: Option<Box<dyn TokenStore>>,
    transport: Option<Box<dyn Transport>>,
}

impl AdminConsoleBuilder {
    /// Base URL of the remote API, e.g. `https://api.example.com/v2`.
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Per-shop path segment used in the product endpoints.
    pub fn api_path(mut self, path: impl Into<String>) -> Self {
        self.api_path = Some(path.into());
        self
    }

    /// Request timeout. No timeout is applied unless one is set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Keep the session cookie in a file at `path`.
    pub fn token_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.token_store = Some(Box::new(FileTokenStore::new(path)));
        self
    }

    pub fn token_store<S: TokenStore + 'static>(mut self, store: S) -> Self {
        self.token_store = Some(Box::new(store));
        self
    }

    /// Replace the HTTP transport. `api_base` and `timeout` are ignored when
    /// a transport is supplied.
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    pub fn build(self) -> Result<AdminConsole> {
        let api_path = self
            .api_path
            .or_else(config::api_path_from_env)
            .ok_or_else(|| {
                ConsoleError::InvalidArgument(format!(
                    "no API path configured; call api_path() or set {}",
                    config::API_PATH_ENV
                ))
            })?;

        let transport: Box<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let base = self.api_base.unwrap_or_else(config::api_base_from_env);
                Box::new(HttpTransport::new(base, self.timeout))
            }
        };
        let store: Box<dyn TokenStore> = match self.token_store {
            Some(store) => store,
            None => Box::new(FileTokenStore::default_location()),
        };

        Ok(AdminConsole {
            client: ApiClient::new(api_path, transport),
            gate: SessionGate::new(store),
            catalog: CatalogEditor::new(),
            events: EventBus::new(),
        })
    }
}

// ---------------------------------------------------------------------------
// AdminConsole
// ---------------------------------------------------------------------------

/// The console: session gate and catalog editor over one API client.
///
/// Catalog operations require an authenticated session and fail with
/// [`ConsoleError::Unauthenticated`] otherwise.
pub struct AdminConsole {
    client: ApiClient,
    gate: SessionGate,
    catalog: CatalogEditor,
    events: EventBus,
}

impl AdminConsole {
    pub fn builder() -> AdminConsoleBuilder {
        AdminConsoleBuilder::default()
    }

    /// Register an observer for every [`ConsoleEvent`].
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&ConsoleEvent) + Send + 'static,
    {
        self.events.subscribe(observer);
    }

    // -- Session -----------------------------------------------------------

    /// Startup sequence: restore the stored token, probe the session, and
    /// fetch the catalog if the probe succeeds.
    pub fn start(&mut self) -> SessionState {
        self.gate.restore(&mut self.client);
        self.check_session()
    }

    /// Probe the remote with the current token; fetch the catalog on success.
    pub fn check_session(&mut self) -> SessionState {
        let state = self.gate.check_session(&mut self.client, &self.events);
        if state.is_authenticated() {
            let _ = self.catalog.fetch_products(&mut self.client, &self.events);
        }
        state
    }

    /// Sign in and fetch the catalog.
    pub fn login(&mut self, credential: &Credential) -> Result<SessionToken> {
        let token = self.gate.login(&mut self.client, credential, &self.events)?;
        let _ = self.catalog.fetch_products(&mut self.client, &self.events);
        Ok(token)
    }

    pub fn session_state(&self) -> SessionState {
        self.gate.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.gate.is_authenticated()
    }

    fn ensure_authenticated(&self) -> Result<()> {
        if self.gate.is_authenticated() {
            Ok(())
        } else {
            Err(ConsoleError::Unauthenticated)
        }
    }

    // -- Catalog -----------------------------------------------------------

    pub fn fetch_products(&mut self) -> Result<&[Product]> {
        self.ensure_authenticated()?;
        self.catalog.fetch_products(&mut self.client, &self.events)
    }

    pub fn products(&self) -> &[Product] {
        self.catalog.products()
    }

    pub fn open_draft(&mut self, source: DraftSource<'_>) -> Result<()> {
        self.ensure_authenticated()?;
        self.catalog.open_draft(source, &self.events)
    }

    /// Open the edit form on the cached product with `id`.
    pub fn edit_product(&mut self, id: &str) -> Result<()> {
        self.ensure_authenticated()?;
        self.catalog.open_edit(id, &self.events)
    }

    pub fn update_draft_field(&mut self, field: ProductField, input: FieldInput) -> Result<()> {
        self.catalog.update_draft_field(field, input, &self.events)
    }

    pub fn update_draft_field_by_name(&mut self, name: &str, input: FieldInput) -> Result<()> {
        self.catalog
            .update_draft_field_by_name(name, input, &self.events)
    }

    pub fn submit_draft(&mut self) -> Result<()> {
        self.ensure_authenticated()?;
        self.catalog.submit_draft(&mut self.client, &self.events)
    }

    pub fn cancel_draft(&mut self) {
        self.catalog.cancel_draft(&self.events);
    }

    pub fn draft(&self) -> &Product {
        self.catalog.draft()
    }

    pub fn draft_mode(&self) -> Option<&DraftMode> {
        self.catalog.mode()
    }

    pub fn is_form_open(&self) -> bool {
        self.catalog.is_form_open()
    }

    pub fn delete_product(&mut self, id: &str) -> Result<()> {
        self.ensure_authenticated()?;
        self.catalog.delete_product(&mut self.client, id, &self.events)
    }

    // -- Detail ------------------------------------------------------------

    pub fn select_for_detail(&mut self, product: &Product) {
        self.catalog.select_for_detail(product, &self.events);
    }

    pub fn clear_selection(&mut self) {
        self.catalog.clear_selection(&self.events);
    }

    pub fn selected(&self) -> Option<&Product> {
        self.catalog.selected()
    }

    /// Open the edit form on the product shown in the detail view.
    pub fn edit_selected(&mut self) -> Result<()> {
        self.ensure_authenticated()?;
        let product = self
            .catalog
            .selected()
            .cloned()
            .ok_or_else(|| ConsoleError::NotFound("no product selected".to_string()))?;
        self.catalog
            .open_draft(DraftSource::Existing(&product), &self.events)
    }

    /// Delete the product shown in the detail view.
    pub fn delete_selected(&mut self) -> Result<()> {
        let id = self
            .catalog
            .selected()
            .map(|p| p.id.clone())
            .ok_or_else(|| ConsoleError::NotFound("no product selected".to_string()))?;
        self.delete_product(&id)
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for AdminConsole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AdminConsole(api_path={}, session={:?}, products={}, form_open={})",
            self.client.api_path(),
            self.gate.state(),
            self.catalog.products().len(),
            self.catalog.is_form_open()
        )
    }
}
