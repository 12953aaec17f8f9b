//! Async wrapper around [`AdminConsole`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every console operation on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], so the UI's event loop stays responsive
//! while a request is outstanding.
//!
//! # Example
//!
//! ```no_run
//! use catalog_console::{AdminConsole, AsyncAdminConsole, Credential};
//!
//! # async fn example() -> catalog_console::Result<()> {
//! let console = AdminConsole::builder().api_path("my-shop").build()?;
//! let console = AsyncAdminConsole::new(console);
//!
//! if !console.start().await?.is_authenticated() {
//!     console.login(Credential::new("admin@example.com", "secret")).await?;
//! }
//! let products = console.products().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex};

use crate::error::{ConsoleError, Result};
use crate::models::{Credential, Product, SessionState, SessionToken};
use crate::AdminConsole;

/// Async wrapper around [`AdminConsole`].
///
/// The console is behind a [`Mutex`]; operations issued concurrently run one
/// after another, and the last fetch to finish wins.
#[derive(Clone)]
pub struct AsyncAdminConsole {
    inner: Arc<Mutex<AdminConsole>>,
}

impl AsyncAdminConsole {
    pub fn new(console: AdminConsole) -> Self {
        Self {
            inner: Arc::new(Mutex::new(console)),
        }
    }

    /// Run a console operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut AdminConsole) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let console = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = console
                .lock()
                .map_err(|_| ConsoleError::InvalidArgument("console lock poisoned".into()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| ConsoleError::InvalidArgument(format!("Task join error: {e}")))?
    }

    pub async fn start(&self) -> Result<SessionState> {
        self.run(|c| Ok(c.start())).await
    }

    pub async fn login(&self, credential: Credential) -> Result<SessionToken> {
        self.run(move |c| c.login(&credential)).await
    }

    /// Fetch the catalog and return a copy of the new list.
    pub async fn fetch_products(&self) -> Result<Vec<Product>> {
        self.run(|c| c.fetch_products().map(|p| p.to_vec())).await
    }

    /// A copy of the cached list, without fetching.
    pub async fn products(&self) -> Result<Vec<Product>> {
        self.run(|c| Ok(c.products().to_vec())).await
    }

    pub async fn submit_draft(&self) -> Result<()> {
        self.run(|c| c.submit_draft()).await
    }

    pub async fn delete_product(&self, id: impl Into<String>) -> Result<()> {
        let id = id.into();
        self.run(move |c| c.delete_product(&id)).await
    }
}
