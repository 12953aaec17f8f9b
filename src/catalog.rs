//! Catalog editor: the cached product list, the single draft slot, and the
//! read-only detail selection.
//!
//! The list is only ever replaced wholesale by a fetch. Create and edit share
//! one draft slot; the [`DraftMode`] recorded when the form opens decides
//! which call the submit makes.

use crate::client::ApiClient;
use crate::config;
use crate::error::{ConsoleError, Result};
use crate::events::{ConsoleEvent, EventBus};
use crate::models::{FieldInput, Product, ProductField};

// ---------------------------------------------------------------------------
// DraftMode / DraftSource
// ---------------------------------------------------------------------------

/// Which call a submit dispatches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftMode {
    Create,
    Edit { original_id: String },
}

/// What a draft is opened from.
#[derive(Debug, Clone, Copy)]
pub enum DraftSource<'a> {
    /// The blank template; opens in create mode.
    Empty,
    /// A copy of an existing product; opens in edit mode.
    Existing(&'a Product),
}

// ---------------------------------------------------------------------------
// CatalogEditor
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct CatalogEditor {
    products: Vec<Product>,
    draft: Product,
    mode: Option<DraftMode>,
    selected: Option<Product>,
}

impl CatalogEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn draft(&self) -> &Product {
        &self.draft
    }

    /// Mode of the open form, `None` when the form is closed.
    pub fn mode(&self) -> Option<&DraftMode> {
        self.mode.as_ref()
    }

    pub fn is_form_open(&self) -> bool {
        self.mode.is_some()
    }

    pub fn selected(&self) -> Option<&Product> {
        self.selected.as_ref()
    }

    // -- Fetch -------------------------------------------------------------

    /// Replace the product list with the remote's.
    ///
    /// On failure the error is logged and the previous list is kept.
    pub fn fetch_products(&mut self, client: &mut ApiClient, events: &EventBus) -> Result<&[Product]> {
        match client.list_products() {
            Ok(products) => {
                log::debug!("fetched {} products", products.len());
                self.products = products;
                events.emit(ConsoleEvent::ProductsReplaced {
                    count: self.products.len(),
                });
                Ok(&self.products)
            }
            Err(e) => {
                log::error!("failed to fetch products: {}", e);
                Err(e)
            }
        }
    }

    fn refetch(&mut self, client: &mut ApiClient, events: &EventBus) {
        // Failures are already logged; the stale list stays.
        let _ = self.fetch_products(client, events);
    }

    // -- Draft -------------------------------------------------------------

    /// Open the form on a copy of `source`.
    ///
    /// Only one draft may be open at a time.
    pub fn open_draft(&mut self, source: DraftSource<'_>, events: &EventBus) -> Result<()> {
        if self.mode.is_some() {
            return Err(ConsoleError::DraftOpen);
        }
        let (draft, mode) = match source {
            DraftSource::Empty => (Product::empty(), DraftMode::Create),
            DraftSource::Existing(product) => {
                if product.id.is_empty() {
                    return Err(ConsoleError::InvalidArgument(
                        "cannot edit a product without an id".to_string(),
                    ));
                }
                let mode = DraftMode::Edit {
                    original_id: product.id.clone(),
                };
                (product.clone(), mode)
            }
        };
        self.draft = draft;
        self.mode = Some(mode.clone());
        events.emit(ConsoleEvent::DraftOpened(mode));
        Ok(())
    }

    /// Open the form in edit mode on the cached product with `id`.
    pub fn open_edit(&mut self, id: &str, events: &EventBus) -> Result<()> {
        let product = self
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ConsoleError::NotFound(format!("product {}", id)))?;
        self.open_draft(DraftSource::Existing(&product), events)
    }

    pub fn update_draft_field(
        &mut self,
        field: ProductField,
        input: FieldInput,
        events: &EventBus,
    ) -> Result<()> {
        if self.mode.is_none() {
            return Err(ConsoleError::NoDraft);
        }
        self.draft.apply(field, input)?;
        events.emit(ConsoleEvent::DraftChanged(field));
        Ok(())
    }

    /// Like [`update_draft_field`](Self::update_draft_field), with the field
    /// given by its wire name. Unknown names are rejected.
    pub fn update_draft_field_by_name(
        &mut self,
        name: &str,
        input: FieldInput,
        events: &EventBus,
    ) -> Result<()> {
        let field: ProductField = name.parse()?;
        self.update_draft_field(field, input, events)
    }

    /// Send the draft to the remote.
    ///
    /// Success closes the form, resets the draft, and re-fetches the list.
    /// Failure raises an alert and leaves the draft and form as they were.
    pub fn submit_draft(&mut self, client: &mut ApiClient, events: &EventBus) -> Result<()> {
        let mode = self.mode.clone().ok_or(ConsoleError::NoDraft)?;
        let result = match &mode {
            DraftMode::Create => client.create_product(&self.draft),
            DraftMode::Edit { original_id } => client.update_product(original_id, &self.draft),
        };

        if let Err(e) = result {
            log::warn!("submit ({:?}) failed: {}", mode, e);
            events.emit(ConsoleEvent::Alert(e.user_message(config::MUTATION_FAILED_ALERT)));
            return Err(e);
        }

        self.close_form(events);
        self.refetch(client, events);
        Ok(())
    }

    pub fn cancel_draft(&mut self, events: &EventBus) {
        if self.mode.is_some() {
            self.close_form(events);
        }
    }

    fn close_form(&mut self, events: &EventBus) {
        self.mode = None;
        self.draft = Product::empty();
        events.emit(ConsoleEvent::DraftClosed);
    }

    // -- Delete ------------------------------------------------------------

    /// Delete a product and re-fetch. On failure the list is left untouched.
    pub fn delete_product(&mut self, client: &mut ApiClient, id: &str, events: &EventBus) -> Result<()> {
        if let Err(e) = client.delete_product(id) {
            log::warn!("delete of {} failed: {}", id, e);
            events.emit(ConsoleEvent::Alert(e.user_message(config::MUTATION_FAILED_ALERT)));
            return Err(e);
        }

        if self.selected.as_ref().is_some_and(|p| p.id == id) {
            self.clear_selection(events);
        }
        self.refetch(client, events);
        Ok(())
    }

    // -- Detail ------------------------------------------------------------

    /// Show `product` in the detail view. Independent of the draft.
    pub fn select_for_detail(&mut self, product: &Product, events: &EventBus) {
        self.selected = Some(product.clone());
        events.emit(ConsoleEvent::DetailSelected(Some(product.id.clone())));
    }

    pub fn clear_selection(&mut self, events: &EventBus) {
        if self.selected.take().is_some() {
            events.emit(ConsoleEvent::DetailSelected(None));
        }
    }
}
