use log::info;
use std::sync::Arc;

use super::catalog::Catalog;
use super::chrome::PageChrome;
use super::endpoint::StoreEndpoint;
use super::form::{FormError, OrderForm, ProductOption, product_options};
use super::inventory::{SyncOutcome, sync_catalog};
use super::order::Confirmation;
use super::submit::{PendingSubmission, SubmissionStatus, dispatch};

/// Everything the storefront page shows. Each user action is a method here and
/// the page is re-rendered from this value afterwards.
#[derive(Debug, Clone)]
pub struct Storefront {
    catalog: Catalog,
    loading: bool,
    form: OrderForm,
    chrome: PageChrome,
    submission: SubmissionStatus,
}

impl Storefront {
    pub fn new(chrome: PageChrome) -> Self {
        Self {
            catalog: Catalog::fallback(),
            loading: false,
            form: OrderForm::new(),
            chrome,
            submission: SubmissionStatus::NotSent,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn form(&self) -> &OrderForm {
        &self.form
    }

    pub fn chrome(&self) -> &PageChrome {
        &self.chrome
    }

    pub fn submission(&self) -> &SubmissionStatus {
        &self.submission
    }

    pub fn product_options(&self) -> Vec<ProductOption> {
        product_options(&self.catalog)
    }

    /// Page load: shows the loading indicator, reads the remote stock and
    /// swaps in the resulting snapshot. The indicator is cleared either way, and
    /// a selected product that sold out is dropped from the draft.
    pub fn load_inventory(&mut self, endpoint: &dyn StoreEndpoint) -> SyncOutcome {
        self.loading = true;
        let (catalog, outcome) = sync_catalog(endpoint, &self.catalog);
        self.catalog = catalog;
        self.form.refresh_selection(&self.catalog);
        self.loading = false;
        outcome
    }

    pub fn set_customer(&mut self, name: &str, phone: &str) -> Result<(), FormError> {
        self.form.set_customer(name, phone)
    }

    pub fn set_note(&mut self, note: &str) -> Result<(), FormError> {
        self.form.set_note(note)
    }

    pub fn select_product(&mut self, id: u32) -> Result<(), FormError> {
        self.form.select_product(&self.catalog, id)
    }

    /// Returns the refreshed total field.
    pub fn set_quantity(&mut self, input: &str) -> Result<String, FormError> {
        self.form.set_quantity(input)
    }

    /// Confirms the order on screen and starts sending it. The confirmation is
    /// final regardless of how the submission ends.
    pub fn submit(
        &mut self,
        endpoint: Arc<dyn StoreEndpoint>,
    ) -> Result<(Confirmation, PendingSubmission), FormError> {
        let (confirmation, request) = self.form.submit(&self.catalog)?;
        info!("Order {} confirmed", confirmation.order_number);
        self.submission = SubmissionStatus::Pending;
        Ok((confirmation, dispatch(endpoint, request)))
    }

    pub fn record_submission(&mut self, status: SubmissionStatus) {
        self.submission = status;
    }

    pub fn new_order(&mut self) {
        self.form.new_order();
        self.submission = SubmissionStatus::NotSent;
    }

    pub fn toggle_mobile_menu(&mut self) {
        self.chrome.toggle_mobile_menu();
    }

    pub fn close_mobile_menu(&mut self) {
        self.chrome.close_mobile_menu();
    }
}
