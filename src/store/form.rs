use serde::Serialize;
use thiserror::Error;

use super::catalog::Catalog;
use super::order::{
    Confirmation, OrderNumber, OrderRequest, OrderSummary, format_amount, line_total,
    parse_quantity,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Unknown product: {0}")]
    UnknownProduct(u32),
    #[error("Product {0} is sold out")]
    ProductUnavailable(u32),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid quantity: {0:?}")]
    InvalidQuantity(String),
    #[error("Order already submitted; start a new order first")]
    NotEditing,
}

/// Which half of the order section is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormStage {
    Editing,
    Confirmed,
}

/// Entry in the product selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductOption {
    pub id: u32,
    pub label: String,
    pub price: f64,
}

/// Selector entries for every product still in stock, in menu order.
pub fn product_options(catalog: &Catalog) -> Vec<ProductOption> {
    catalog
        .available()
        .map(|p| ProductOption {
            id: p.id,
            label: p.option_label(),
            price: p.price,
        })
        .collect()
}

/// Current values of the order form fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderDraft {
    pub customer_name: String,
    pub phone: String,
    pub product_id: Option<u32>,
    pub product_label: String,
    pub quantity: String,
    pub unit_price: Option<f64>,
    pub note: String,
}

impl OrderDraft {
    pub fn total(&self) -> f64 {
        line_total(parse_quantity(&self.quantity), self.unit_price.unwrap_or(0.0))
    }

    /// Value of the read-only total field.
    pub fn total_display(&self) -> String {
        format_amount(self.total())
    }
}

/// Controller for the order section: `Editing -> Confirmed` on submit,
/// back to `Editing` on a new order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderForm {
    stage: FormStage,
    draft: OrderDraft,
    confirmation: Option<Confirmation>,
}

impl Default for OrderForm {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderForm {
    pub fn new() -> Self {
        Self {
            stage: FormStage::Editing,
            draft: OrderDraft::default(),
            confirmation: None,
        }
    }

    pub fn stage(&self) -> FormStage {
        self.stage
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    fn ensure_editing(&self) -> Result<(), FormError> {
        match self.stage {
            FormStage::Editing => Ok(()),
            FormStage::Confirmed => Err(FormError::NotEditing),
        }
    }

    pub fn set_customer(
        &mut self,
        name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<(), FormError> {
        self.ensure_editing()?;
        self.draft.customer_name = name.into();
        self.draft.phone = phone.into();
        Ok(())
    }

    pub fn set_note(&mut self, note: impl Into<String>) -> Result<(), FormError> {
        self.ensure_editing()?;
        self.draft.note = note.into();
        Ok(())
    }

    /// Picks a product from the selector and copies its price into the draft.
    pub fn select_product(&mut self, catalog: &Catalog, id: u32) -> Result<(), FormError> {
        self.ensure_editing()?;
        let product = catalog.get(id).ok_or(FormError::UnknownProduct(id))?;
        if !product.is_available() {
            return Err(FormError::ProductUnavailable(id));
        }
        self.draft.product_id = Some(product.id);
        self.draft.product_label = product.option_label();
        self.draft.unit_price = Some(product.price);
        Ok(())
    }

    /// Stores the raw quantity input; the total follows from it.
    pub fn set_quantity(&mut self, input: impl Into<String>) -> Result<String, FormError> {
        self.ensure_editing()?;
        self.draft.quantity = input.into();
        Ok(self.draft.total_display())
    }

    /// Captures the form, generates an order number and switches to the
    /// confirmation view. The returned request is meant for the submitter; the
    /// confirmation does not depend on its outcome.
    pub fn submit(&mut self, catalog: &Catalog) -> Result<(Confirmation, OrderRequest), FormError> {
        self.ensure_editing()?;
        let draft = &self.draft;
        if draft.customer_name.trim().is_empty() {
            return Err(FormError::MissingField("nombre"));
        }
        if draft.phone.trim().is_empty() {
            return Err(FormError::MissingField("telefono"));
        }
        let product_id = draft.product_id.ok_or(FormError::MissingField("producto"))?;
        let product = catalog
            .get(product_id)
            .ok_or(FormError::UnknownProduct(product_id))?;
        if !product.is_available() {
            return Err(FormError::ProductUnavailable(product_id));
        }
        if draft.quantity.trim().is_empty() {
            return Err(FormError::MissingField("cantidad"));
        }
        let quantity = parse_quantity(&draft.quantity);
        if quantity == 0 {
            return Err(FormError::InvalidQuantity(draft.quantity.clone()));
        }

        let note = draft.note.trim();
        let confirmation = Confirmation {
            order_number: OrderNumber::generate(),
            summary: OrderSummary {
                customer_name: draft.customer_name.clone(),
                phone: draft.phone.clone(),
                product: product.option_label(),
                quantity: quantity.to_string(),
                total: format_amount(line_total(quantity, product.price)),
                note: (!note.is_empty()).then(|| note.to_string()),
            },
        };
        let request = OrderRequest::from_confirmation(product_id, &confirmation);

        self.stage = FormStage::Confirmed;
        self.confirmation = Some(confirmation.clone());
        Ok((confirmation, request))
    }

    /// Re-reads the selected product from a fresh snapshot. A product that is
    /// gone or sold out is deselected; otherwise its price and label are refreshed.
    pub fn refresh_selection(&mut self, catalog: &Catalog) {
        let Some(id) = self.draft.product_id else {
            return;
        };
        match catalog.get(id).filter(|p| p.is_available()) {
            Some(product) => {
                self.draft.product_label = product.option_label();
                self.draft.unit_price = Some(product.price);
            }
            None => {
                self.draft.product_id = None;
                self.draft.product_label.clear();
                self.draft.unit_price = None;
            }
        }
    }

    /// "Nuevo pedido": show the form again with every field cleared.
    pub fn new_order(&mut self) {
        self.stage = FormStage::Editing;
        self.draft = OrderDraft::default();
        self.confirmation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::catalog::InventoryLevels;

    fn filled_form(catalog: &Catalog) -> OrderForm {
        let mut form = OrderForm::new();
        form.set_customer("Lucía", "5555-0000").unwrap();
        form.select_product(catalog, 2).unwrap();
        form.set_quantity("3").unwrap();
        form
    }

    #[test]
    fn test_sold_out_products_are_not_offered() {
        let catalog = Catalog::fallback().with_inventory(&InventoryLevels::from([(1, 0)]));
        let options = product_options(&catalog);
        let ids: Vec<u32> = options.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(options[0].label, "Pan de Banano - Q6.00");
        assert_eq!(options[0].price, 6.00);
    }

    #[test]
    fn test_select_product_then_quantity_updates_total() {
        let catalog = Catalog::fallback();
        let mut form = OrderForm::new();
        assert_eq!(form.draft().total_display(), "0.00");

        form.select_product(&catalog, 2).unwrap();
        assert_eq!(form.draft().unit_price, Some(6.00));
        assert_eq!(form.set_quantity("3").unwrap(), "18.00");
        assert_eq!(form.set_quantity("").unwrap(), "0.00");
        assert_eq!(form.set_quantity("muchos").unwrap(), "0.00");
    }

    #[test]
    fn test_quantity_before_product_totals_zero() {
        let mut form = OrderForm::new();
        assert_eq!(form.set_quantity("5").unwrap(), "0.00");
        form.select_product(&Catalog::fallback(), 1).unwrap();
        assert_eq!(form.draft().total_display(), "60.00");
    }

    #[test]
    fn test_select_rejects_unknown_and_sold_out_products() {
        let catalog = Catalog::fallback().with_inventory(&InventoryLevels::from([(3, 0)]));
        let mut form = OrderForm::new();
        assert_eq!(form.select_product(&catalog, 7), Err(FormError::UnknownProduct(7)));
        assert_eq!(form.select_product(&catalog, 3), Err(FormError::ProductUnavailable(3)));
        assert_eq!(form.draft().product_id, None);
    }

    #[test]
    fn test_submit_switches_to_confirmation() {
        let catalog = Catalog::fallback();
        let mut form = filled_form(&catalog);
        form.set_note("  ").unwrap();

        let (confirmation, request) = form.submit(&catalog).unwrap();

        assert_eq!(form.stage(), FormStage::Confirmed);
        assert_eq!(form.confirmation(), Some(&confirmation));
        assert!(confirmation.order_number.as_str().starts_with("ORD-"));
        assert_eq!(confirmation.summary.total, "18.00");
        assert_eq!(confirmation.summary.note, None);
        assert_eq!(request.product_id, "2");
        assert_eq!(request.product_name, "Pan de Banano - Q6.00");
        assert_eq!(request.note, "");
        assert_eq!(request.order_number, confirmation.order_number);
    }

    #[test]
    fn test_submit_requires_fields() {
        let catalog = Catalog::fallback();

        let mut form = OrderForm::new();
        assert_eq!(form.submit(&catalog).unwrap_err(), FormError::MissingField("nombre"));

        form.set_customer("Lucía", "").unwrap();
        assert_eq!(form.submit(&catalog).unwrap_err(), FormError::MissingField("telefono"));

        form.set_customer("Lucía", "5555-0000").unwrap();
        assert_eq!(form.submit(&catalog).unwrap_err(), FormError::MissingField("producto"));

        form.select_product(&catalog, 3).unwrap();
        assert_eq!(form.submit(&catalog).unwrap_err(), FormError::MissingField("cantidad"));

        form.set_quantity("0").unwrap();
        assert_eq!(
            form.submit(&catalog).unwrap_err(),
            FormError::InvalidQuantity("0".to_string())
        );
        assert_eq!(form.stage(), FormStage::Editing);
    }

    #[test]
    fn test_submit_rejects_product_sold_out_after_selection() {
        let mut form = filled_form(&Catalog::fallback());
        let sold_out = Catalog::fallback().with_inventory(&InventoryLevels::from([(2, 0)]));

        assert_eq!(form.submit(&sold_out).unwrap_err(), FormError::ProductUnavailable(2));
        assert_eq!(form.stage(), FormStage::Editing);
        assert!(form.confirmation().is_none());
    }

    #[test]
    fn test_refresh_selection_follows_new_snapshot() {
        let mut form = filled_form(&Catalog::fallback());
        let repriced = Catalog::new(vec![crate::store::catalog::Product::new(
            2,
            "Pan de Banano",
            "El clásico pan de banano con nueces",
            7.50,
            "https://example.com/pan.png",
            4,
        )]);
        form.refresh_selection(&repriced);
        assert_eq!(form.draft().unit_price, Some(7.50));
        assert_eq!(form.draft().product_label, "Pan de Banano - Q7.50");
        assert_eq!(form.draft().total_display(), "22.50");

        form.refresh_selection(&repriced.with_inventory(&InventoryLevels::from([(2, 0)])));
        assert_eq!(form.draft().product_id, None);
        assert_eq!(form.draft().unit_price, None);
        assert_eq!(form.draft().total_display(), "0.00");
    }

    #[test]
    fn test_summary_and_request_use_coerced_quantity() {
        let catalog = Catalog::fallback();
        let mut form = filled_form(&catalog);
        form.set_quantity(" 4 unidades").unwrap();

        let (confirmation, request) = form.submit(&catalog).unwrap();
        assert_eq!(confirmation.summary.quantity, "4");
        assert_eq!(confirmation.summary.total, "24.00");
        assert_eq!(request.quantity, "4");
        assert_eq!(request.total, "24.00");
    }

    #[test]
    fn test_confirmed_form_rejects_edits_until_new_order() {
        let catalog = Catalog::fallback();
        let mut form = filled_form(&catalog);
        form.submit(&catalog).unwrap();

        assert_eq!(form.submit(&catalog).unwrap_err(), FormError::NotEditing);
        assert_eq!(form.set_quantity("9").unwrap_err(), FormError::NotEditing);

        form.new_order();
        assert_eq!(form.stage(), FormStage::Editing);
        assert_eq!(form.draft(), &OrderDraft::default());
        assert!(form.confirmation().is_none());
    }
}
