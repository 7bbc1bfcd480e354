use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Stock levels reported by the remote inventory, keyed by product id.
pub type InventoryLevels = HashMap<u32, u32>;

/// Highest count still shown in the low-stock band.
pub const LOW_STOCK_THRESHOLD: u32 = 3;

/// A menu item as shown on the storefront.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub available_count: u32,
}

/// Display band for a product's stock. Serialized by variant name so the
/// templates can derive CSS classes from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockBand {
    OutOfStock,
    LowStock,
    InStock,
}

impl StockBand {
    pub fn for_count(count: u32) -> Self {
        match count {
            0 => StockBand::OutOfStock,
            n if n <= LOW_STOCK_THRESHOLD => StockBand::LowStock,
            _ => StockBand::InStock,
        }
    }
}

/// Formats an amount the way the storefront displays money.
pub fn format_price(amount: f64) -> String {
    format!("Q{amount:.2}")
}

impl Product {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        image_url: impl Into<String>,
        available_count: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            price,
            image_url: image_url.into(),
            available_count,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available_count > 0
    }

    pub fn stock_band(&self) -> StockBand {
        StockBand::for_count(self.available_count)
    }

    pub fn stock_label(&self) -> String {
        match self.stock_band() {
            StockBand::OutOfStock => "AGOTADO".to_string(),
            StockBand::LowStock => format!("ÚLTIMOS {}", self.available_count),
            StockBand::InStock => format!("Disponible: {}", self.available_count),
        }
    }

    /// Text of this product's entry in the order form selector.
    pub fn option_label(&self) -> String {
        format!("{} - {}", self.name, format_price(self.price))
    }
}

/// Immutable snapshot of the menu. Inventory updates produce a new snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    products: Arc<[Product]>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into(),
        }
    }

    /// The built-in menu used until (or instead of) a successful inventory sync.
    pub fn fallback() -> Self {
        Self::new(vec![
            Product::new(
                1,
                "Galletas de chispas con helado",
                "Galletas artesanales con helado de vainilla",
                12.00,
                "https://i.postimg.cc/SsN7QH69/Copilot-20250804-213734.png",
                8,
            ),
            Product::new(
                2,
                "Pan de Banano",
                "El clásico pan de banano con nueces",
                6.00,
                "https://i.postimg.cc/HkNV8R15/Copilot-20250804-214620.png",
                12,
            ),
            Product::new(
                3,
                "Campechanas",
                "Deliciosas campechanas horneadas",
                3.00,
                "https://i.postimg.cc/3JVTXTWK/Copilot-20250804-215035.png",
                15,
            ),
        ])
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products that may be ordered, in menu order.
    pub fn available(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_available())
    }

    /// Returns a new snapshot with remote stock counts applied. Products missing
    /// from `levels` keep their current count; ids unknown to the menu are ignored.
    pub fn with_inventory(&self, levels: &InventoryLevels) -> Catalog {
        let products = self
            .products
            .iter()
            .map(|product| match levels.get(&product.id) {
                Some(&count) => Product {
                    available_count: count,
                    ..product.clone()
                },
                None => product.clone(),
            })
            .collect::<Vec<_>>();
        Catalog::new(products)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::fallback()
    }
}
