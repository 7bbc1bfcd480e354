pub mod catalog;
pub mod chrome;
pub mod endpoint;
pub mod form;
pub mod inventory;
pub mod order;
pub mod storefront;
pub mod submit;

#[cfg(test)]
pub(crate) mod fake_endpoint;

pub use storefront::Storefront;
