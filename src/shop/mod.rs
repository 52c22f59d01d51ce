//! E-commerce platform connector
//!
//! Products, categories, customers and orders served as bare JSON arrays
//! and paged with `page`/`per_page`. Credentials travel in the query
//! string or as HTTP basic auth.

mod connector;
mod models;

pub use connector::{probe_api_version, ShopConnector, SUPPORTED_API_VERSIONS};
pub use models::{Address, Category, CategoryRef, Customer, LineItem, Order, Product};

#[cfg(test)]
mod tests;
