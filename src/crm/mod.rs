//! Messaging/CRM platform connector
//!
//! People, products, orders and message template categories, with
//! header-based key pair or bearer authentication.

mod connector;
mod models;

pub use connector::CrmConnector;
pub use models::{Client, Order, OrderItem, Product, TemplateCategory, CONNECTED_STATUS};
