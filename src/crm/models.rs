//! CRM platform models

use crate::connector::{Endpoint, Entity};
use crate::mapping::coerce::{field_f64, field_i64, field_list, field_object, field_str, to_f64, to_i64};
use crate::mapping::{Model, WireObject};
use crate::pagination::CursorStyle;
use crate::types::{JsonObject, JsonValue, Record};
use serde::Serialize;

/// Connection status of a linked messenger account that counts as live
pub const CONNECTED_STATUS: &str = "OK";

const ACTIVE: &str = "active";

// ============================================================================
// Client
// ============================================================================

/// A person known to the CRM
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Raw status; absent means active
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Number of linked messenger accounts
    pub linked_accounts: usize,
    /// Whether any linked account reports a live connection
    pub has_connected_account: bool,
    pub metadata: JsonObject,
}

impl Client {
    /// Create a client with a name, for writes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether the client is active.
    ///
    /// Clients with linked accounts are active when one of them is
    /// connected; otherwise the status field decides.
    pub fn is_active(&self) -> bool {
        if self.linked_accounts > 0 {
            self.has_connected_account
        } else {
            self.status.as_deref().map_or(true, |s| s == ACTIVE)
        }
    }

    /// Name, or email when the name is empty
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.email.as_deref().unwrap_or_default()
        } else {
            &self.name
        }
    }
}

impl Model for Client {
    fn from_record(record: &Record) -> Self {
        let accounts = field_list(record, "accounts");
        Self {
            id: field_i64(record, "id"),
            name: field_str(record, "name").unwrap_or_default(),
            email: field_str(record, "email"),
            phone: field_str(record, "phone"),
            status: field_str(record, "status"),
            created_at: field_str(record, "created_at"),
            updated_at: field_str(record, "updated_at"),
            linked_accounts: accounts.len(),
            has_connected_account: accounts.iter().any(|account| {
                field_str(account, "connection_status").as_deref() == Some(CONNECTED_STATUS)
            }),
            metadata: field_object(record, "metadata"),
        }
    }

    fn to_wire(&self) -> JsonObject {
        WireObject::new()
            .id("id", self.id)
            .str_nonempty("name", &self.name)
            .opt_str("email", self.email.as_deref())
            .opt_str("phone", self.phone.as_deref())
            .opt_str("status", self.status.as_deref())
            .object_nonempty("metadata", &self.metadata)
            .build()
    }
}

impl Entity for Client {
    const ENDPOINT: Endpoint = Endpoint {
        resource: "Client",
        collection: "/people",
        item: "/people/{id}",
        record_hint: Some("people"),
        cursor: CursorStyle::OFFSET,
    };
}

// ============================================================================
// Product
// ============================================================================

/// A product in the CRM catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub sku: Option<String>,
    pub price: f64,
    pub description: Option<String>,
    pub category: Option<String>,
    pub stock_quantity: i64,
    /// Raw status; absent means active
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub metadata: JsonObject,
}

impl Product {
    fn is_active(&self) -> bool {
        self.status.as_deref().map_or(true, |s| s == ACTIVE)
    }

    /// Active with stock left
    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0 && self.is_active()
    }

    /// Whether the product can be ordered
    pub fn is_available(&self) -> bool {
        self.is_active() && self.is_in_stock()
    }
}

impl Model for Product {
    fn from_record(record: &Record) -> Self {
        Self {
            id: field_i64(record, "id"),
            name: field_str(record, "name").unwrap_or_default(),
            sku: field_str(record, "sku"),
            price: field_f64(record, "price"),
            description: field_str(record, "description"),
            category: field_str(record, "category"),
            stock_quantity: field_i64(record, "stock_quantity"),
            status: field_str(record, "status"),
            created_at: field_str(record, "created_at"),
            updated_at: field_str(record, "updated_at"),
            metadata: field_object(record, "metadata"),
        }
    }

    fn to_wire(&self) -> JsonObject {
        let mut wire = WireObject::new()
            .id("id", self.id)
            .str_nonempty("name", &self.name)
            .opt_str("sku", self.sku.as_deref())
            .nonzero("price", self.price)
            .opt_str("description", self.description.as_deref())
            .opt_str("category", self.category.as_deref())
            .opt_str("status", self.status.as_deref());
        if self.stock_quantity != 0 {
            wire = wire.field("stock_quantity", self.stock_quantity);
        }
        wire.object_nonempty("metadata", &self.metadata).build()
    }
}

impl Entity for Product {
    const ENDPOINT: Endpoint = Endpoint {
        resource: "Product",
        collection: "/products",
        item: "/products/{id}",
        record_hint: Some("products"),
        cursor: CursorStyle::PAGE,
    };
}

// ============================================================================
// Order
// ============================================================================

/// One line of an order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderItem {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    /// Line total; `quantity * price` when the API omits it
    pub total: f64,
}

impl OrderItem {
    fn from_record(record: &JsonValue) -> Self {
        let quantity = record.get("quantity").map_or(1, to_i64);
        let price = field_f64(record, "price");
        let total = record.get("total").map_or(0.0, to_f64);
        Self {
            product_id: field_i64(record, "product_id"),
            product_name: field_str(record, "product_name").unwrap_or_default(),
            quantity,
            price,
            total: if total == 0.0 {
                quantity as f64 * price
            } else {
                total
            },
        }
    }

    fn to_wire(&self) -> JsonValue {
        JsonValue::Object(
            WireObject::new()
                .id("product_id", self.product_id)
                .str_nonempty("product_name", &self.product_name)
                .field("quantity", self.quantity)
                .field("price", self.price)
                .build(),
        )
    }
}

/// An order placed by a client
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Order {
    pub id: i64,
    pub client_id: i64,
    pub client_name: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    /// Raw status; absent means pending
    pub status: Option<String>,
    pub shipping_address: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub metadata: JsonObject,
}

impl Order {
    /// Status with the pending default applied
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("pending")
    }

    pub fn is_completed(&self) -> bool {
        self.status() == "completed"
    }

    pub fn is_cancelled(&self) -> bool {
        self.status() == "cancelled"
    }

    pub fn items_count(&self) -> usize {
        self.items.len()
    }
}

impl Model for Order {
    fn from_record(record: &Record) -> Self {
        Self {
            id: field_i64(record, "id"),
            client_id: field_i64(record, "client_id"),
            client_name: field_str(record, "client_name").unwrap_or_default(),
            items: field_list(record, "items")
                .iter()
                .map(OrderItem::from_record)
                .collect(),
            total_amount: field_f64(record, "total_amount"),
            status: field_str(record, "status"),
            shipping_address: field_str(record, "shipping_address"),
            created_at: field_str(record, "created_at"),
            updated_at: field_str(record, "updated_at"),
            metadata: field_object(record, "metadata"),
        }
    }

    fn to_wire(&self) -> JsonObject {
        WireObject::new()
            .id("id", self.id)
            .id("client_id", self.client_id)
            .str_nonempty("client_name", &self.client_name)
            .list_nonempty("items", self.items.iter().map(OrderItem::to_wire).collect())
            .nonzero("total_amount", self.total_amount)
            .opt_str("status", self.status.as_deref())
            .opt_str("shipping_address", self.shipping_address.as_deref())
            .object_nonempty("metadata", &self.metadata)
            .build()
    }
}

impl Entity for Order {
    const ENDPOINT: Endpoint = Endpoint {
        resource: "Order",
        collection: "/orders",
        item: "/orders/{id}",
        record_hint: Some("orders"),
        cursor: CursorStyle::PAGE,
    };
}

// ============================================================================
// Template Category
// ============================================================================

/// A category of message templates
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TemplateCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Templates listed inline under the category
    pub templates_count: usize,
}

impl Model for TemplateCategory {
    fn from_record(record: &Record) -> Self {
        Self {
            id: field_i64(record, "id"),
            name: field_str(record, "name")
                .or_else(|| field_str(record, "title"))
                .unwrap_or_default(),
            description: field_str(record, "description"),
            templates_count: field_list(record, "templates").len(),
        }
    }

    fn to_wire(&self) -> JsonObject {
        WireObject::new()
            .id("id", self.id)
            .str_nonempty("name", &self.name)
            .opt_str("description", self.description.as_deref())
            .build()
    }
}

impl Entity for TemplateCategory {
    const ENDPOINT: Endpoint = Endpoint {
        resource: "Template category",
        collection: "/categories/templates",
        item: "/categories/templates/{id}",
        record_hint: Some("categories"),
        cursor: CursorStyle::Single,
    };
}
