//! E-commerce platform models
//!
//! Money amounts arrive as decimal strings and are coerced to `f64`.

use crate::connector::{Endpoint, Entity};
use crate::mapping::coerce::{
    field_bool, field_f64, field_i64, field_list, field_str, field_u64, to_f64,
};
use crate::mapping::{Model, WireObject};
use crate::pagination::CursorStyle;
use crate::types::{JsonObject, JsonValue, Record};
use serde::Serialize;

/// Render an amount the way write endpoints expect it
fn money(value: f64) -> String {
    format!("{value:.2}")
}

// ============================================================================
// Address
// ============================================================================

/// Billing or shipping address
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Address {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Address {
    fn from_value(value: Option<&JsonValue>) -> Self {
        let Some(record) = value.filter(|v| v.is_object()) else {
            return Self::default();
        };
        Self {
            first_name: field_str(record, "first_name"),
            last_name: field_str(record, "last_name"),
            company: field_str(record, "company"),
            address_1: field_str(record, "address_1"),
            address_2: field_str(record, "address_2"),
            city: field_str(record, "city"),
            state: field_str(record, "state"),
            postcode: field_str(record, "postcode"),
            country: field_str(record, "country"),
            email: field_str(record, "email"),
            phone: field_str(record, "phone"),
        }
    }

    fn to_wire(&self) -> JsonObject {
        WireObject::new()
            .opt_str("first_name", self.first_name.as_deref())
            .opt_str("last_name", self.last_name.as_deref())
            .opt_str("company", self.company.as_deref())
            .opt_str("address_1", self.address_1.as_deref())
            .opt_str("address_2", self.address_2.as_deref())
            .opt_str("city", self.city.as_deref())
            .opt_str("state", self.state.as_deref())
            .opt_str("postcode", self.postcode.as_deref())
            .opt_str("country", self.country.as_deref())
            .opt_str("email", self.email.as_deref())
            .opt_str("phone", self.phone.as_deref())
            .build()
    }

    /// Street, city, state, postcode and country joined with commas
    pub fn formatted(&self) -> String {
        [
            &self.address_1,
            &self.address_2,
            &self.city,
            &self.state,
            &self.postcode,
            &self.country,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

// ============================================================================
// Product
// ============================================================================

/// Category reference embedded in a product
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// A store product
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub permalink: Option<String>,
    pub product_type: Option<String>,
    pub status: Option<String>,
    pub sku: Option<String>,
    pub price: f64,
    pub regular_price: f64,
    /// Sale price; `None` when no sale price is set
    pub sale_price: Option<f64>,
    pub on_sale: bool,
    pub stock_quantity: i64,
    pub stock_status: Option<String>,
    pub total_sales: u64,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub categories: Vec<CategoryRef>,
    pub date_created: Option<String>,
    pub date_modified: Option<String>,
}

impl Product {
    /// Create a product with a name and regular price, for writes
    pub fn new(name: impl Into<String>, regular_price: f64) -> Self {
        Self {
            name: name.into(),
            regular_price,
            ..Default::default()
        }
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock_status.as_deref() == Some("instock")
    }

    /// On sale with a sale price set
    pub fn is_on_sale(&self) -> bool {
        self.on_sale && self.sale_price.is_some()
    }

    /// Discount relative to the regular price, rounded to two decimals
    pub fn discount_percentage(&self) -> Option<f64> {
        let sale = self.sale_price.filter(|_| self.is_on_sale())?;
        if self.regular_price <= 0.0 {
            return None;
        }
        let percent = (self.regular_price - sale) / self.regular_price * 100.0;
        Some((percent * 100.0).round() / 100.0)
    }

    /// Names of the product's categories in API order
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }
}

impl Model for Product {
    fn from_record(record: &Record) -> Self {
        Self {
            id: field_i64(record, "id"),
            name: field_str(record, "name").unwrap_or_default(),
            slug: field_str(record, "slug"),
            permalink: field_str(record, "permalink"),
            product_type: field_str(record, "type"),
            status: field_str(record, "status"),
            sku: field_str(record, "sku"),
            price: field_f64(record, "price"),
            regular_price: field_f64(record, "regular_price"),
            sale_price: field_str(record, "sale_price").map(|s| to_f64(&JsonValue::String(s))),
            on_sale: field_bool(record, "on_sale"),
            stock_quantity: field_i64(record, "stock_quantity"),
            stock_status: field_str(record, "stock_status"),
            total_sales: field_u64(record, "total_sales"),
            description: field_str(record, "description"),
            short_description: field_str(record, "short_description"),
            categories: field_list(record, "categories")
                .iter()
                .map(|c| CategoryRef {
                    id: field_i64(c, "id"),
                    name: field_str(c, "name").unwrap_or_default(),
                    slug: field_str(c, "slug").unwrap_or_default(),
                })
                .collect(),
            date_created: field_str(record, "date_created"),
            date_modified: field_str(record, "date_modified"),
        }
    }

    fn to_wire(&self) -> JsonObject {
        let mut wire = WireObject::new()
            .id("id", self.id)
            .str_nonempty("name", &self.name)
            .opt_str("slug", self.slug.as_deref())
            .opt_str("type", self.product_type.as_deref())
            .opt_str("status", self.status.as_deref())
            .opt_str("sku", self.sku.as_deref())
            .opt_str("description", self.description.as_deref())
            .opt_str("short_description", self.short_description.as_deref())
            .opt_str("stock_status", self.stock_status.as_deref());
        if self.regular_price > 0.0 {
            wire = wire.field("regular_price", money(self.regular_price));
        }
        if let Some(sale) = self.sale_price {
            wire = wire.field("sale_price", money(sale));
        }
        if self.stock_quantity != 0 {
            wire = wire.field("stock_quantity", self.stock_quantity);
        }
        wire.list_nonempty(
            "categories",
            self.categories
                .iter()
                .filter(|c| c.id != 0)
                .map(|c| serde_json::json!({ "id": c.id }))
                .collect(),
        )
        .build()
    }
}

impl Entity for Product {
    const ENDPOINT: Endpoint = Endpoint {
        resource: "Product",
        collection: "/products",
        item: "/products/{id}",
        record_hint: None,
        cursor: CursorStyle::PAGE_PER_PAGE,
    };
}

// ============================================================================
// Category
// ============================================================================

/// A product category
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    /// Parent category; `None` for top-level categories
    pub parent: Option<i64>,
    pub description: Option<String>,
    pub count: u64,
}

impl Model for Category {
    fn from_record(record: &Record) -> Self {
        let parent = field_i64(record, "parent");
        Self {
            id: field_i64(record, "id"),
            name: field_str(record, "name").unwrap_or_default(),
            slug: field_str(record, "slug").unwrap_or_default(),
            parent: (parent != 0).then_some(parent),
            description: field_str(record, "description"),
            count: field_u64(record, "count"),
        }
    }

    fn to_wire(&self) -> JsonObject {
        WireObject::new()
            .id("id", self.id)
            .str_nonempty("name", &self.name)
            .str_nonempty("slug", &self.slug)
            .id("parent", self.parent.unwrap_or(0))
            .opt_str("description", self.description.as_deref())
            .build()
    }
}

impl Entity for Category {
    const ENDPOINT: Endpoint = Endpoint {
        resource: "Category",
        collection: "/products/categories",
        item: "/products/categories/{id}",
        record_hint: None,
        cursor: CursorStyle::PAGE_PER_PAGE,
    };
}

// ============================================================================
// Customer
// ============================================================================

/// A store customer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Customer {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<String>,
    pub billing: Address,
    pub shipping: Address,
    pub is_paying_customer: bool,
    pub avatar_url: Option<String>,
    pub date_created: Option<String>,
    pub date_modified: Option<String>,
}

impl Customer {
    /// First and last name, or the email when both are empty
    pub fn full_name(&self) -> String {
        let name = [self.first_name.as_str(), self.last_name.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            self.email.clone()
        } else {
            name
        }
    }

    /// Phone from the billing address
    pub fn phone(&self) -> Option<&str> {
        self.billing.phone.as_deref()
    }

    /// Formatted billing address
    pub fn billing_address(&self) -> String {
        self.billing.formatted()
    }
}

impl Model for Customer {
    fn from_record(record: &Record) -> Self {
        Self {
            id: field_i64(record, "id"),
            email: field_str(record, "email").unwrap_or_default(),
            username: field_str(record, "username"),
            first_name: field_str(record, "first_name").unwrap_or_default(),
            last_name: field_str(record, "last_name").unwrap_or_default(),
            role: field_str(record, "role"),
            billing: Address::from_value(record.get("billing")),
            shipping: Address::from_value(record.get("shipping")),
            is_paying_customer: field_bool(record, "is_paying_customer"),
            avatar_url: field_str(record, "avatar_url"),
            date_created: field_str(record, "date_created"),
            date_modified: field_str(record, "date_modified"),
        }
    }

    fn to_wire(&self) -> JsonObject {
        WireObject::new()
            .id("id", self.id)
            .str_nonempty("email", &self.email)
            .opt_str("username", self.username.as_deref())
            .str_nonempty("first_name", &self.first_name)
            .str_nonempty("last_name", &self.last_name)
            .object_nonempty("billing", &self.billing.to_wire())
            .object_nonempty("shipping", &self.shipping.to_wire())
            .build()
    }
}

impl Entity for Customer {
    const ENDPOINT: Endpoint = Endpoint {
        resource: "Customer",
        collection: "/customers",
        item: "/customers/{id}",
        record_hint: None,
        cursor: CursorStyle::PAGE_PER_PAGE,
    };
}

// ============================================================================
// Order
// ============================================================================

/// One product line of an order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineItem {
    pub id: i64,
    pub name: String,
    pub product_id: i64,
    pub variation_id: i64,
    pub quantity: i64,
    pub sku: Option<String>,
    pub price: f64,
    pub subtotal: f64,
    pub total: f64,
}

impl LineItem {
    fn from_record(record: &JsonValue) -> Self {
        Self {
            id: field_i64(record, "id"),
            name: field_str(record, "name").unwrap_or_default(),
            product_id: field_i64(record, "product_id"),
            variation_id: field_i64(record, "variation_id"),
            quantity: field_i64(record, "quantity"),
            sku: field_str(record, "sku"),
            price: field_f64(record, "price"),
            subtotal: field_f64(record, "subtotal"),
            total: field_f64(record, "total"),
        }
    }

    fn to_wire(&self) -> JsonValue {
        JsonValue::Object(
            WireObject::new()
                .id("product_id", self.product_id)
                .id("variation_id", self.variation_id)
                .field("quantity", self.quantity.max(1))
                .build(),
        )
    }
}

/// A store order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Order {
    pub id: i64,
    pub number: Option<String>,
    /// Raw status; absent means pending
    pub status: Option<String>,
    pub currency: Option<String>,
    pub total: f64,
    pub total_tax: f64,
    pub shipping_total: f64,
    pub discount_total: f64,
    pub customer_id: i64,
    pub customer_note: Option<String>,
    pub billing: Address,
    pub shipping: Address,
    pub payment_method: Option<String>,
    pub payment_method_title: Option<String>,
    pub line_items: Vec<LineItem>,
    pub date_created: Option<String>,
    pub date_modified: Option<String>,
}

impl Order {
    /// Status with the pending default applied
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("pending")
    }

    pub fn is_completed(&self) -> bool {
        self.status() == "completed"
    }

    pub fn items_count(&self) -> usize {
        self.line_items.len()
    }

    /// Email from the billing address
    pub fn customer_email(&self) -> Option<&str> {
        self.billing.email.as_deref()
    }

    /// Billing first and last name
    pub fn customer_name(&self) -> String {
        [&self.billing.first_name, &self.billing.last_name]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Model for Order {
    fn from_record(record: &Record) -> Self {
        Self {
            id: field_i64(record, "id"),
            number: field_str(record, "number"),
            status: field_str(record, "status"),
            currency: field_str(record, "currency"),
            total: field_f64(record, "total"),
            total_tax: field_f64(record, "total_tax"),
            shipping_total: field_f64(record, "shipping_total"),
            discount_total: field_f64(record, "discount_total"),
            customer_id: field_i64(record, "customer_id"),
            customer_note: field_str(record, "customer_note"),
            billing: Address::from_value(record.get("billing")),
            shipping: Address::from_value(record.get("shipping")),
            payment_method: field_str(record, "payment_method"),
            payment_method_title: field_str(record, "payment_method_title"),
            line_items: field_list(record, "line_items")
                .iter()
                .map(LineItem::from_record)
                .collect(),
            date_created: field_str(record, "date_created"),
            date_modified: field_str(record, "date_modified"),
        }
    }

    fn to_wire(&self) -> JsonObject {
        WireObject::new()
            .id("id", self.id)
            .opt_str("status", self.status.as_deref())
            .opt_str("currency", self.currency.as_deref())
            .id("customer_id", self.customer_id)
            .opt_str("customer_note", self.customer_note.as_deref())
            .object_nonempty("billing", &self.billing.to_wire())
            .object_nonempty("shipping", &self.shipping.to_wire())
            .opt_str("payment_method", self.payment_method.as_deref())
            .opt_str("payment_method_title", self.payment_method_title.as_deref())
            .list_nonempty(
                "line_items",
                self.line_items.iter().map(LineItem::to_wire).collect(),
            )
            .build()
    }
}

impl Entity for Order {
    const ENDPOINT: Endpoint = Endpoint {
        resource: "Order",
        collection: "/orders",
        item: "/orders/{id}",
        record_hint: None,
        cursor: CursorStyle::PAGE_PER_PAGE,
    };
}
