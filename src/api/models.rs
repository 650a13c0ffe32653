//! Wire models for the storefront REST API.
//!
//! Field names follow the backend's camelCase JSON. Money is carried as
//! `f64`, the way the backend's JSON numbers arrive.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::types::{CategoryId, Member, OrderId, OrderItemId, PaymentId, ProductId, TokenPair};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl SignupRequest {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
            phone: None,
            address: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: TokenPair,
    pub member: Member,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub category_name: Option<String>,
}

impl Product {
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Cart line source for this product.
    #[must_use]
    pub fn to_cart_product(&self) -> crate::cart::CartProduct {
        crate::cart::CartProduct {
            product_id: self.id,
            name: self.name.clone(),
            price: self.price,
            image_url: self.image_url.clone(),
            stock_quantity: self.stock_quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

/// Partial product update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Product search filters. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductSearch {
    pub keyword: Option<String>,
    pub category_id: Option<CategoryId>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub in_stock: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<SortDirection>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl ProductSearch {
    #[must_use]
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    #[must_use]
    pub fn in_stock_only(mut self) -> Self {
        self.in_stock = Some(true);
        self
    }

    #[must_use]
    pub fn sorted_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_by = Some(field.into());
        self.sort_direction = Some(direction);
        self
    }

    #[must_use]
    pub fn page(mut self, page: u32, size: u32) -> Self {
        self.page = Some(page);
        self.size = Some(size);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    #[serde(default)]
    pub parent_name: Option<String>,
    /// Populated by the tree endpoint only.
    #[serde(default)]
    pub children: Vec<Category>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Order (and order line) lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    PendingPayment,
    Paid,
    Preparing,
    Shipped,
    Delivered,
    Cancelled,
    RefundRequested,
    Refunded,
}

impl OrderStatus {
    /// States reachable from `self` in one step.
    #[must_use]
    pub fn next_states(self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            PendingPayment => &[Paid, Cancelled],
            Paid => &[Preparing, Cancelled, RefundRequested],
            Preparing => &[Shipped, Cancelled],
            Shipped => &[Delivered],
            Delivered => &[RefundRequested],
            RefundRequested => &[Refunded],
            Cancelled | Refunded => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        self.next_states().contains(&target)
    }

    #[must_use]
    pub fn is_cancellable(self) -> bool {
        self.can_transition_to(OrderStatus::Cancelled)
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self.next_states().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct OrderItem {
    pub order_item_id: OrderItemId,
    pub product_id: ProductId,
    /// Product name at order time.
    pub snapshot_product_name: String,
    /// Unit price at order time.
    pub snapshot_price: f64,
    pub quantity: u32,
    pub subtotal: f64,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Order {
    pub order_id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub shipping_address: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    pub shipping_address: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub items: Vec<crate::cart::OrderLine>,
}

impl CreateOrder {
    /// Order request for everything in `cart`.
    #[must_use]
    pub fn from_cart(
        cart: &crate::cart::Cart,
        shipping_address: impl Into<String>,
        receiver_name: impl Into<String>,
        receiver_phone: impl Into<String>,
    ) -> Self {
        Self {
            shipping_address: shipping_address.into(),
            receiver_name: receiver_name.into(),
            receiver_phone: receiver_phone.into(),
            items: cart.to_order_items(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CancelRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct StatusChangeRequest<'a> {
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'a str>,
}

/// One status change in an order's audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistory {
    pub id: i64,
    #[serde(default)]
    pub previous_status: Option<OrderStatus>,
    pub new_status: OrderStatus,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub changed_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
    Refunded,
    PartiallyRefunded,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentRequest<'a> {
    pub order_id: OrderId,
    pub idempotency_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Payment {
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub idempotency_key: String,
    pub amount: f64,
    #[serde(default)]
    pub payment_method: Option<String>,
    pub status: PaymentStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Admin reporting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub total_revenue: f64,
    pub total_orders: u64,
    pub paid_orders: u64,
    pub new_members: u64,
    pub total_visitors: u64,
    pub conversion_rate: f64,
    pub online_users: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    pub date: Date,
    pub revenue: f64,
    pub order_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySales {
    pub category_id: CategoryId,
    pub category_name: String,
    pub revenue: f64,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub kpi: KpiSummary,
    #[serde(default)]
    pub daily_sales: Vec<DailySales>,
    #[serde(default)]
    pub category_sales: Vec<CategorySales>,
}

// ---------------------------------------------------------------------------
// Behaviour events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    PageView,
    ProductView,
    ProductClick,
    CartAdd,
    OrderStart,
    Search,
    Click,
    Custom,
}

impl EventType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PageView => "PAGE_VIEW",
            Self::ProductView => "PRODUCT_VIEW",
            Self::ProductClick => "PRODUCT_CLICK",
            Self::CartAdd => "CART_ADD",
            Self::OrderStart => "ORDER_START",
            Self::Search => "SEARCH",
            Self::Click => "CLICK",
            Self::Custom => "CUSTOM",
        }
    }
}

/// A user-behaviour event for the analytics pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEvent {
    pub event_type: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    /// Free-form JSON string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl TrackEvent {
    #[must_use]
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            session_id: None,
            page_url: None,
            referrer_url: None,
            target_id: None,
            target_type: None,
            metadata: None,
            duration_ms: None,
        }
    }

    #[must_use]
    pub fn page_view(page_url: impl Into<String>) -> Self {
        Self {
            page_url: Some(page_url.into()),
            ..Self::new(EventType::PageView)
        }
    }

    #[must_use]
    pub fn product_view(product_id: ProductId) -> Self {
        Self {
            target_id: Some(product_id.0),
            target_type: Some("PRODUCT".into()),
            ..Self::new(EventType::ProductView)
        }
    }

    #[must_use]
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_transitions() {
        use OrderStatus::*;

        assert!(PendingPayment.can_transition_to(Paid));
        assert!(Paid.can_transition_to(RefundRequested));
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Paid));
        assert!(RefundRequested.can_transition_to(Refunded));

        assert!(PendingPayment.is_cancellable());
        assert!(Preparing.is_cancellable());
        assert!(!Shipped.is_cancellable());

        assert!(Cancelled.is_terminal());
        assert!(Refunded.is_terminal());
        assert!(!Delivered.is_terminal());
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::PendingPayment).unwrap(),
            "\"PENDING_PAYMENT\""
        );
        let s: OrderStatus = serde_json::from_str("\"REFUND_REQUESTED\"").unwrap();
        assert_eq!(s, OrderStatus::RefundRequested);
    }

    #[test]
    fn order_from_backend_json() {
        let json = r#"{
            "orderId": 12,
            "orderNumber": "ORD-20240501-0001",
            "status": "PAID",
            "totalAmount": 30000,
            "shippingAddress": "Seoul",
            "receiverName": "Kim",
            "receiverPhone": "010-1234-5678",
            "items": [{
                "orderItemId": 1,
                "productId": 3,
                "snapshotProductName": "Mug",
                "snapshotPrice": 15000,
                "quantity": 2,
                "subtotal": 30000,
                "status": "PAID"
            }],
            "createdAt": "2024-05-01T10:00:00"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_id, OrderId(12));
        assert_eq!(order.items[0].product_id, ProductId(3));
        assert!(order.status.is_cancellable());
    }

    #[test]
    fn daily_sales_parses_iso_date() {
        let json = r#"{"date":"2024-05-01","revenue":125000.5,"orderCount":4}"#;
        let sales: DailySales = serde_json::from_str(json).unwrap();
        assert_eq!(sales.date.to_string(), "2024-05-01");
        assert_eq!(sales.order_count, 4);
    }

    #[test]
    fn category_tree_nests_children() {
        let json = r#"{"id":1,"name":"Kitchen","sortOrder":0,"children":[{"id":2,"name":"Mugs","sortOrder":1,"parentId":1}]}"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.children.len(), 1);
        assert_eq!(category.children[0].parent_id, Some(CategoryId(1)));
        assert!(category.children[0].children.is_empty());
    }

    #[test]
    fn partial_update_omits_unset_fields() {
        let update = ProductUpdate {
            price: Some(9900.0),
            ..ProductUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"price": 9900.0})
        );
    }

    #[test]
    fn track_event_wire_shape() {
        let event = TrackEvent::product_view(ProductId(5)).with_session("s-1");
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({
                "eventType": "PRODUCT_VIEW",
                "sessionId": "s-1",
                "targetId": 5,
                "targetType": "PRODUCT"
            })
        );
    }
}
