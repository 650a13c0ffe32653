use super::models::{
    CancelRequest, CreateOrder, Order, OrderHistory, OrderStatus, Payment, PaymentRequest,
    StatusChangeRequest,
};
use crate::error::Error;
use crate::gateway::{ApiRequest, Gateway, ReqwestTransport, Transport};
use crate::types::{OrderId, OrderItemId, Page};

/// Orders and payments of the signed-in member.
pub struct OrderApi<'a, T = ReqwestTransport> {
    gateway: &'a Gateway<T>,
}

impl<'a, T: Transport> OrderApi<'a, T> {
    pub(crate) fn new(gateway: &'a Gateway<T>) -> Self {
        Self { gateway }
    }

    /// Place an order. Stock is reserved; the order starts as `PENDING_PAYMENT`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Status`] when stock is insufficient or a product is unknown.
    pub async fn create(&self, order: &CreateOrder) -> Result<Order, Error> {
        if order.items.is_empty() {
            return Err(Error::Api {
                code: None,
                message: "order has no items".into(),
            });
        }
        self.gateway
            .fetch(ApiRequest::post("/orders").json(order)?)
            .await
    }

    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn my_orders(&self, page: u32, size: u32) -> Result<Page<Order>, Error> {
        self.gateway
            .fetch(ApiRequest::get("/orders/my").query("page", page).query("size", size))
            .await
    }

    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn get(&self, id: OrderId) -> Result<Order, Error> {
        self.gateway.fetch(ApiRequest::get(format!("/orders/{id}"))).await
    }

    /// Look up an order by its human-facing number.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn get_by_number(&self, order_number: &str) -> Result<Order, Error> {
        let path = format!("/orders/number/{}", urlencoding::encode(order_number));
        self.gateway.fetch(ApiRequest::get(path)).await
    }

    /// Cancel the whole order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Status`] when the order is past the cancellable states.
    pub async fn cancel(&self, id: OrderId, reason: Option<&str>) -> Result<Order, Error> {
        self.gateway
            .fetch(ApiRequest::post(format!("/orders/{id}/cancel")).json(&CancelRequest { reason })?)
            .await
    }

    /// Cancel a single line of the order.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn cancel_item(
        &self,
        id: OrderId,
        item_id: OrderItemId,
        reason: Option<&str>,
    ) -> Result<Order, Error> {
        let path = format!("/orders/{id}/items/{item_id}/cancel");
        self.gateway
            .fetch(ApiRequest::post(path).json(&CancelRequest { reason })?)
            .await
    }

    /// Move the order to `status` (admin only).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Status`] when the backend refuses the transition.
    pub async fn change_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        reason: Option<&str>,
    ) -> Result<Order, Error> {
        self.gateway
            .fetch(
                ApiRequest::patch(format!("/orders/{id}/status"))
                    .json(&StatusChangeRequest { status, reason })?,
            )
            .await
    }

    /// Status change audit trail, oldest first.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn history(&self, id: OrderId) -> Result<Vec<OrderHistory>, Error> {
        self.gateway
            .fetch(ApiRequest::get(format!("/orders/{id}/history")))
            .await
    }

    /// Pay for an order under a fresh idempotency key.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn pay(&self, order_id: OrderId, payment_method: Option<&str>) -> Result<Payment, Error> {
        let key = uuid::Uuid::new_v4().to_string();
        self.pay_with_key(order_id, &key, payment_method).await
    }

    /// Pay under a caller-chosen idempotency key. Repeating a call with the
    /// same key does not charge twice.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn pay_with_key(
        &self,
        order_id: OrderId,
        idempotency_key: &str,
        payment_method: Option<&str>,
    ) -> Result<Payment, Error> {
        tracing::debug!(%order_id, idempotency_key, "Submitting payment");
        let request = ApiRequest::post("/payments").json(&PaymentRequest {
            order_id,
            idempotency_key,
            payment_method,
        })?;
        self.gateway.fetch(request).await
    }

    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn payment_for_order(&self, order_id: OrderId) -> Result<Payment, Error> {
        self.gateway
            .fetch(ApiRequest::get(format!("/payments/order/{order_id}")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::{Value, json};

    use crate::api::models::{CreateOrder, OrderStatus, PaymentStatus};
    use crate::api::testing::client;
    use crate::cart::{Cart, CartProduct};
    use crate::error::Error;
    use crate::types::{OrderId, OrderItemId, ProductId};

    fn order_json(status: &str) -> Value {
        json!({
            "orderId": 12,
            "orderNumber": "ORD-20240501-0001",
            "status": status,
            "totalAmount": 30000,
            "shippingAddress": "Seoul",
            "receiverName": "Kim",
            "receiverPhone": "010-1234-5678",
            "items": [],
            "createdAt": "2024-05-01T10:00:00"
        })
    }

    fn payment_json(key: &str) -> Value {
        json!({
            "paymentId": 4,
            "orderId": 12,
            "idempotencyKey": key,
            "amount": 30000,
            "paymentMethod": "CARD",
            "status": "COMPLETED"
        })
    }

    #[tokio::test]
    async fn create_from_cart() {
        let (client, transport, _) = client();
        transport.ok(Method::POST, "/orders", order_json("PENDING_PAYMENT"));

        let mut cart = Cart::new();
        cart.add_item(
            CartProduct {
                product_id: ProductId(3),
                name: "Mug".into(),
                price: 15000.0,
                image_url: None,
                stock_quantity: 5,
            },
            2,
        );
        let order = client
            .orders()
            .create(&CreateOrder::from_cart(&cart, "Seoul", "Kim", "010-1234-5678"))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::PendingPayment);
        let body = transport.last().json().clone();
        assert_eq!(body["receiverName"], "Kim");
        assert_eq!(body["items"], json!([{"productId": 3, "quantity": 2}]));
    }

    #[tokio::test]
    async fn empty_order_is_rejected_locally() {
        let (client, transport, _) = client();
        let err = client
            .orders()
            .create(&CreateOrder::from_cart(&Cart::new(), "Seoul", "Kim", "010"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api { .. }));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn order_number_is_path_encoded() {
        let (client, transport, _) = client();
        transport.ok(Method::GET, "/orders/number/ORD%2F1", order_json("PAID"));

        client.orders().get_by_number("ORD/1").await.unwrap();
        assert_eq!(transport.last().path, "/orders/number/ORD%2F1");
    }

    #[tokio::test]
    async fn cancel_sends_reason_when_given() {
        let (client, transport, _) = client();
        transport.ok(Method::POST, "/orders/12/cancel", order_json("CANCELLED"));
        transport.ok(Method::POST, "/orders/12/items/7/cancel", order_json("PAID"));

        let order = client.orders().cancel(OrderId(12), Some("changed mind")).await.unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(transport.last().json(), &json!({"reason": "changed mind"}));

        client.orders().cancel_item(OrderId(12), OrderItemId(7), None).await.unwrap();
        assert_eq!(transport.last().json(), &json!({}));
    }

    #[tokio::test]
    async fn change_status_uses_wire_name() {
        let (client, transport, _) = client();
        transport.ok(Method::PATCH, "/orders/12/status", order_json("SHIPPED"));

        client
            .orders()
            .change_status(OrderId(12), OrderStatus::Shipped, Some("handed to courier"))
            .await
            .unwrap();
        assert_eq!(transport.last().json()["status"], "SHIPPED");
    }

    #[tokio::test]
    async fn history_lists_transitions() {
        let (client, transport, _) = client();
        transport.ok(
            Method::GET,
            "/orders/12/history",
            json!([
                {"id": 1, "newStatus": "PENDING_PAYMENT", "changedBy": "kim@example.com"},
                {"id": 2, "previousStatus": "PENDING_PAYMENT", "newStatus": "PAID"}
            ]),
        );

        let history = client.orders().history(OrderId(12)).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].previous_status, None);
        assert_eq!(history[1].new_status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn each_payment_gets_a_fresh_idempotency_key() {
        let (client, transport, _) = client();
        transport.ok(Method::POST, "/payments", payment_json("k"));

        client.orders().pay(OrderId(12), Some("CARD")).await.unwrap();
        client.orders().pay(OrderId(12), Some("CARD")).await.unwrap();

        let keys: Vec<String> = transport
            .requests()
            .iter()
            .map(|r| r.json()["idempotencyKey"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(keys.len(), 2);
        assert_ne!(keys[0], keys[1]);
        assert_eq!(keys[0].len(), 36);
        assert_eq!(transport.last().json()["orderId"], 12);
    }

    #[tokio::test]
    async fn payment_lookup() {
        let (client, transport, _) = client();
        transport.ok(Method::GET, "/payments/order/12", payment_json("k-1"));

        let payment = client.orders().payment_for_order(OrderId(12)).await.unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.idempotency_key, "k-1");
    }
}
