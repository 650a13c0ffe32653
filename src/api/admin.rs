use bytes::Bytes;
use time::Date;

use super::models::{CategorySales, DailySales, Dashboard, EventType, KpiSummary};
use crate::error::Error;
use crate::gateway::{ApiRequest, Gateway, ReqwestTransport, Transport};

/// Admin dashboard reporting. Every range is inclusive on both ends.
pub struct AdminApi<'a, T = ReqwestTransport> {
    gateway: &'a Gateway<T>,
}

fn ranged(path: &str, from: Date, to: Date) -> ApiRequest {
    ApiRequest::get(path).query("from", from).query("to", to)
}

impl<'a, T: Transport> AdminApi<'a, T> {
    pub(crate) fn new(gateway: &'a Gateway<T>) -> Self {
        Self { gateway }
    }

    /// KPIs plus daily and per-category sales in one call.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors; `403` for non-admin sessions.
    pub async fn dashboard(&self, from: Date, to: Date) -> Result<Dashboard, Error> {
        self.gateway.fetch(ranged("/admin/dashboard", from, to)).await
    }

    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn kpi(&self, from: Date, to: Date) -> Result<KpiSummary, Error> {
        self.gateway.fetch(ranged("/admin/dashboard/kpi", from, to)).await
    }

    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn daily_sales(&self, from: Date, to: Date) -> Result<Vec<DailySales>, Error> {
        self.gateway
            .fetch(ranged("/admin/dashboard/sales/daily", from, to))
            .await
    }

    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn category_sales(&self, from: Date, to: Date) -> Result<Vec<CategorySales>, Error> {
        self.gateway
            .fetch(ranged("/admin/dashboard/sales/category", from, to))
            .await
    }

    /// Raw CSV export of behaviour events, optionally limited to one type.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn export_event_logs(
        &self,
        from: Date,
        to: Date,
        event_type: Option<EventType>,
    ) -> Result<Bytes, Error> {
        let request = ranged("/events/export", from, to)
            .query_opt("eventType", event_type.map(EventType::as_str));
        let body = self.gateway.send(request).await?.into_bytes();
        tracing::debug!(bytes = body.len(), "Event log export received");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{Method, StatusCode};
    use serde_json::json;
    use time::macros::date;

    use crate::api::models::EventType;
    use crate::api::testing::client;
    use crate::gateway::ApiResponse;

    #[tokio::test]
    async fn dashboard_sends_iso_range() {
        let (client, transport, _) = client();
        transport.ok(
            Method::GET,
            "/admin/dashboard",
            json!({
                "kpi": {
                    "totalRevenue": 150000, "totalOrders": 10, "paidOrders": 8,
                    "newMembers": 3, "totalVisitors": 200, "conversionRate": 4.0, "onlineUsers": 5
                },
                "dailySales": [{"date": "2024-05-01", "revenue": 150000, "orderCount": 8}],
                "categorySales": [{"categoryId": 2, "categoryName": "Mugs", "revenue": 150000, "quantity": 10}]
            }),
        );

        let dashboard = client
            .admin()
            .dashboard(date!(2024 - 05 - 01), date!(2024 - 05 - 07))
            .await
            .unwrap();

        assert_eq!(dashboard.kpi.paid_orders, 8);
        assert_eq!(dashboard.daily_sales[0].date, date!(2024 - 05 - 01));
        assert_eq!(dashboard.category_sales[0].category_name, "Mugs");

        let sent = transport.last();
        assert_eq!(sent.query("from"), Some("2024-05-01"));
        assert_eq!(sent.query("to"), Some("2024-05-07"));
    }

    #[tokio::test]
    async fn forbidden_for_customers() {
        let (client, transport, _) = client();
        transport.on(
            Method::GET,
            "/admin/dashboard/kpi",
            ApiResponse::from_json(
                StatusCode::FORBIDDEN,
                &json!({"success": false, "code": "A004", "message": "access denied"}),
            ),
        );

        let err = client
            .admin()
            .kpi(date!(2024 - 05 - 01), date!(2024 - 05 - 01))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn export_returns_raw_csv() {
        let (client, transport, _) = client();
        transport.csv(Method::GET, "/events/export", "id,eventType\n1,PAGE_VIEW\n");

        let csv = client
            .admin()
            .export_event_logs(date!(2024 - 05 - 01), date!(2024 - 05 - 02), Some(EventType::PageView))
            .await
            .unwrap();

        assert!(csv.starts_with(b"id,eventType"));
        assert_eq!(transport.last().query("eventType"), Some("PAGE_VIEW"));
    }
}
