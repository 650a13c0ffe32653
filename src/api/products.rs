use bytes::Bytes;

use super::models::{Category, CategoryCreate, CategoryUpdate, Product, ProductCreate, ProductSearch, ProductUpdate};
use crate::error::Error;
use crate::gateway::{ApiRequest, FilePart, Gateway, ReqwestTransport, Transport};
use crate::types::{CategoryId, Page, ProductId};

/// Catalog: products and categories. Mutations require an admin session.
pub struct ProductApi<'a, T = ReqwestTransport> {
    gateway: &'a Gateway<T>,
}

impl<'a, T: Transport> ProductApi<'a, T> {
    pub(crate) fn new(gateway: &'a Gateway<T>) -> Self {
        Self { gateway }
    }

    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn list(&self, page: u32, size: u32) -> Result<Page<Product>, Error> {
        self.gateway
            .fetch(ApiRequest::get("/products").query("page", page).query("size", size))
            .await
    }

    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn search(&self, search: &ProductSearch) -> Result<Page<Product>, Error> {
        let request = ApiRequest::get("/products/search")
            .query_opt("keyword", search.keyword.as_deref())
            .query_opt("categoryId", search.category_id)
            .query_opt("minPrice", search.min_price)
            .query_opt("maxPrice", search.max_price)
            .query_opt("inStock", search.in_stock)
            .query_opt("sortBy", search.sort_by.as_deref())
            .query_opt("sortDirection", search.sort_direction.map(|d| d.as_str()))
            .query_opt("page", search.page)
            .query_opt("size", search.size);
        self.gateway.fetch(request).await
    }

    /// # Errors
    ///
    /// Returns [`Error::Status`] (404) for an unknown product.
    pub async fn get(&self, id: ProductId) -> Result<Product, Error> {
        self.gateway.fetch(ApiRequest::get(format!("/products/{id}"))).await
    }

    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn create(&self, product: &ProductCreate) -> Result<Product, Error> {
        self.gateway
            .fetch(ApiRequest::post("/products").json(product)?)
            .await
    }

    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn update(&self, id: ProductId, update: &ProductUpdate) -> Result<Product, Error> {
        self.gateway
            .fetch(ApiRequest::put(format!("/products/{id}")).json(update)?)
            .await
    }

    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), Error> {
        self.gateway
            .send(ApiRequest::delete(format!("/products/{id}")))
            .await?
            .ack()
    }

    /// Add `quantity` units to the product's stock.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn update_stock(&self, id: ProductId, quantity: i32) -> Result<Product, Error> {
        self.gateway
            .fetch(ApiRequest::patch(format!("/products/{id}/stock")).query("quantity", quantity))
            .await
    }

    /// Upload the product image as multipart field `file`.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn upload_image(
        &self,
        id: ProductId,
        file_name: impl Into<String>,
        content_type: Option<&str>,
        bytes: impl Into<Bytes>,
    ) -> Result<Product, Error> {
        let part = FilePart {
            field: "file".into(),
            file_name: file_name.into(),
            content_type: content_type.map(str::to_string),
            bytes: bytes.into(),
        };
        self.gateway
            .fetch(ApiRequest::post(format!("/products/{id}/image")).file(part))
            .await
    }

    /// Flat category list.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn categories(&self) -> Result<Vec<Category>, Error> {
        self.gateway.fetch(ApiRequest::get("/categories")).await
    }

    /// Root categories with nested `children`.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn category_tree(&self) -> Result<Vec<Category>, Error> {
        self.gateway.fetch(ApiRequest::get("/categories/tree")).await
    }

    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn create_category(&self, category: &CategoryCreate) -> Result<Category, Error> {
        self.gateway
            .fetch(ApiRequest::post("/categories").json(category)?)
            .await
    }

    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn update_category(&self, id: CategoryId, update: &CategoryUpdate) -> Result<Category, Error> {
        self.gateway
            .fetch(ApiRequest::put(format!("/categories/{id}")).json(update)?)
            .await
    }

    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), Error> {
        self.gateway
            .send(ApiRequest::delete(format!("/categories/{id}")))
            .await?
            .ack()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{Method, StatusCode};
    use serde_json::{Value, json};

    use crate::api::models::{CategoryCreate, ProductSearch, SortDirection};
    use crate::api::testing::client;
    use crate::gateway::RequestBody;
    use crate::types::{CategoryId, ProductId};

    fn product_json(id: i64) -> Value {
        json!({"id": id, "name": "Mug", "price": 15000, "stockQuantity": 3, "categoryId": 2})
    }

    fn page_of(items: Vec<Value>) -> Value {
        json!({"content": items, "page": 0, "size": 20, "totalElements": 1, "totalPages": 1, "first": true, "last": true})
    }

    #[tokio::test]
    async fn list_sends_paging() {
        let (client, transport, _) = client();
        transport.ok(Method::GET, "/products", page_of(vec![product_json(1)]));

        let page = client.products().list(0, 20).await.unwrap();

        assert_eq!(page.content[0].id, ProductId(1));
        assert!(!page.has_next());
        let sent = transport.last();
        assert_eq!(sent.query("page"), Some("0"));
        assert_eq!(sent.query("size"), Some("20"));
    }

    #[tokio::test]
    async fn search_sends_only_set_filters() {
        let (client, transport, _) = client();
        transport.ok(Method::GET, "/products/search", page_of(vec![]));

        let search = ProductSearch::keyword("mug")
            .with_category(CategoryId(2))
            .in_stock_only()
            .sorted_by("price", SortDirection::Asc);
        client.products().search(&search).await.unwrap();

        let sent = transport.last();
        assert_eq!(sent.query("keyword"), Some("mug"));
        assert_eq!(sent.query("categoryId"), Some("2"));
        assert_eq!(sent.query("inStock"), Some("true"));
        assert_eq!(sent.query("sortDirection"), Some("asc"));
        assert_eq!(sent.query("minPrice"), None);
        assert_eq!(sent.query("page"), None);
    }

    #[tokio::test]
    async fn get_missing_product_is_404() {
        let (client, _, _) = client();
        let err = client.products().get(ProductId(99)).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn stock_and_delete() {
        let (client, transport, _) = client();
        transport.ok(Method::PATCH, "/products/1/stock", product_json(1));
        transport.ok(Method::DELETE, "/products/1", Value::Null);

        client.products().update_stock(ProductId(1), 5).await.unwrap();
        assert_eq!(transport.last().query("quantity"), Some("5"));

        client.products().delete(ProductId(1)).await.unwrap();
        assert_eq!(transport.last().method, Method::DELETE);
    }

    #[tokio::test]
    async fn upload_image_is_multipart() {
        let (client, transport, _) = client();
        transport.ok(Method::POST, "/products/1/image", product_json(1));

        client
            .products()
            .upload_image(ProductId(1), "mug.png", Some("image/png"), vec![0x89_u8, 0x50])
            .await
            .unwrap();

        match transport.last().body {
            RequestBody::Multipart(parts) => {
                assert_eq!(parts.len(), 1);
                assert_eq!(parts[0].field, "file");
                assert_eq!(parts[0].file_name, "mug.png");
                assert_eq!(parts[0].content_type.as_deref(), Some("image/png"));
            }
            other => panic!("expected multipart, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn category_crud() {
        let (client, transport, _) = client();
        transport.ok(
            Method::GET,
            "/categories/tree",
            json!([{"id": 1, "name": "Kitchen", "sortOrder": 0, "children": [{"id": 2, "name": "Mugs", "sortOrder": 0, "parentId": 1}]}]),
        );
        transport.ok(Method::POST, "/categories", json!({"id": 3, "name": "Plates", "sortOrder": 2, "parentId": 1}));
        transport.ok(Method::DELETE, "/categories/3", Value::Null);

        let tree = client.products().category_tree().await.unwrap();
        assert_eq!(tree[0].children[0].name, "Mugs");

        let created = client
            .products()
            .create_category(&CategoryCreate {
                name: "Plates".into(),
                description: None,
                parent_id: Some(CategoryId(1)),
                sort_order: Some(2),
            })
            .await
            .unwrap();
        assert_eq!(created.id, CategoryId(3));
        assert_eq!(transport.last().json()["parentId"], 1);

        client.products().delete_category(CategoryId(3)).await.unwrap();
    }
}
