use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Backend member identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromStr, From, Into,
)]
#[serde(transparent)]
pub struct MemberId(pub i64);

/// Catalog product identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromStr, From, Into,
)]
#[serde(transparent)]
pub struct ProductId(pub i64);

/// Catalog category identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromStr, From, Into,
)]
#[serde(transparent)]
pub struct CategoryId(pub i64);

/// Order identifier (numeric primary key, not the human-facing order number).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromStr, From, Into,
)]
#[serde(transparent)]
pub struct OrderId(pub i64);

/// Line item identifier within an order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromStr, From, Into,
)]
#[serde(transparent)]
pub struct OrderItemId(pub i64);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromStr, From, Into,
)]
#[serde(transparent)]
pub struct PaymentId(pub i64);

/// Member role as issued by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Customer,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Customer => "CUSTOMER",
            Self::Admin => "ADMIN",
        })
    }
}

impl std::str::FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CUSTOMER" => Ok(Self::Customer),
            "ADMIN" => Ok(Self::Admin),
            other => Err(Error::Config(format!("unknown role: {other}"))),
        }
    }
}

/// Signed-in member profile (`/members/me`, login response).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Member {
    pub id: MemberId,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub role: Role,
    /// Backend-local timestamp as sent (`2024-05-01T12:30:00`).
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Member {
    /// Create a member with only the required fields.
    #[must_use]
    pub fn new(id: MemberId, email: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            email: email.into(),
            name: name.into(),
            phone: None,
            address: None,
            role,
            created_at: None,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Access/refresh credential pair returned by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: u64,
}

fn default_token_type() -> String {
    "Bearer".into()
}

impl TokenPair {
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_type: default_token_type(),
            expires_in: 0,
        }
    }

    #[must_use]
    pub fn with_expires_in(mut self, seconds: u64) -> Self {
        self.expires_in = seconds;
        self
    }
}

/// Response envelope every backend endpoint wraps its payload in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload of a successful envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] if the backend flagged the call as failed or the
    /// payload is missing.
    pub fn into_data(self) -> Result<T, Error> {
        if !self.success {
            return Err(self.into_api_error());
        }
        self.data.ok_or_else(|| Error::Api {
            code: None,
            message: "response carried no data".into(),
        })
    }

    /// Check a successful envelope whose payload is irrelevant (`ApiResponse<Void>`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] if the backend flagged the call as failed.
    pub fn into_unit(self) -> Result<(), Error> {
        if self.success {
            Ok(())
        } else {
            Err(self.into_api_error())
        }
    }

    fn into_api_error(self) -> Error {
        Error::Api {
            code: self.code,
            message: self.message.unwrap_or_else(|| "request failed".into()),
        }
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    #[must_use]
    pub fn has_next(&self) -> bool {
        !self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_transparent_on_the_wire() {
        let id = ProductId(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let parsed: ProductId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, id);
        assert_eq!("7".parse::<OrderId>().unwrap(), OrderId(7));
        assert_eq!(MemberId(3).to_string(), "3");
    }

    #[test]
    fn newtypes_prevent_mixing() {
        fn takes_product(_: ProductId) {}
        fn takes_order(_: OrderId) {}

        takes_product(ProductId::from(1));
        takes_order(OrderId::from(1));
        // takes_product(OrderId(1));  // Compile error!
    }

    #[test]
    fn role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        let role: Role = serde_json::from_str("\"CUSTOMER\"").unwrap();
        assert_eq!(role, Role::Customer);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("ROOT".parse::<Role>().is_err());
    }

    #[test]
    fn member_from_backend_json() {
        let json = r#"{
            "id": 5,
            "email": "kim@example.com",
            "name": "Kim",
            "phone": "010-0000-0000",
            "role": "ADMIN",
            "createdAt": "2024-05-01T12:30:00"
        }"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.id, MemberId(5));
        assert!(member.is_admin());
        assert_eq!(member.address, None);
        assert_eq!(member.created_at.as_deref(), Some("2024-05-01T12:30:00"));
    }

    #[test]
    fn token_pair_defaults_token_type() {
        let json = r#"{"accessToken":"a","refreshToken":"r","expiresIn":1800}"#;
        let tokens: TokenPair = serde_json::from_str(json).unwrap();
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 1800);
    }

    #[test]
    fn envelope_into_data() {
        let ok: ApiEnvelope<u32> = serde_json::from_str(r#"{"success":true,"data":3}"#).unwrap();
        assert_eq!(ok.into_data().unwrap(), 3);

        let failed: ApiEnvelope<u32> =
            serde_json::from_str(r#"{"success":false,"code":"O003","message":"not cancellable"}"#)
                .unwrap();
        match failed.into_data() {
            Err(Error::Api { code, message }) => {
                assert_eq!(code.as_deref(), Some("O003"));
                assert_eq!(message, "not cancellable");
            }
            other => panic!("expected Api error, got {other:?}"),
        }

        let empty: ApiEnvelope<u32> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(empty.into_data().is_err());
    }

    #[test]
    fn envelope_into_unit_ignores_missing_data() {
        let ok: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success":true,"message":"done"}"#).unwrap();
        assert!(ok.into_unit().is_ok());
    }

    #[test]
    fn page_from_backend_json() {
        let json = r#"{"content":[1,2],"page":0,"size":2,"totalElements":5,"totalPages":3,"first":true,"last":false}"#;
        let page: Page<u8> = serde_json::from_str(json).unwrap();
        assert_eq!(page.content, vec![1, 2]);
        assert!(page.has_next());
    }
}
