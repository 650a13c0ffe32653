use super::models::{LoginRequest, LoginResponse, SignupRequest};
use crate::error::Error;
use crate::gateway::{ApiRequest, Gateway, ReqwestTransport, Transport};
use crate::types::Member;

/// Sign-up, login and logout.
pub struct AuthApi<'a, T = ReqwestTransport> {
    gateway: &'a Gateway<T>,
}

impl<'a, T: Transport> AuthApi<'a, T> {
    pub(crate) fn new(gateway: &'a Gateway<T>) -> Self {
        Self { gateway }
    }

    /// Register a new member. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Status`] when the backend rejects the registration
    /// (for example a duplicate email).
    pub async fn signup(&self, request: &SignupRequest) -> Result<Member, Error> {
        self.gateway
            .fetch(ApiRequest::post("/auth/signup").json(request)?)
            .await
    }

    /// Sign in and store the credentials and member profile in the session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Status`] for bad credentials, or [`Error::Storage`]
    /// if a persistent session store cannot record the login.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, Error> {
        let response: LoginResponse = self
            .gateway
            .fetch(ApiRequest::post("/auth/login").json(&LoginRequest { email, password })?)
            .await?;

        self.gateway
            .session()
            .login(&response.token, response.member.clone())?;
        tracing::info!(member_id = %response.member.id, "Signed in");
        Ok(response)
    }

    /// Tell the backend to revoke the session, then clear it locally.
    ///
    /// The server call is best effort; the local session is cleared even when
    /// it fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] only if the local session cannot be cleared.
    pub async fn logout(&self) -> Result<(), Error> {
        if self.gateway.session().access_token().is_some() {
            match self.gateway.send(ApiRequest::post("/auth/logout")).await {
                Ok(_) => tracing::debug!("Server-side logout acknowledged"),
                Err(e) => tracing::warn!(error = %e, "Server-side logout failed; clearing locally"),
            }
        }
        self.gateway.session().clear()?;
        tracing::info!("Signed out");
        Ok(())
    }
}
