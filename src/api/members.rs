use crate::error::Error;
use crate::gateway::{ApiRequest, Gateway, ReqwestTransport, Transport};
use crate::types::Member;

pub struct MemberApi<'a, T = ReqwestTransport> {
    gateway: &'a Gateway<T>,
}

impl<'a, T: Transport> MemberApi<'a, T> {
    pub(crate) fn new(gateway: &'a Gateway<T>) -> Self {
        Self { gateway }
    }

    /// Profile of the signed-in member. Also refreshes the session's copy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Status`] (401) when nobody is signed in.
    pub async fn me(&self) -> Result<Member, Error> {
        let member: Member = self.gateway.fetch(ApiRequest::get("/members/me")).await?;
        self.gateway.session().set_member(member.clone())?;
        Ok(member)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;

    use crate::api::testing::{client, member_json};
    use crate::session::SessionStore;
    use crate::types::TokenPair;

    #[tokio::test]
    async fn me_updates_session_member() {
        let (client, transport, store) = client();
        store.set_credentials(&TokenPair::new("a1", "r1")).unwrap();
        transport.ok(Method::GET, "/members/me", member_json());

        let me = client.members().me().await.unwrap();

        assert_eq!(me.email, "kim@example.com");
        assert_eq!(transport.last().bearer.as_deref(), Some("a1"));
        assert_eq!(store.snapshot().member, Some(me));
    }
}
