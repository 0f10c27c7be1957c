//! Typed service client handles.
//!
//! One handle per service definition, each a thin view over the shared
//! [`ApiContext`]. Constructing a handle never touches the network; every
//! method issues one request through the context and returns the request id
//! for tracking.

use expenses_types::{
    CreateInstrument, CreateUser, DeleteInstrument, DeleteUser, GetInstrument, GetUser,
    ListInstruments, ListUsers, PageRequest, UpdateInstrument, UpdateUser,
};

use crate::context::ApiContext;

/// Typed handle for the user-management service.
#[derive(Clone)]
pub struct UsersClient {
    ctx: ApiContext,
}

impl UsersClient {
    pub(crate) fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    /// The context (and transport) this client is bound to.
    pub fn context(&self) -> &ApiContext {
        &self.ctx
    }

    /// List users with the service's default page.
    pub fn list(&self) -> u64 {
        self.ctx.request(ListUsers::default())
    }

    /// List users with explicit pagination.
    pub fn list_page(&self, page: PageRequest) -> u64 {
        self.ctx.request(ListUsers {
            pagination: Some(page),
        })
    }

    pub fn get(&self, user_id: i64) -> u64 {
        self.ctx.request(GetUser { user_id })
    }

    pub fn create(&self, name: impl Into<String>, email: impl Into<String>) -> u64 {
        self.ctx.request(CreateUser {
            name: name.into(),
            email: email.into(),
        })
    }

    pub fn update(&self, user_id: i64, name: impl Into<String>, email: impl Into<String>) -> u64 {
        self.ctx.request(UpdateUser {
            user_id,
            name: name.into(),
            email: email.into(),
        })
    }

    pub fn delete(&self, user_id: i64) -> u64 {
        self.ctx.request(DeleteUser { user_id })
    }
}

/// Typed handle for the instrument-catalog service.
#[derive(Clone)]
pub struct InstrumentsClient {
    ctx: ApiContext,
}

impl InstrumentsClient {
    pub(crate) fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    /// The context (and transport) this client is bound to.
    pub fn context(&self) -> &ApiContext {
        &self.ctx
    }

    /// List instruments with the service's default page.
    pub fn list(&self) -> u64 {
        self.ctx.request(ListInstruments::default())
    }

    /// List instruments with explicit pagination.
    pub fn list_page(&self, page: PageRequest) -> u64 {
        self.ctx.request(ListInstruments {
            pagination: Some(page),
        })
    }

    pub fn get(&self, instrument_id: i64) -> u64 {
        self.ctx.request(GetInstrument { instrument_id })
    }

    pub fn create(&self, name: impl Into<String>) -> u64 {
        self.ctx.request(CreateInstrument { name: name.into() })
    }

    pub fn rename(&self, instrument_id: i64, name: impl Into<String>) -> u64 {
        self.ctx.request(UpdateInstrument {
            instrument_id,
            name: name.into(),
        })
    }

    pub fn delete(&self, instrument_id: i64) -> u64 {
        self.ctx.request(DeleteInstrument { instrument_id })
    }
}

#[cfg(test)]
mod tests {
    use crate::context::testing::stub_context;
    use expenses_common::decode_response_envelope;

    #[test]
    fn test_clients_share_one_transport() {
        let (ctx, sent) = stub_context();

        let users = ctx.users();
        let instruments = ctx.instruments();

        users.list();
        instruments.list();

        // Both requests went down the same captured send channel, with ids
        // allocated from the same counter.
        let packets = sent.lock().unwrap();
        assert_eq!(packets.len(), 2);
        assert!(packets[0].type_name.contains("ListUsers"));
        assert!(packets[1].type_name.contains("ListInstruments"));

        let (id_a, _) = decode_response_envelope(&packets[0].data).unwrap();
        let (id_b, _) = decode_response_envelope(&packets[1].data).unwrap();
        assert_eq!(id_a, 1);
        assert_eq!(id_b, 2);
    }

    #[test]
    fn test_client_construction_sends_nothing() {
        let (ctx, sent) = stub_context();

        let _users = ctx.users();
        let _instruments = ctx.instruments();

        assert!(sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_typed_methods_name_their_operation() {
        let (ctx, sent) = stub_context();

        ctx.users().get(3);
        ctx.users().delete(3);
        ctx.instruments().create("Visa ****1234");

        let packets = sent.lock().unwrap();
        assert!(packets[0].type_name.contains("GetUser"));
        assert!(packets[1].type_name.contains("DeleteUser"));
        assert!(packets[2].type_name.contains("CreateInstrument"));
    }
}
