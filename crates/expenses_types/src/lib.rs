//! Shared service contract for the expense manager.
//!
//! # Philosophy
//! - **DTOs**: plain data records as the services return them.
//! - **Request/Response pairs**: one [`ServiceRequest`] impl per remote
//!   operation; the request type names the operation on the wire.
//!
//! Both the user-management service and the instrument-catalog service are
//! declared here so every caller shares one contract.

use serde::{Deserialize, Serialize};

use expenses_common::ServiceRequest;

// ============================================================================
//                          DATA TRANSFER OBJECTS (DTOs)
// ============================================================================

/// A user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Unix milliseconds.
    pub created_at_ms: u64,
    /// Unix milliseconds.
    pub updated_at_ms: u64,
}

/// An instrument record (payment instrument: card, account, wallet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentDto {
    pub id: i64,
    pub name: String,
    /// Unix milliseconds.
    pub created_at_ms: u64,
    /// Unix milliseconds.
    pub updated_at_ms: u64,
}

// ============================================================================
//                          PAGINATION
// ============================================================================

/// Page selection for list operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PageRequest {
    /// Maximum rows to return; the service applies its default when 0.
    pub page_size: u32,
    /// Opaque continuation token from a previous response; empty for the
    /// first page.
    pub page_token: String,
}

/// Page metadata returned by list operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PageInfo {
    /// Token for the next page; empty when this is the last page.
    pub next_page_token: String,
    pub total_count: u32,
}

// ============================================================================
//                          USER SERVICE
// ============================================================================

/// List users, optionally paginated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ListUsers {
    pub pagination: Option<PageRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ListUsersResponse {
    pub users: Vec<UserDto>,
    pub page: PageInfo,
}

impl ServiceRequest for ListUsers {
    type Response = ListUsersResponse;
}

/// Get a single user by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetUser {
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetUserResponse {
    pub user: Option<UserDto>,
    pub error: Option<String>,
}

impl ServiceRequest for GetUser {
    type Response = GetUserResponse;
}

/// Create a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub user: Option<UserDto>,
    pub error: Option<String>,
}

impl ServiceRequest for CreateUser {
    type Response = CreateUserResponse;
}

/// Update a user's name and email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateUser {
    pub user_id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateUserResponse {
    pub user: Option<UserDto>,
    pub error: Option<String>,
}

impl ServiceRequest for UpdateUser {
    type Response = UpdateUserResponse;
}

/// Delete a user by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteUser {
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub success: bool,
    pub error: Option<String>,
}

impl ServiceRequest for DeleteUser {
    type Response = DeleteUserResponse;
}

// ============================================================================
//                          INSTRUMENT SERVICE
// ============================================================================

/// List instruments, optionally paginated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ListInstruments {
    pub pagination: Option<PageRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ListInstrumentsResponse {
    pub instruments: Vec<InstrumentDto>,
    pub page: PageInfo,
}

impl ServiceRequest for ListInstruments {
    type Response = ListInstrumentsResponse;
}

/// Get a single instrument by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetInstrument {
    pub instrument_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetInstrumentResponse {
    pub instrument: Option<InstrumentDto>,
    pub error: Option<String>,
}

impl ServiceRequest for GetInstrument {
    type Response = GetInstrumentResponse;
}

/// Create an instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateInstrument {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateInstrumentResponse {
    pub instrument: Option<InstrumentDto>,
    pub error: Option<String>,
}

impl ServiceRequest for CreateInstrument {
    type Response = CreateInstrumentResponse;
}

/// Rename an instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateInstrument {
    pub instrument_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateInstrumentResponse {
    pub instrument: Option<InstrumentDto>,
    pub error: Option<String>,
}

impl ServiceRequest for UpdateInstrument {
    type Response = UpdateInstrumentResponse;
}

/// Delete an instrument by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteInstrument {
    pub instrument_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteInstrumentResponse {
    pub success: bool,
    pub error: Option<String>,
}

impl ServiceRequest for DeleteInstrument {
    type Response = DeleteInstrumentResponse;
}

#[cfg(test)]
mod tests {
    use super::*;
    use expenses_common::WireMessage;

    fn roundtrip<T>(value: &T) -> T
    where
        T: serde::Serialize + serde::de::DeserializeOwned,
    {
        let bytes = bincode::serde::encode_to_vec(value, bincode::config::standard()).unwrap();
        let (decoded, _) =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard()).unwrap();
        decoded
    }

    #[test]
    fn test_request_names() {
        assert_eq!(ListUsers::request_name(), "ListUsers");
        assert_eq!(ListInstruments::request_name(), "ListInstruments");
        assert_eq!(DeleteInstrument::request_name(), "DeleteInstrument");
    }

    #[test]
    fn test_user_list_roundtrip() {
        let response = ListUsersResponse {
            users: vec![UserDto {
                id: 1,
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                created_at_ms: 1_700_000_000_000,
                updated_at_ms: 1_700_000_000_000,
            }],
            page: PageInfo::default(),
        };

        assert_eq!(roundtrip(&response), response);
        assert_eq!(response.users[0].id, 1);
        assert_eq!(response.users[0].name, "Alice");
    }

    #[test]
    fn test_empty_instrument_list_roundtrip() {
        let response = ListInstrumentsResponse::default();
        let decoded = roundtrip(&response);
        assert!(decoded.instruments.is_empty());
        assert_eq!(decoded, response);
    }

    #[test]
    fn test_default_list_request_has_no_pagination() {
        assert_eq!(ListUsers::default().pagination, None);
        assert_eq!(ListInstruments::default().pagination, None);
    }

    #[test]
    fn test_schema_hashes_distinct_across_operations() {
        assert_ne!(ListUsers::schema_hash(), ListInstruments::schema_hash());
        assert_ne!(GetUser::schema_hash(), GetInstrument::schema_hash());
    }
}
