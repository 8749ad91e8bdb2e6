//! Mock identity for handler tests.
//!
//! Services behind the gateway receive `x-canteen-user-id` + `x-canteen-user-role`
//! headers. `MockAuth` produces the same headers so tests need no gateway.

use http::{HeaderName, HeaderValue};
use uuid::Uuid;

use canteen_auth_types::{USER_ID_HEADER, USER_ROLE_HEADER};
use canteen_domain::user::UserRole;

/// Identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn member() -> Self {
        Self::new(Uuid::new_v4(), UserRole::Member)
    }

    pub fn staff() -> Self {
        Self::new(Uuid::new_v4(), UserRole::Staff)
    }

    pub fn admin() -> Self {
        Self::new(Uuid::new_v4(), UserRole::Admin)
    }

    /// Header pairs as the gateway would inject them.
    pub fn headers(&self) -> [(HeaderName, HeaderValue); 2] {
        [
            (
                HeaderName::from_static(USER_ID_HEADER),
                HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
            ),
            (
                HeaderName::from_static(USER_ROLE_HEADER),
                HeaderValue::from(u16::from(self.role.as_u8())),
            ),
        ]
    }
}
