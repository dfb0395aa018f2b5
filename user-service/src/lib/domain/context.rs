use uuid::Uuid;

use crate::domain::user::models::Role;

/// Request-scoped values passed explicitly from the HTTP layer into the domain.
///
/// The correlation middleware creates it; the token middleware fills in
/// `role` on protected routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub correlation_id: Option<Uuid>,
    pub role: Option<Role>,
}

impl RequestContext {
    /// Context for a new request with a fresh correlation id.
    pub fn new() -> Self {
        Self {
            correlation_id: Some(Uuid::new_v4()),
            role: None,
        }
    }

    /// Context for work that does not originate from a request, such as
    /// startup seeding.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}
