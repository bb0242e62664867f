use db::models::user::UserRole;
use serde::{Deserialize, Serialize};
use services::access::Actor;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub role: UserRole,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The caller as the engine sees it.
    pub fn actor(&self) -> Actor {
        Actor::new(self.0.sub, self.0.role)
    }
}
