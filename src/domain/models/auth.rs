use serde::{Deserialize, Serialize};

/// Authenticated caller as supplied by the identity collaborator.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Principal {
    pub user_id: String,
    pub role: String,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}
