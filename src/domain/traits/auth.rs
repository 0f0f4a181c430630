use crate::domain::entities::User;

/// Decides who may change the board
pub trait AuthorizationPolicy: Send + Sync {
    fn is_authorized(&self, identity: &User) -> bool;
}

/// Grants access to exactly one user id
#[derive(Debug, Clone)]
pub struct SinglePrincipal {
    user_id: String,
}

impl SinglePrincipal {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl AuthorizationPolicy for SinglePrincipal {
    fn is_authorized(&self, identity: &User) -> bool {
        !self.user_id.is_empty() && identity.id == self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_principal() {
        let policy = SinglePrincipal::new("1372549650225168436");
        assert!(policy.is_authorized(&User::new("1372549650225168436")));
        assert!(!policy.is_authorized(&User::new("42")));

        // An unset principal locks everyone out
        let locked = SinglePrincipal::new("");
        assert!(!locked.is_authorized(&User::new("")));
    }
}
