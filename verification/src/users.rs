//! User registry: registration, login and advisory stake updates.

use std::sync::Arc;

use tracing::info;
use verity_store::{StoreError, UserProfile, UserStore};
use verity_types::{Identity, Timestamp};

use crate::engine::user_error;
use crate::error::VerificationError;

pub struct UserRegistry<U> {
    users: Arc<U>,
}

impl<U: UserStore> UserRegistry<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Register a new identity. The identity is unique case-insensitively.
    pub fn register(
        &self,
        identity: &str,
        display_name: &str,
        now: Timestamp,
    ) -> Result<UserProfile, VerificationError> {
        let identity = Identity::parse(identity)?;
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(VerificationError::InvalidInput(
                "display name must not be empty".to_string(),
            ));
        }
        let profile = UserProfile::new(identity, display_name.to_string(), now);
        self.users.create_user(&profile).map_err(user_error)?;
        info!(identity = %profile.identity, "user registered");
        Ok(profile)
    }

    /// Look up a registered identity.
    pub fn login(&self, identity: &str) -> Result<UserProfile, VerificationError> {
        let identity = Identity::parse(identity)?;
        self.users.find_user(identity.as_str()).map_err(user_error)
    }

    /// Overwrite the advisory stake reported by the staking contract.
    pub fn update_stake(
        &self,
        identity: &str,
        stake_balance: u64,
    ) -> Result<UserProfile, VerificationError> {
        let identity = Identity::parse(identity)?;
        let (profile, ()) = self
            .users
            .mutate_user(identity.as_str(), |profile| {
                profile.stake_balance = stake_balance;
                Ok::<_, StoreError>(())
            })
            .map_err(user_error)?;
        info!(identity = %profile.identity, stake_balance, "stake updated");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_nullables::NullStore;

    fn registry() -> UserRegistry<NullStore> {
        UserRegistry::new(Arc::new(NullStore::new()))
    }

    #[test]
    fn register_then_login_in_other_casing() {
        let r = registry();
        r.register("0xAbC", "  Alice ", Timestamp::new(5)).unwrap();
        let user = r.login("0XABC").unwrap();
        assert_eq!(user.display_name, "Alice");
        assert_eq!(user.identity.as_str(), "0xAbC");
    }

    #[test]
    fn duplicate_registration_conflicts() {
        let r = registry();
        r.register("0xabc", "a", Timestamp::new(1)).unwrap();
        assert!(matches!(
            r.register("0xABC", "b", Timestamp::new(2)),
            Err(VerificationError::DuplicateUser(_))
        ));
    }

    #[test]
    fn missing_fields_are_invalid_input() {
        let r = registry();
        assert!(matches!(
            r.register("", "a", Timestamp::new(1)),
            Err(VerificationError::InvalidInput(_))
        ));
        assert!(matches!(
            r.register("0xabc", " ", Timestamp::new(1)),
            Err(VerificationError::InvalidInput(_))
        ));
    }

    #[test]
    fn unknown_login_is_not_found() {
        assert!(matches!(
            registry().login("0xnobody"),
            Err(VerificationError::UserNotFound(_))
        ));
    }

    #[test]
    fn stake_update_persists() {
        let r = registry();
        r.register("0xabc", "a", Timestamp::new(1)).unwrap();
        assert_eq!(r.update_stake("0xABC", 250).unwrap().stake_balance, 250);
        assert_eq!(r.login("0xabc").unwrap().stake_balance, 250);
        assert!(matches!(
            r.update_stake("0xnobody", 1),
            Err(VerificationError::UserNotFound(_))
        ));
    }
}
