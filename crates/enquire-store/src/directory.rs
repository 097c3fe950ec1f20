//! Existence lookups for the field validators.

use enquire_shared::{Directory, ValidationError};

use crate::database::Database;
use crate::error::StoreError;

fn lookup(e: StoreError) -> ValidationError {
    ValidationError::Lookup(e.to_string())
}

impl Directory for Database {
    fn username_taken(&self, username: &str) -> Result<bool, ValidationError> {
        self.username_exists(username).map_err(lookup)
    }

    fn email_registered(&self, email: &str) -> Result<bool, ValidationError> {
        Database::email_registered(self, email).map_err(lookup)
    }

    fn email_subscribed(&self, email: &str) -> Result<bool, ValidationError> {
        self.is_subscribed(email).map_err(lookup)
    }

    fn email_has_contacted(&self, email: &str) -> Result<bool, ValidationError> {
        Database::email_has_contacted(self, email).map_err(lookup)
    }
}
