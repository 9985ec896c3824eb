use serde::{Deserialize, Serialize};

/// Customer details copied into an order when it is created.
///
/// The order keeps its own copy, so later profile edits never change a
/// historical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Customer {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// Returns a description of the first problem found, if any.
    pub fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() {
            return Err("first name required".to_string());
        }
        if self.email.trim().is_empty() {
            return Err("email required".to_string());
        }
        if !self.email.contains('@') {
            return Err(format!("malformed email: {}", self.email));
        }
        Ok(())
    }
}
