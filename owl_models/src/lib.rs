use std::ops::Deref;

use serde::{Deserialize, Serialize};

pub mod email_address;
pub mod lead;
mod macros;

/// Wrapper for values that must never show up in logs.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sensitive<T>(pub T);
macros::sensitive_debug!(Sensitive<T>);

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> Deref for Sensitive<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensitive_debug_is_redacted() {
        let password = Sensitive(String::from("hunter2"));
        assert_eq!(format!("{password:?}"), "[sensitive]");
        assert_eq!(password.as_str(), "hunter2");
    }
}
