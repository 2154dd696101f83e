//! Vendor identity: the manufacturer/model pair a device reports

use std::fmt;

use serde::{Deserialize, Serialize};

/// Manufacturer and model strings from the device's basic information
///
/// Quirk definitions register the exact identities they apply to. The same
/// firmware frequently ships under several manufacturer codes, so a quirk
/// carries a list of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VendorIdentity {
    pub manufacturer: String,
    pub model: String,
}

impl VendorIdentity {
    pub fn new(manufacturer: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            model: model.into(),
        }
    }
}

impl fmt::Display for VendorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.manufacturer, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_equality_is_exact() {
        let a = VendorIdentity::new("_TZ3000_czuyt8lz", "TS004F");
        let b = VendorIdentity::new("_TZ3000_czuyt8lz", "TS004F");
        let c = VendorIdentity::new("_TZ3000_b3mgfu0d", "TS004F");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
