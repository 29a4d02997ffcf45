//! User - the node type of the graph engine and the subject of rules
//!
//! Field set mirrors the original `mongodb_schema.py` user document (§3):
//! identity, contact and address fields used by graph-link heuristics, plus
//! the ground-truth `is_fraud` flag the proximity analysis walks toward.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub full_name: String,
    pub email: String,
    pub email_domain: String,
    pub phone: String,
    pub address_zip: String,
    pub address_city: String,
    pub address_province: String,
    pub address_kecamatan: String,
    #[serde(default)]
    pub is_fraud: bool,
}

impl User {
    /// Derive `email_domain` from `email` the way the graph service does on
    /// ingest, rather than trusting a caller-supplied value.
    pub fn with_derived_domain(mut self) -> Self {
        if let Some((_, domain)) = self.email.split_once('@') {
            self.email_domain = domain.to_string();
        }
        self
    }

    /// Field lookup used by `GraphRule` pairwise/single comparisons (§4.2).
    pub fn field(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "user_id" => Some(serde_json::Value::String(self.user_id.clone())),
            "full_name" => Some(serde_json::Value::String(self.full_name.clone())),
            "email" => Some(serde_json::Value::String(self.email.clone())),
            "email_domain" => Some(serde_json::Value::String(self.email_domain.clone())),
            "phone" => Some(serde_json::Value::String(self.phone.clone())),
            "address_zip" => Some(serde_json::Value::String(self.address_zip.clone())),
            "address_city" => Some(serde_json::Value::String(self.address_city.clone())),
            "address_province" => Some(serde_json::Value::String(self.address_province.clone())),
            "address_kecamatan" => Some(serde_json::Value::String(self.address_kecamatan.clone())),
            "is_fraud" => Some(serde_json::Value::Bool(self.is_fraud)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User {
            user_id: "U-1".into(),
            full_name: "Budi Santoso".into(),
            email: "budi@example.com".into(),
            email_domain: String::new(),
            phone: "0812".into(),
            address_zip: "40123".into(),
            address_city: "Bandung".into(),
            address_province: "Jawa Barat".into(),
            address_kecamatan: "Coblong".into(),
            is_fraud: false,
        }
    }

    #[test]
    fn test_derives_email_domain() {
        let user = sample().with_derived_domain();
        assert_eq!(user.email_domain, "example.com");
    }

    #[test]
    fn test_field_lookup() {
        let user = sample();
        assert_eq!(user.field("address_zip"), Some(serde_json::Value::String("40123".into())));
        assert_eq!(user.field("is_fraud"), Some(serde_json::Value::Bool(false)));
    }
}
