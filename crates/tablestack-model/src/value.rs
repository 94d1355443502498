//! Column and primary-key value types.

use serde::{Deserialize, Serialize};

mod base64_bytes {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(&encoded).map_err(Error::custom)
    }
}

/// Value of an attribute column.
///
/// Binary payloads travel Base64-encoded on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnValue {
    /// 64-bit signed integer.
    Integer(i64),
    /// UTF-8 string.
    String(String),
    /// IEEE-754 double.
    Double(f64),
    /// Boolean.
    Boolean(bool),
    /// Opaque byte string.
    #[serde(with = "base64_bytes")]
    Binary(Vec<u8>),
}

impl ColumnValue {
    /// Wire name of the value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INTEGER",
            Self::String(_) => "STRING",
            Self::Double(_) => "DOUBLE",
            Self::Boolean(_) => "BOOLEAN",
            Self::Binary(_) => "BINARY",
        }
    }
}

/// Value of a primary-key column.
///
/// `InfMin` and `InfMax` are virtual range sentinels: they compare below and
/// above every concrete value and are only valid in range bounds, never in a
/// stored row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimaryKeyValue {
    /// 64-bit signed integer.
    Integer(i64),
    /// UTF-8 string.
    String(String),
    /// Opaque byte string.
    #[serde(with = "base64_bytes")]
    Binary(Vec<u8>),
    /// Sentinel below every concrete value.
    #[serde(rename = "INF_MIN")]
    InfMin,
    /// Sentinel above every concrete value.
    #[serde(rename = "INF_MAX")]
    InfMax,
}

impl PrimaryKeyValue {
    /// True for the range sentinels, which never denote a stored value.
    pub fn is_virtual(&self) -> bool {
        matches!(self, Self::InfMin | Self::InfMax)
    }

    /// Wire name of the value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INTEGER",
            Self::String(_) => "STRING",
            Self::Binary(_) => "BINARY",
            Self::InfMin => "INF_MIN",
            Self::InfMax => "INF_MAX",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_serialize_binary_as_base64() {
        let value = ColumnValue::Binary(vec![1, 2, 3]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"Binary":"AQID"}"#);
        let back: ColumnValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_should_serialize_sentinels_by_wire_name() {
        assert_eq!(
            serde_json::to_string(&PrimaryKeyValue::InfMin).unwrap(),
            r#""INF_MIN""#
        );
        assert_eq!(
            serde_json::to_string(&PrimaryKeyValue::InfMax).unwrap(),
            r#""INF_MAX""#
        );
    }

    #[test]
    fn test_should_mark_sentinels_as_virtual() {
        assert!(PrimaryKeyValue::InfMin.is_virtual());
        assert!(PrimaryKeyValue::InfMax.is_virtual());
        assert!(!PrimaryKeyValue::Integer(0).is_virtual());
        assert!(!PrimaryKeyValue::String("pk".into()).is_virtual());
    }

    #[test]
    fn test_should_name_value_types() {
        assert_eq!(ColumnValue::Double(1.5).type_name(), "DOUBLE");
        assert_eq!(PrimaryKeyValue::Binary(vec![0]).type_name(), "BINARY");
    }
}
