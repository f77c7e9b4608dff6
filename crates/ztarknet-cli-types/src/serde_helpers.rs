pub mod hex_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize_u64_to_prefixed_hex<S>(value: &u64, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&format!("{value:#x}"))
    }

    pub fn serialize_u128_to_prefixed_hex<S>(value: &u128, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&format!("{value:#x}"))
    }

    pub fn deserialize_prefixed_hex_string_to_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let buf = String::deserialize(deserializer)?;
        let digits = strip_hex_prefix(&buf).map_err(serde::de::Error::custom)?;
        u64::from_str_radix(digits, 16).map_err(serde::de::Error::custom)
    }

    pub fn deserialize_prefixed_hex_string_to_u128<'de, D>(
        deserializer: D,
    ) -> Result<u128, D::Error>
    where
        D: Deserializer<'de>,
    {
        let buf = String::deserialize(deserializer)?;
        let digits = strip_hex_prefix(&buf).map_err(serde::de::Error::custom)?;
        u128::from_str_radix(digits, 16).map_err(serde::de::Error::custom)
    }

    fn strip_hex_prefix(s: &str) -> Result<&str, String> {
        s.strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| format!("Expected 0x-prefixed hex string, got: {s}"))
    }

}
