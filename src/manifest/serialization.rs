//! Serde helpers for manifest fields with legacy encodings

/// `recommended` is written as `"yes"`/`"no"`; booleans are accepted on read
pub mod yes_no {
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Word(String),
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(if *value { "yes" } else { "no" })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Flag(flag) => Ok(flag),
            Raw::Word(word) => match word.as_str() {
                "yes" => Ok(true),
                "no" => Ok(false),
                other => Err(de::Error::custom(format!(
                    "expected \"yes\" or \"no\", got \"{other}\""
                ))),
            },
        }
    }
}

/// `version` may be published as a number or a string; it is always stored as a string
pub mod version_string {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string(),
            Raw::Text(s) => s,
        })
    }
}
