use serde::Deserialize;

/// Deserializes a string, trimming it and rejecting blank values.
pub fn deserialize_non_empty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(serde::de::Error::custom("field cannot be empty"));
    }
    Ok(trimmed.to_string())
}
