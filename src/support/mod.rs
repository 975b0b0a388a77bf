// Shared serde helpers
mod deserialize_non_empty_string;

pub use deserialize_non_empty_string::deserialize_non_empty_string;
