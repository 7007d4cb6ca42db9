/// Document models and GraphQL types
///
/// Each model maps one MongoDB collection document and doubles as the GraphQL
/// output type. Field names are camelCase on the wire and in storage; the
/// document id is stored as `_id`.
///
/// - `user`: account record (password hash never exposed)
/// - `project`: named container owned by one user
/// - `task`: work item with soft-delete flag and optional due date

pub mod project;
pub mod task;
pub mod user;

/// serde bridge for `Option<chrono::DateTime<Utc>>` stored as a BSON datetime
///
/// The stock `chrono_datetime_as_bson_datetime` helper only covers the
/// non-optional case; this is its `Option` counterpart for fields like a
/// task's due date.
pub(crate) mod optional_chrono_datetime_as_bson_datetime {
    use chrono::{DateTime, Utc};
    use mongodb::bson;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(datetime) => bson::DateTime::from_chrono(*datetime).serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let value = Option::<bson::DateTime>::deserialize(deserializer)?;
        Ok(value.map(|datetime| datetime.to_chrono()))
    }
}
