/// UTC timestamp used for server- and client-stamped `updatedAt` values.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Caller-assigned opaque project identifier.
pub type ProjectId = String;
