/// All internal primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Vendor-side identifiers are opaque strings.
///
/// The device-management service has used both numeric and string ids in
/// different API versions, so we never parse them.
pub type VendorId = String;
