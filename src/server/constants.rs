/// Upper bound for an unlock form submission.
pub const UNLOCK_FORM_LIMIT_BYTES: usize = 8 * 1024;
/// Seconds a client should wait before retrying after a storage outage.
pub const STORAGE_RETRY_AFTER_SECS: u64 = 5;
