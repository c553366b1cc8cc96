//! Member id generation.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use uuid::Uuid;

/// Prefix of every generated member id.
pub const ID_PREFIX: &str = "user_";

/// Length of the random salt appended to each id.
const SALT_LEN: usize = 9;

/// Process-wide counter; two ids never share a sequence number.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generates ids of the form `user_<unix-millis>_<sequence>_<salt>`.
///
/// Uniqueness within the process comes from the sequence number. The
/// timestamp keeps ids roughly sortable and the salt keeps them unguessable.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdGenerator;

impl IdGenerator {
    pub fn next_id(&self) -> String {
        let millis = Utc::now().timestamp_millis();
        let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let salt = Uuid::new_v4().simple().to_string();
        format!("{ID_PREFIX}{millis}_{sequence}_{}", &salt[..SALT_LEN])
    }
}
