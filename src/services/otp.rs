use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

struct PendingCode {
    code: String,
    expires_at: DateTime<Utc>,
}

/// One-time codes for signup and password-reset verification, keyed by email.
/// Codes live in memory only; a restart invalidates anything outstanding,
/// which is acceptable for a five-minute window.
pub struct OtpStore {
    codes: Mutex<HashMap<String, PendingCode>>,
    ttl: Duration,
}

impl OtpStore {
    pub fn new(expiry_minutes: i64) -> Self {
        Self {
            codes: Mutex::new(HashMap::new()),
            ttl: Duration::minutes(expiry_minutes),
        }
    }

    /// Issue a fresh six-digit code, replacing any earlier one for the email.
    pub fn issue(&self, email: &str) -> String {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        let mut codes = self.codes.lock().unwrap_or_else(|e| e.into_inner());
        codes.insert(
            email.to_lowercase(),
            PendingCode {
                code: code.clone(),
                expires_at: Utc::now() + self.ttl,
            },
        );
        code
    }

    /// Check a submitted code. A correct, unexpired code is consumed; a wrong
    /// code leaves the stored one intact for another attempt.
    pub fn verify(&self, email: &str, submitted: &str) -> bool {
        let key = email.to_lowercase();
        let mut codes = self.codes.lock().unwrap_or_else(|e| e.into_inner());
        let Some(pending) = codes.get(&key) else {
            return false;
        };
        if Utc::now() > pending.expires_at {
            codes.remove(&key);
            return false;
        }
        if pending.code != submitted {
            return false;
        }
        codes.remove(&key);
        true
    }
}
