//! Small utility helpers used across modules.

use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the unix epoch (0 if the clock is before 1970).
pub fn unix_now() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_secs())
    .unwrap_or(0)
}

/// Canonical form used as the user-directory key.
pub fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn email_is_trimmed_and_lowercased() {
    assert_eq!(normalize_email("  Bob@Mail.COM\n"), "bob@mail.com");
  }
}
