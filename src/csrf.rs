//! Per-action form tokens.
//!
//! A token proves the mutating request originated from a form this
//! application rendered: HMAC-SHA256 over `"<action>_<id>"`, hex-encoded,
//! keyed by `CSRF_SECRET`. The token for a given action and entity is
//! stable, so the article view can embed it and the matching POST handler
//! can recompute it.

use anyhow::{anyhow, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::env;

pub const DELETE_ARTICLE: &str = "delete_article";
pub const TOGGLE_PUBLISH: &str = "toggle_publish";
pub const DELETE_COMMENT: &str = "delete_commentaire";

type HmacSha256 = Hmac<Sha256>;

// a missing secret surfaces as an internal error, never a panic mid-request
fn mac_for(action: &str, id: i32) -> Result<HmacSha256> {
    let secret = env::var("CSRF_SECRET").map_err(|_| anyhow!("CSRF_SECRET must be set"))?;
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(format!("{}_{}", action, id).as_bytes());
    Ok(mac)
}

pub fn token(action: &str, id: i32) -> Result<String> {
    Ok(hex::encode(mac_for(action, id)?.finalize().into_bytes()))
}

pub fn is_valid(candidate: &str, action: &str, id: i32) -> Result<bool> {
    match hex::decode(candidate) {
        Ok(bytes) => Ok(mac_for(action, id)?.verify_slice(&bytes).is_ok()),
        Err(_) => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // the secret lives in the process environment; tests touching it take
    // this lock so the removal below cannot interleave with the others
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn set_secret() {
        env::set_var("CSRF_SECRET", "carnet-test-csrf-secret");
    }

    #[test]
    fn token_verifies_for_its_own_action_and_id() {
        let _guard = ENV_LOCK.lock().unwrap();
        set_secret();
        let t = token(DELETE_ARTICLE, 7).expect("token must be computed");
        assert_eq!(t.len(), 64);
        assert!(is_valid(&t, DELETE_ARTICLE, 7).expect("check must succeed"));
    }

    #[test]
    fn token_is_bound_to_action_and_id() {
        let _guard = ENV_LOCK.lock().unwrap();
        set_secret();
        let t = token(DELETE_ARTICLE, 7).expect("token must be computed");
        assert!(!is_valid(&t, DELETE_ARTICLE, 8).expect("check must succeed"));
        assert!(!is_valid(&t, TOGGLE_PUBLISH, 7).expect("check must succeed"));
        assert!(!is_valid(&t, DELETE_COMMENT, 7).expect("check must succeed"));
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        set_secret();
        assert!(!is_valid("not-hex-at-all", DELETE_ARTICLE, 7).expect("check must succeed"));
        assert!(!is_valid(&"a".repeat(64), DELETE_ARTICLE, 7).expect("check must succeed"));
        assert!(!is_valid("", DELETE_ARTICLE, 7).expect("check must succeed"));
    }

    #[test]
    fn a_missing_secret_is_an_error_not_a_panic() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var("CSRF_SECRET");
        let computed = token(DELETE_ARTICLE, 1);
        let checked = is_valid(&"a".repeat(64), DELETE_ARTICLE, 1);
        set_secret();
        assert!(computed.is_err());
        assert!(checked.is_err());
    }
}
