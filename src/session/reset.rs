use anyhow::Result;
use log::info;
use serde::Serialize;

use super::Session;

/// Launch query parameter that wipes the reached flag: `?resetCountdown=1`.
pub const RESET_PARAM: &str = "resetCountdown";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResetOutcome {
    pub reset: bool,
    /// The query with the reset parameter removed. The host reloads with it
    /// so the reset happens once.
    pub query: String,
}

/// Clears the session if `query` carries `resetCountdown=1`.
pub fn apply_reset_query(query: &str, session: &Session) -> Result<ResetOutcome> {
    let (prefix, body) = match query.strip_prefix('?') {
        Some(body) => ("?", body),
        None => ("", query),
    };

    let mut reset = false;
    let kept: Vec<&str> = body
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((*pair, ""));
            if key == RESET_PARAM {
                reset |= value == "1";
                return false;
            }
            true
        })
        .collect();

    if !reset {
        return Ok(ResetOutcome {
            reset: false,
            query: query.to_string(),
        });
    }

    session.clear()?;
    info!("session: countdown reset requested from the launch query");

    let query = if kept.is_empty() {
        String::new()
    } else {
        format!("{prefix}{}", kept.join("&"))
    };
    Ok(ResetOutcome { reset: true, query })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FlagStore;
    use std::sync::Arc;

    fn reached_session() -> Session {
        let store = Arc::new(FlagStore::in_memory());
        store.set_birthday_reached(true).unwrap();
        Session::load(store, true).unwrap()
    }

    #[test]
    fn reset_param_is_stripped_and_applied() {
        let session = reached_session();
        let outcome = apply_reset_query("?foo=bar&resetCountdown=1&x=2", &session).unwrap();

        assert!(outcome.reset);
        assert_eq!(outcome.query, "?foo=bar&x=2");
        assert!(!session.is_reached());
    }

    #[test]
    fn lone_reset_param_leaves_an_empty_query() {
        let session = reached_session();
        let outcome = apply_reset_query("resetCountdown=1", &session).unwrap();
        assert_eq!(outcome.query, "");
        assert!(outcome.reset);
    }

    #[test]
    fn other_values_leave_the_query_alone() {
        let session = reached_session();
        let outcome = apply_reset_query("?resetCountdown=0", &session).unwrap();

        assert!(!outcome.reset);
        assert_eq!(outcome.query, "?resetCountdown=0");
        assert!(session.is_reached());
    }
}
