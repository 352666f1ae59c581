// Search session: the state behind the search form and the profile view.
//
// Every search gets a sequence number. A result is applied only if its
// sequence number is still the latest one issued, so a slow response can
// never overwrite the outcome of a newer search.

use tracing::{debug, info};

use crate::profile::PlayerProfile;
use crate::relay_client::{ClientError, RelayClient};

pub const EMPTY_TAG_MESSAGE: &str = "Please enter a player tag";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to fetch player information";

/// Handle for one issued search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub tag: String,
}

#[derive(Debug, Default)]
pub struct Session {
    pub tag: String,
    pub profile: Option<PlayerProfile>,
    /// Empty when there is no error to show.
    pub error: String,
    pub loading: bool,
    latest_seq: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The submit control is disabled while a search is in flight.
    pub fn can_submit(&self) -> bool {
        !self.loading
    }

    /// Validate `tag` and mark a search as started.
    ///
    /// Returns `None` (and sets the validation error) for an empty tag; no
    /// request must be sent in that case.
    pub fn begin_search(&mut self, tag: &str) -> Option<SearchTicket> {
        self.tag = tag.to_string();
        if tag.is_empty() {
            self.error = EMPTY_TAG_MESSAGE.to_string();
            return None;
        }
        self.loading = true;
        self.error.clear();
        self.latest_seq += 1;
        debug!(seq = self.latest_seq, tag, "search started");
        Some(SearchTicket {
            seq: self.latest_seq,
            tag: tag.to_string(),
        })
    }

    /// Apply the outcome of a search. Returns `false` if the ticket was
    /// superseded by a newer search and the result was dropped.
    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        result: Result<PlayerProfile, ClientError>,
    ) -> bool {
        if ticket.seq != self.latest_seq {
            debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                "discarding stale search result"
            );
            return false;
        }

        match result {
            Ok(profile) => {
                info!(tag = %ticket.tag, name = %profile.name, "player loaded");
                self.profile = Some(profile);
                self.error.clear();
            }
            Err(e) => {
                let message = e.to_string();
                info!(
                    tag = %ticket.tag,
                    status = ?e.status(),
                    error = %message,
                    "player lookup failed"
                );
                self.error = if message.is_empty() {
                    GENERIC_FAILURE_MESSAGE.to_string()
                } else {
                    message
                };
                self.profile = None;
            }
        }
        self.loading = false;
        true
    }

    /// Run one complete search against the relay.
    pub async fn search(&mut self, client: &RelayClient, tag: &str) {
        let Some(ticket) = self.begin_search(tag) else {
            return;
        };
        let result = client.get_player(&ticket.tag).await;
        self.finish_search(&ticket, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> PlayerProfile {
        serde_json::from_value(serde_json::json!({ "name": name })).unwrap()
    }

    fn relay_error(message: &str) -> ClientError {
        ClientError::Relay {
            status: 404,
            message: message.to_string(),
        }
    }

    #[test]
    fn empty_tag_sets_validation_error() {
        let mut session = Session::new();
        assert!(session.begin_search("").is_none());
        assert_eq!(session.error, EMPTY_TAG_MESSAGE);
        assert!(!session.loading);
        assert!(session.can_submit());
    }

    #[test]
    fn begin_search_clears_error_and_sets_loading() {
        let mut session = Session::new();
        session.begin_search("");
        let ticket = session.begin_search("#ABC").unwrap();
        assert_eq!(ticket.tag, "#ABC");
        assert!(session.error.is_empty());
        assert!(session.loading);
        assert!(!session.can_submit());
    }

    #[test]
    fn success_then_failure_shows_only_error() {
        let mut session = Session::new();
        let ticket = session.begin_search("A").unwrap();
        assert!(session.finish_search(&ticket, Ok(profile("Ash"))));
        assert_eq!(session.profile.as_ref().unwrap().name, "Ash");
        assert!(!session.loading);

        let ticket = session.begin_search("B").unwrap();
        session.finish_search(&ticket, Err(relay_error("notFound")));
        assert_eq!(session.error, "notFound");
        assert!(session.profile.is_none());
        assert!(!session.loading);
    }

    #[test]
    fn success_clears_previous_error() {
        let mut session = Session::new();
        let ticket = session.begin_search("A").unwrap();
        session.finish_search(&ticket, Err(relay_error("accessDenied")));
        assert_eq!(session.error, "accessDenied");

        let ticket = session.begin_search("A").unwrap();
        session.finish_search(&ticket, Ok(profile("Ash")));
        assert!(session.error.is_empty());
        assert!(session.profile.is_some());
    }

    #[test]
    fn empty_failure_message_uses_fallback() {
        let mut session = Session::new();
        let ticket = session.begin_search("A").unwrap();
        session.finish_search(&ticket, Err(relay_error("")));
        assert_eq!(session.error, GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn stale_result_is_discarded() {
        let mut session = Session::new();
        let first = session.begin_search("FIRST").unwrap();
        let second = session.begin_search("SECOND").unwrap();
        assert!(second.seq > first.seq);

        // The newer search resolves first, then the stale one arrives.
        assert!(session.finish_search(&second, Ok(profile("Second"))));
        assert!(!session.finish_search(&first, Ok(profile("First"))));

        assert_eq!(session.profile.as_ref().unwrap().name, "Second");
        assert!(!session.loading);
    }

    #[test]
    fn stale_result_does_not_clear_loading() {
        let mut session = Session::new();
        let first = session.begin_search("FIRST").unwrap();
        let _second = session.begin_search("SECOND").unwrap();

        assert!(!session.finish_search(&first, Err(relay_error("late"))));
        assert!(session.loading);
        assert!(session.error.is_empty());
    }
}
