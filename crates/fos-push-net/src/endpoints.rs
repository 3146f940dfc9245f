//! Push service resource paths
//!
//! All paths are relative to the API base URL.

/// Create a player
pub fn players() -> String {
    "players".to_string()
}

/// A player resource (tag sync and lookup)
pub fn player(player_id: &str) -> String {
    format!("players/{}", player_id)
}

/// Session heartbeat for an existing player
pub fn player_on_session(player_id: &str) -> String {
    format!("players/{}/on_session", player_id)
}

/// Most recent notification sent to an app's devices
pub fn last_notification(app_id: &str, language: &str) -> String {
    format!("apps/{}/last_notification?language={}", app_id, language)
}

/// A notification resource (open acknowledgment)
pub fn notification(notification_id: &str) -> String {
    format!("notifications/{}", notification_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(players(), "players");
        assert_eq!(player("p1"), "players/p1");
        assert_eq!(player_on_session("p1"), "players/p1/on_session");
        assert_eq!(last_notification("app", "en"), "apps/app/last_notification?language=en");
        assert_eq!(notification("n-9"), "notifications/n-9");
    }
}
