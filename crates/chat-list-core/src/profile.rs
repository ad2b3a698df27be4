use serde::{Deserialize, Serialize};

pub type UserId = u64;

/// A friend's public profile as returned by the profile service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub rank: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Produces the display prefix and the rank subtitle for a row.
pub trait ProfileTitles {
    fn welcome_title(&self, profile: &Profile) -> String;
    fn rank_title(&self, rank: u32) -> String;
}

/// Rank thresholds in ascending order; the highest threshold not above the
/// rank wins.
const RANK_LADDER: [(u32, &str); 5] = [
    (0, "Rookie"),
    (5, "Regular"),
    (15, "Contender"),
    (30, "Champion"),
    (50, "Legend"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct LadderTitles;

impl ProfileTitles for LadderTitles {
    fn welcome_title(&self, profile: &Profile) -> String {
        match profile.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => self.rank_title(profile.rank),
        }
    }

    fn rank_title(&self, rank: u32) -> String {
        RANK_LADDER
            .iter()
            .rev()
            .find(|(threshold, _)| rank >= *threshold)
            .map_or("Rookie", |(_, label)| label)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(rank: u32, title: Option<&str>) -> Profile {
        Profile {
            id: 1,
            username: "ada".to_string(),
            avatar_url: "/avatars/ada.png".to_string(),
            rank,
            title: title.map(ToString::to_string),
        }
    }

    #[test]
    fn rank_title_picks_highest_reached_threshold() {
        let titles = LadderTitles;
        assert_eq!(titles.rank_title(0), "Rookie");
        assert_eq!(titles.rank_title(4), "Rookie");
        assert_eq!(titles.rank_title(5), "Regular");
        assert_eq!(titles.rank_title(29), "Contender");
        assert_eq!(titles.rank_title(1_000), "Legend");
    }

    #[test]
    fn welcome_title_prefers_explicit_title() {
        let titles = LadderTitles;
        assert_eq!(titles.welcome_title(&profile(40, Some("Captain"))), "Captain");
        assert_eq!(titles.welcome_title(&profile(40, Some("  "))), "Champion");
        assert_eq!(titles.welcome_title(&profile(40, None)), "Champion");
    }

    #[test]
    fn profile_decodes_with_optional_fields_missing() {
        let profile: Profile =
            serde_json::from_value(json!({ "id": 9, "username": "grace" })).expect("profile");
        assert_eq!(profile.id, 9);
        assert_eq!(profile.rank, 0);
        assert!(profile.avatar_url.is_empty());
        assert!(profile.title.is_none());
    }
}
