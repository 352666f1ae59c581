// Player profile as returned by the game API (through the relay).
//
// Only the fields the client renders are modelled; everything else in the
// upstream document is ignored. Optional objects deserialize to `None` both
// when the key is missing and when it is `null`.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub exp_level: u32,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub league: Option<League>,
    #[serde(default)]
    pub clan: Option<ClanSummary>,

    // Home village
    #[serde(default)]
    pub town_hall_level: u32,
    #[serde(default)]
    pub town_hall_weapon_level: Option<u32>,
    #[serde(default)]
    pub trophies: u32,
    #[serde(default)]
    pub best_trophies: u32,
    #[serde(default)]
    pub war_stars: u32,
    #[serde(default)]
    pub attack_wins: u32,
    #[serde(default)]
    pub defense_wins: u32,
    #[serde(default)]
    pub war_preference: Option<String>,
    #[serde(default)]
    pub donations: u32,
    #[serde(default)]
    pub donations_received: u32,
    #[serde(default)]
    pub clan_capital_contributions: u64,

    // Builder base
    #[serde(default)]
    pub builder_hall_level: u32,
    #[serde(default)]
    pub builder_base_trophies: u32,
    #[serde(default)]
    pub best_builder_base_trophies: u32,
    #[serde(default)]
    pub builder_base_league: Option<BuilderBaseLeague>,

    #[serde(default)]
    pub troops: Vec<Unit>,
    #[serde(default)]
    pub spells: Vec<Unit>,
    #[serde(default)]
    pub heroes: Vec<Unit>,
}

impl PlayerProfile {
    /// True when the player has opted in to clan wars.
    pub fn opted_in_to_war(&self) -> bool {
        self.war_preference.as_deref() == Some("in")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconUrls {
    #[serde(default)]
    pub tiny: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon_urls: IconUrls,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanSummary {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub clan_level: u32,
    #[serde(default)]
    pub badge_urls: IconUrls,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BuilderBaseLeague {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
}

/// Which village a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Village {
    Home,
    BuilderBase,
}

/// A troop, spell or hero with its upgrade level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub name: String,
    pub level: u32,
    pub max_level: u32,
    pub village: Village,
}

impl Unit {
    pub fn is_maxed(&self) -> bool {
        self.level == self.max_level
    }
}
