// Profile rendering.
//
// `build_view` turns a profile into a `ProfileView`: plain data describing
// what is shown, section by section. The `Display` impl prints it for the
// terminal. Both are pure; rendering the same profile twice gives the same
// output.

use std::fmt;

use crate::profile::{PlayerProfile, Unit, Village};
use crate::session::Session;

/// Units of one category split by village. Order within each side follows
/// the input.
#[derive(Debug, Clone, PartialEq)]
pub struct VillageSplit<'a> {
    pub home: Vec<&'a Unit>,
    pub builder_base: Vec<&'a Unit>,
}

pub fn partition_by_village(units: &[Unit]) -> VillageSplit<'_> {
    let (home, builder_base) = units.iter().partition(|u| u.village == Village::Home);
    VillageSplit { home, builder_base }
}

/// Group an integer with `,` thousands separators (en-US style).
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn war_preference_label(profile: &PlayerProfile) -> &'static str {
    if profile.opted_in_to_war() {
        "In War"
    } else {
        "Out"
    }
}

// ── View model ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct UnitCard {
    pub name: String,
    pub level: String,
    /// Only set when the unit is not at its max level.
    pub max: Option<String>,
}

impl UnitCard {
    fn from_unit(unit: &Unit) -> Self {
        Self {
            name: unit.name.clone(),
            level: format!("Level: {}", unit.level),
            max: (!unit.is_maxed()).then(|| format!("Max: {}", unit.max_level)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitGrid {
    pub title: &'static str,
    pub cards: Vec<UnitCard>,
}

impl UnitGrid {
    fn new(title: &'static str, units: &[&Unit]) -> Self {
        Self {
            title,
            cards: units.iter().map(|u| UnitCard::from_unit(u)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeagueBadge {
    pub name: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClanPanel {
    pub name: String,
    pub tag: String,
    pub level: u32,
    pub badge_url: Option<String>,
}

/// `(label, value)` pairs for a stats block.
pub type StatLines = Vec<(&'static str, String)>;

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub title: String,
    pub exp_level: String,
    pub role: String,
    pub league: Option<LeagueBadge>,
    pub clan: Option<ClanPanel>,
    pub home_stats: StatLines,
    /// Troops, spells, heroes.
    pub home_army: Vec<UnitGrid>,
    pub builder_stats: StatLines,
    /// Troops, heroes.
    pub builder_army: Vec<UnitGrid>,
}

pub fn build_view(profile: &PlayerProfile) -> ProfileView {
    let troops = partition_by_village(&profile.troops);
    let spells = partition_by_village(&profile.spells);
    let heroes = partition_by_village(&profile.heroes);

    let league = profile.league.as_ref().and_then(|league| {
        league.icon_urls.medium.as_ref().map(|icon| LeagueBadge {
            name: league.name.clone(),
            icon_url: icon.clone(),
        })
    });

    let clan = profile.clan.as_ref().map(|clan| ClanPanel {
        name: clan.name.clone(),
        tag: clan.tag.clone(),
        level: clan.clan_level,
        badge_url: clan.badge_urls.medium.clone(),
    });

    let mut home_stats: StatLines = vec![("Town Hall Level", profile.town_hall_level.to_string())];
    if let Some(weapon) = profile.town_hall_weapon_level {
        home_stats.push(("Town Hall Weapon Level", weapon.to_string()));
    }
    home_stats.extend([
        ("Trophies", profile.trophies.to_string()),
        ("Best Trophies", profile.best_trophies.to_string()),
        ("War Stars", profile.war_stars.to_string()),
        ("Attack Wins", profile.attack_wins.to_string()),
        ("Defense Wins", profile.defense_wins.to_string()),
        ("War Preference", war_preference_label(profile).to_string()),
        ("Donations", profile.donations.to_string()),
        ("Donations Received", profile.donations_received.to_string()),
        (
            "Clan Capital Contributions",
            format_thousands(profile.clan_capital_contributions),
        ),
    ]);

    let mut builder_stats: StatLines = vec![
        ("Builder Hall Level", profile.builder_hall_level.to_string()),
        ("Versus Trophies", profile.builder_base_trophies.to_string()),
        (
            "Best Versus Trophies",
            profile.best_builder_base_trophies.to_string(),
        ),
    ];
    if let Some(league) = &profile.builder_base_league {
        builder_stats.push(("League", league.name.clone()));
    }

    ProfileView {
        title: format!("{} {}", profile.name, profile.tag),
        exp_level: profile.exp_level.to_string(),
        role: profile.role.clone().unwrap_or_default(),
        league,
        clan,
        home_stats,
        home_army: vec![
            UnitGrid::new("Troops", &troops.home),
            UnitGrid::new("Spells", &spells.home),
            UnitGrid::new("Heroes", &heroes.home),
        ],
        builder_stats,
        builder_army: vec![
            UnitGrid::new("Troops", &troops.builder_base),
            UnitGrid::new("Heroes", &heroes.builder_base),
        ],
    }
}

// ── Terminal output ───────────────────────────────────────────────────

fn write_stats(f: &mut fmt::Formatter<'_>, stats: &StatLines) -> fmt::Result {
    for (label, value) in stats {
        writeln!(f, "  {label}: {value}")?;
    }
    Ok(())
}

fn write_grids(f: &mut fmt::Formatter<'_>, grids: &[UnitGrid]) -> fmt::Result {
    for grid in grids {
        writeln!(f, "  {}", grid.title)?;
        if grid.cards.is_empty() {
            writeln!(f, "    (none)")?;
        }
        for card in &grid.cards {
            match &card.max {
                Some(max) => writeln!(f, "    {} | {} | {}", card.name, card.level, max)?,
                None => writeln!(f, "    {} | {}", card.name, card.level)?,
            }
        }
    }
    Ok(())
}

impl fmt::Display for ProfileView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "Exp Level: {}", self.exp_level)?;
        writeln!(f, "Role: {}", self.role)?;
        if let Some(league) = &self.league {
            writeln!(f, "League: {} ({})", league.name, league.icon_url)?;
        }

        if let Some(clan) = &self.clan {
            writeln!(f)?;
            writeln!(f, "Clan: {}", clan.name)?;
            writeln!(f, "  Level: {} | Tag: {}", clan.level, clan.tag)?;
            if let Some(badge) = &clan.badge_url {
                writeln!(f, "  Badge: {badge}")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "== Home Village ==")?;
        write_stats(f, &self.home_stats)?;
        writeln!(f, "-- Home Village Army --")?;
        write_grids(f, &self.home_army)?;

        writeln!(f)?;
        writeln!(f, "== Builder Base ==")?;
        write_stats(f, &self.builder_stats)?;
        writeln!(f, "-- Builder Base Army --")?;
        write_grids(f, &self.builder_army)
    }
}

/// Render the whole session: the error line if there is one, otherwise the
/// loaded profile (if any).
pub fn render_session(session: &Session) -> String {
    if session.loading {
        return "Loading...\n".to_string();
    }
    if !session.error.is_empty() {
        return format!("Error: {}\n", session.error);
    }
    session
        .profile
        .as_ref()
        .map(|profile| build_view(profile).to_string())
        .unwrap_or_default()
}
