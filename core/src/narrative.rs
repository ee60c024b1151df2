//! Narrative generation: tactical advice and mission briefings.
//!
//! RULE: Narration is flavor. A narrator may fail or return nothing;
//! the engine always falls back to a fixed sentence and carries on.
//! Nothing in here mutates game state.

use crate::{
    building::BuildingCategory,
    mission::enemy_power,
    resources::{ResourceKind, Resources},
    state::GameState,
};
use std::fmt;

pub const BRIEFING_FALLBACK: &str = "Eliminate hostile elements in the vicinity.";
pub const ADVICE_FALLBACK: &str = "Communication link unstable. Rely on manual tactical assessment.";
pub const ADVICE_EMPTY: &str = "Status report unavailable. Maintain current trajectory.";

/// Source of flavor text. Implementations may call out to a remote
/// text generator; errors are absorbed by the callers below.
pub trait Narrator: Send + Sync {
    /// At most 100 words of strategic prose for the given situation.
    fn tactical_advice(&self, report: &SituationReport) -> anyhow::Result<String>;

    /// A one-sentence briefing for a mission of this difficulty.
    fn mission_briefing(&self, difficulty: u32) -> anyhow::Result<String>;
}

pub fn briefing_or_fallback(narrator: &dyn Narrator, difficulty: u32) -> String {
    match narrator.mission_briefing(difficulty) {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => BRIEFING_FALLBACK.to_string(),
        Err(e) => {
            log::warn!("mission briefing unavailable (difficulty {difficulty}): {e:#}");
            BRIEFING_FALLBACK.to_string()
        }
    }
}

pub fn advice_or_fallback(narrator: &dyn Narrator, report: &SituationReport) -> String {
    match narrator.tactical_advice(report) {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => ADVICE_EMPTY.to_string(),
        Err(e) => {
            log::warn!("tactical advice unavailable: {e:#}");
            ADVICE_FALLBACK.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Facility {
    pub name:     String,
    pub level:    u32,
    pub category: BuildingCategory,
    pub produces: Vec<ResourceKind>,
}

/// The text summary a narrator is asked to reason about.
#[derive(Debug, Clone, PartialEq)]
pub struct SituationReport {
    pub day:            u32,
    pub resources:      Resources,
    pub total_power:    u64,
    pub infrastructure: Vec<Facility>,
}

impl SituationReport {
    pub fn from_state(state: &GameState) -> Self {
        let infrastructure = state
            .buildings
            .iter()
            .map(|b| Facility {
                name:     b.name.clone(),
                level:    b.level,
                category: b.category,
                produces: ResourceKind::ALL
                    .into_iter()
                    .filter(|kind| b.produces(*kind))
                    .collect(),
            })
            .collect();
        Self {
            day: state.day,
            resources: state.resources,
            total_power: state.total_power(),
            infrastructure,
        }
    }

    pub fn command(&self) -> Option<&Facility> {
        self.infrastructure
            .iter()
            .find(|f| f.category == BuildingCategory::Command)
    }

    /// Power needed for even odds against the weakest raid this day.
    pub fn threat(&self) -> u64 {
        enemy_power(1, self.day) * 3 / 2
    }
}

impl fmt::Display for SituationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current Day: {}", self.day)?;
        writeln!(f, "Logistics: {}", self.resources)?;
        writeln!(f, "Combat Readiness: {} Combined Power", self.total_power)?;
        let levels = self
            .infrastructure
            .iter()
            .map(|fac| format!("{} (Lv.{})", fac.name, fac.level))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Infrastructure: {levels}")
    }
}

/// Reserve below which a stockpile counts as critical.
fn reserve_floor(kind: ResourceKind) -> i64 {
    match kind {
        ResourceKind::Gold  => 150,
        ResourceKind::Food  => 100,
        ResourceKind::Steel => 80,
        ResourceKind::Tech  => 20,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posture {
    ResourceStarved(ResourceKind),
    MilitaryWeak,
    OverExtended,
    Stable,
}

/// Classify the base, most urgent problem first.
pub fn assess(report: &SituationReport) -> Posture {
    if let Some(kind) = ResourceKind::ALL
        .into_iter()
        .find(|kind| report.resources.get(*kind) < reserve_floor(*kind))
    {
        return Posture::ResourceStarved(kind);
    }
    if report.total_power < report.threat() {
        return Posture::MilitaryWeak;
    }
    let command_level = report.command().map_or(1, |c| c.level);
    let capped = report
        .infrastructure
        .iter()
        .filter(|f| f.category != BuildingCategory::Command)
        .all(|f| f.level >= command_level);
    if capped {
        return Posture::OverExtended;
    }
    Posture::Stable
}

/// Offline narrator: rule-based advice and stock briefings.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldManual;

impl FieldManual {
    const BRIEFINGS: [&'static str; 6] = [
        "Scavenger crews are stripping a fuel cache on the eastern ridge; drive them off before nightfall.",
        "A raider outpost is taxing our convoys at the dry river crossing; burn it to the ground.",
        "Hostile armor is dug in around the old water plant; break the siege and reclaim the pumps.",
        "A drone nest is blinding our scouts over the salt flats; ground it and hold the high ground.",
        "Enemy heavy columns are massing at the collapsed overpass; hit them before they roll on the base.",
        "The warlord's inner guard holds the reactor vault; every squad goes in, and not all come back.",
    ];
}

impl Narrator for FieldManual {
    fn tactical_advice(&self, report: &SituationReport) -> anyhow::Result<String> {
        let day = report.day;
        let command = report
            .command()
            .map_or_else(|| "Command Center".to_string(), |c| c.name.clone());

        let advice = match assess(report) {
            Posture::ResourceStarved(kind) => {
                let source = report
                    .infrastructure
                    .iter()
                    .find(|f| f.produces.contains(&kind))
                    .map_or_else(|| "mission salvage".to_string(), |f| f.name.clone());
                format!(
                    "Day {day} assessment: {kind} reserves are critical at {}. Halt non-essential \
                     recruitment and push {source} before anything else. Launch no operation you \
                     cannot afford to lose until stockpiles recover.",
                    report.resources.get(kind)
                )
            }
            Posture::MilitaryWeak => format!(
                "Day {day} assessment: combined power of {} will not hold against raiding parties \
                 fielding {} strength. Prioritize Barracks throughput and field additional units \
                 before committing to any operation.",
                report.total_power,
                report.threat()
            ),
            Posture::OverExtended => format!(
                "Day {day} assessment: every facility is running at the ceiling set by {command}. \
                 Expansion is blocked. Commit Gold and Steel to the {command} upgrade immediately."
            ),
            Posture::Stable => format!(
                "Day {day} assessment: logistics and forces are in balance. Keep production \
                 running, cycle the mission board for salvage, and bank Steel for the next \
                 {command} upgrade."
            ),
        };
        Ok(advice)
    }

    fn mission_briefing(&self, difficulty: u32) -> anyhow::Result<String> {
        let index = (difficulty.max(1) as usize - 1).min(Self::BRIEFINGS.len() - 1);
        Ok(Self::BRIEFINGS[index].to_string())
    }
}

/// A narrator with no link at all. Every request fails, so every
/// caller sees the fallback text.
#[derive(Debug, Default, Clone, Copy)]
pub struct Offline;

impl Narrator for Offline {
    fn tactical_advice(&self, _report: &SituationReport) -> anyhow::Result<String> {
        anyhow::bail!("no narrative link configured")
    }

    fn mission_briefing(&self, _difficulty: u32) -> anyhow::Result<String> {
        anyhow::bail!("no narrative link configured")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    struct Silent;

    impl Narrator for Silent {
        fn tactical_advice(&self, _report: &SituationReport) -> anyhow::Result<String> {
            Ok("   ".into())
        }
        fn mission_briefing(&self, _difficulty: u32) -> anyhow::Result<String> {
            Ok(String::new())
        }
    }

    fn report() -> SituationReport {
        SituationReport::from_state(&GameState::initial(&GameConfig::default()))
    }

    #[test]
    fn failures_fall_back_to_fixed_text() {
        assert_eq!(briefing_or_fallback(&Offline, 3), BRIEFING_FALLBACK);
        assert_eq!(advice_or_fallback(&Offline, &report()), ADVICE_FALLBACK);
    }

    #[test]
    fn empty_replies_fall_back_too() {
        assert_eq!(briefing_or_fallback(&Silent, 3), BRIEFING_FALLBACK);
        assert_eq!(advice_or_fallback(&Silent, &report()), ADVICE_EMPTY);
    }

    #[test]
    fn report_lists_day_power_and_levels() {
        let text = report().to_string();
        assert!(text.contains("Current Day: 1"));
        assert!(text.contains("Gold(500), Food(500), Steel(200), Tech(50)"));
        assert!(text.contains("0 Combined Power"));
        assert!(text.contains("Command Center (Lv.1), Gold Mine (Lv.1)"));
    }

    #[test]
    fn fresh_base_is_military_weak() {
        assert_eq!(assess(&report()), Posture::MilitaryWeak);
    }

    #[test]
    fn starvation_outranks_weakness() {
        let mut r = report();
        r.resources.food = 10;
        assert_eq!(assess(&r), Posture::ResourceStarved(ResourceKind::Food));

        let advice = FieldManual.tactical_advice(&r).unwrap();
        assert!(advice.contains("Food reserves are critical at 10"));
        assert!(advice.contains("Hydroponic Farm"));
    }

    #[test]
    fn capped_infrastructure_is_over_extended() {
        let mut r = report();
        r.total_power = 10_000;
        assert_eq!(assess(&r), Posture::OverExtended);

        r.infrastructure[0].level = 2;
        assert_eq!(assess(&r), Posture::Stable);
    }

    #[test]
    fn advice_stays_under_a_hundred_words() {
        let mut r = report();
        for power in [0, 10_000] {
            r.total_power = power;
            let advice = FieldManual.tactical_advice(&r).unwrap();
            assert!(advice.split_whitespace().count() <= 100);
        }
    }

    #[test]
    fn briefings_cover_every_difficulty() {
        for difficulty in 0..20 {
            let text = FieldManual.mission_briefing(difficulty).unwrap();
            assert!(text.ends_with('.'));
        }
    }
}
