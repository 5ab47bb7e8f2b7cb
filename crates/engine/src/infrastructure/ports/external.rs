//! Combat resolution port.

use serde::{Deserialize, Serialize};

use delve_domain::{BattleStatistics, CharacterId, Encounter, EncounterId, Team};

use super::error::CombatError;

/// What a finished battle reports back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatResult {
    pub victory: bool,
    pub encounter_id: EncounterId,
    pub encounter_name: String,
    pub team_members: Vec<CharacterId>,
    pub statistics: BattleStatistics,
}

impl CombatResult {
    /// Rejects results that describe a different battle than the one fought.
    pub fn validate_for(&self, encounter: &Encounter) -> Result<(), CombatError> {
        if self.encounter_id != encounter.id {
            return Err(CombatError::MalformedResult(format!(
                "result is for encounter {} but {} was fought",
                self.encounter_id, encounter.id
            )));
        }
        if self.victory && !encounter.current_stats.is_defeated() {
            return Err(CombatError::MalformedResult(format!(
                "victory reported while {} still has {} HP",
                encounter.name, encounter.current_stats.hp
            )));
        }
        Ok(())
    }
}

/// Resolves a battle between a team and one encounter.
///
/// The resolver may mutate the encounter's current stats and the
/// participants' run-local stats. It must not keep any reference to run
/// state after returning.
#[cfg_attr(test, mockall::automock)]
pub trait CombatResolver: Send + Sync {
    fn resolve(&self, team: &Team, encounter: &mut Encounter)
        -> Result<CombatResult, CombatError>;
}
