use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, TeamId};

/// An ordered party of characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub members: Vec<CharacterId>,
}

impl Team {
    pub fn new(name: impl Into<String>, members: Vec<CharacterId>) -> Self {
        Self {
            id: TeamId::new(),
            name: name.into(),
            members,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
