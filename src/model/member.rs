use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::Id;
use crate::error::{ReunionError, ReunionResult};

/// Coarse age bracket, used for headcounts and the tree legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AgeGroup {
    Adult,
    Child,
    Infant,
}

impl AgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Adult => "ADULT",
            AgeGroup::Child => "CHILD",
            AgeGroup::Infant => "INFANT",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeGroup {
    type Err = ReunionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADULT" => Ok(AgeGroup::Adult),
            "CHILD" => Ok(AgeGroup::Child),
            "INFANT" => Ok(AgeGroup::Infant),
            _ => Err(ReunionError::InvalidAgeGroup {
                value: s.to_string(),
            }),
        }
    }
}

/// One person in the family tree, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Id<Member>,
    pub name: String,
    pub age_group: AgeGroup,
    pub parent_id: Option<Id<Member>>,
    pub generation: u32,
    pub is_founder: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Member {
    pub fn is_parentless(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Generation of a child placed directly below this member.
    pub fn child_generation(&self) -> ReunionResult<u32> {
        self.generation
            .checked_add(1)
            .ok_or_else(|| ReunionError::GenerationOverflow {
                member_id: self.id.to_string(),
                generation: self.generation,
            })
    }
}

/// A member that has not been stored yet; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMember {
    pub name: String,
    pub age_group: AgeGroup,
    pub parent_id: Option<Id<Member>>,
    pub generation: u32,
    pub is_founder: bool,
}

impl NewMember {
    pub fn root(name: String, age_group: AgeGroup) -> Self {
        Self {
            name,
            age_group,
            parent_id: None,
            generation: 0,
            is_founder: false,
        }
    }

    pub fn founder(name: String, age_group: AgeGroup) -> Self {
        let mut m = Self::root(name, age_group);
        m.is_founder = true;
        m
    }

    pub fn child_of(name: String, age_group: AgeGroup, parent: &Member) -> ReunionResult<Self> {
        Ok(Self {
            name,
            age_group,
            parent_id: Some(parent.id),
            generation: parent.child_generation()?,
            is_founder: false,
        })
    }
}

/// Which members the tree builder treats as roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RootPolicy {
    /// Roots are exactly the founder-flagged members.
    #[default]
    Founders,
    /// Roots are the members without a parent.
    Parentless,
}

impl RootPolicy {
    pub fn is_root(&self, member: &Member) -> bool {
        match self {
            RootPolicy::Founders => member.is_founder,
            RootPolicy::Parentless => member.is_parentless(),
        }
    }
}
