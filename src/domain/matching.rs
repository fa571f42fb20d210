// src/domain/matching.rs
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::models::UserId;

/// Rule deciding when a property counts as a mutual match.
///
/// The evaluation only ever looks at two sets: who liked the property and
/// who currently belongs to the property's group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Two likes from anyone.
    FixedPair,
    /// Two likes, and the group has at least two members.
    PairedGroup,
    /// Every current member liked it, and there is at least one member.
    #[default]
    AllMembers,
}

impl MatchPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed-pair" | "v1" => Some(Self::FixedPair),
            "paired-group" | "v2" => Some(Self::PairedGroup),
            "all-members" | "v3" => Some(Self::AllMembers),
            _ => None,
        }
    }

    pub fn is_matched(&self, likers: &BTreeSet<UserId>, members: &BTreeSet<UserId>) -> bool {
        match self {
            MatchPolicy::FixedPair => likers.len() >= 2,
            MatchPolicy::PairedGroup => members.len() >= 2 && likers.len() >= 2,
            MatchPolicy::AllMembers => !members.is_empty() && members.is_subset(likers),
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::FixedPair => write!(f, "fixed-pair"),
            MatchPolicy::PairedGroup => write!(f, "paired-group"),
            MatchPolicy::AllMembers => write!(f, "all-members"),
        }
    }
}
