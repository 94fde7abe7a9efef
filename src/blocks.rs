//! Workout block definitions - fixed training plan

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a workout block
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BlockId {
    B1,
    B2,
    B3,
}

impl BlockId {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockId::B1 => "B1",
            BlockId::B2 => "B2",
            BlockId::B3 => "B3",
        }
    }

    /// Parse `B1`/`b1`/`1` style input from the command line or keyboard
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().trim_start_matches('B') {
            "1" => Some(BlockId::B1),
            "2" => Some(BlockId::B2),
            "3" => Some(BlockId::B3),
            _ => None,
        }
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutBlock {
    pub id: BlockId,
    /// Translation key of the block name
    pub name: &'static str,
    /// Translation keys of the exercises, in display order
    pub exercises: &'static [&'static str],
}

pub const WORKOUT_BLOCKS: &[WorkoutBlock] = &[
    WorkoutBlock {
        id: BlockId::B1,
        name: "b1Name",
        exercises: &["bicepCurls", "frenchPress"],
    },
    WorkoutBlock {
        id: BlockId::B2,
        name: "b2Name",
        exercises: &["militaryPress", "reverseCurls"],
    },
    WorkoutBlock {
        id: BlockId::B3,
        name: "b3Name",
        exercises: &["uprightRow", "wristCurls"],
    },
];

pub fn all_blocks() -> &'static [WorkoutBlock] {
    WORKOUT_BLOCKS
}

pub fn find_block(id: BlockId) -> Option<&'static WorkoutBlock> {
    WORKOUT_BLOCKS.iter().find(|b| b.id == id)
}

/// Block for displaying a stored session, first block if the id is not in the plan
pub fn resolve_block(id: BlockId) -> &'static WorkoutBlock {
    find_block(id).unwrap_or(&WORKOUT_BLOCKS[0])
}

/// Block id of a stored session.
///
/// Ids that no longer exist in the plan map to the first defined block
/// instead of failing the whole history load.
pub fn resolve_block_id(raw: &str) -> BlockId {
    match BlockId::parse(raw) {
        Some(id) if raw.trim().to_ascii_uppercase().starts_with('B') => id,
        _ => {
            tracing::warn!("Unknown block id {:?}, falling back to {}", raw, WORKOUT_BLOCKS[0].id);
            WORKOUT_BLOCKS[0].id
        }
    }
}

/// Serde helper for [`resolve_block_id`]
pub fn deserialize_block_id<'de, D>(deserializer: D) -> Result<BlockId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(resolve_block_id(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_defined_in_order() {
        let ids: Vec<_> = all_blocks().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![BlockId::B1, BlockId::B2, BlockId::B3]);
    }

    #[test]
    fn test_every_block_has_exercises() {
        for block in all_blocks() {
            assert!(!block.exercises.is_empty(), "{} has no exercises", block.id);
        }
    }

    #[test]
    fn test_find_block() {
        let block = find_block(BlockId::B2).unwrap();
        assert_eq!(block.exercises, &["militaryPress", "reverseCurls"]);
    }

    #[test]
    fn test_resolve_block_known_id() {
        assert_eq!(resolve_block(BlockId::B3).id, BlockId::B3);
    }

    #[test]
    fn test_resolve_block_id_falls_back_to_first_block() {
        assert_eq!(resolve_block_id("B2"), BlockId::B2);
        assert_eq!(resolve_block_id("B9"), BlockId::B1);
        assert_eq!(resolve_block_id("legs"), BlockId::B1);
        assert_eq!(resolve_block_id("2"), BlockId::B1);
    }

    #[test]
    fn test_block_id_parse() {
        assert_eq!(BlockId::parse("B1"), Some(BlockId::B1));
        assert_eq!(BlockId::parse("b2"), Some(BlockId::B2));
        assert_eq!(BlockId::parse("3"), Some(BlockId::B3));
        assert_eq!(BlockId::parse("B4"), None);
        assert_eq!(BlockId::parse(""), None);
    }

    #[test]
    fn test_block_id_serializes_as_string() {
        assert_eq!(serde_json::to_string(&BlockId::B1).unwrap(), "\"B1\"");
        let id: BlockId = serde_json::from_str("\"B3\"").unwrap();
        assert_eq!(id, BlockId::B3);
    }
}
