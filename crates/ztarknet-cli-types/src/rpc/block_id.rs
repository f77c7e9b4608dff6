use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;
use crate::felt::{felt_from_prefixed_hex, BlockHash};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockTag {
    Latest,
    PreConfirmed,
}

/// Block context a state query is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockId {
    Tag(BlockTag),
    Number {
        block_number: u64,
    },
    Hash {
        block_hash: BlockHash,
    },
}

impl BlockId {
    pub const LATEST: BlockId = BlockId::Tag(BlockTag::Latest);
    pub const PRE_CONFIRMED: BlockId = BlockId::Tag(BlockTag::PreConfirmed);
}

impl Default for BlockId {
    fn default() -> Self {
        BlockId::LATEST
    }
}

impl Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockId::Tag(BlockTag::Latest) => f.write_str("latest"),
            BlockId::Tag(BlockTag::PreConfirmed) => f.write_str("pre_confirmed"),
            BlockId::Number { block_number } => write!(f, "{block_number}"),
            BlockId::Hash { block_hash } => write!(f, "{block_hash:#x}"),
        }
    }
}

impl FromStr for BlockId {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(BlockId::LATEST),
            "pre_confirmed" | "pre-confirmed" => Ok(BlockId::PRE_CONFIRMED),
            hash if hash.starts_with("0x") => {
                Ok(BlockId::Hash { block_hash: felt_from_prefixed_hex(hash)? })
            }
            number => number
                .parse::<u64>()
                .map(|block_number| BlockId::Number { block_number })
                .map_err(|_| ConversionError::InvalidFormat(format!("invalid block id: {s}"))),
        }
    }
}
