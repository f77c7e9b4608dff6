use std::fmt::Display;
use std::str::FromStr;

use starknet_rs_core::chain_id::{MAINNET, SEPOLIA};
use starknet_rs_core::utils::{cairo_short_string_to_felt, parse_cairo_short_string};

use crate::error::ConversionError;
use crate::felt::{felt_from_prefixed_hex, Felt};

/// `ZTARKNET` encoded as a Cairo short string
pub const ZTARKNET: Felt = Felt::from_hex_unchecked("0x5a5441524b4e4554");

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChainId {
    Mainnet,
    Sepolia,
    #[default]
    Ztarknet,
    Custom(Felt),
}

impl ChainId {
    pub fn to_felt(&self) -> Felt {
        Felt::from(self)
    }
}

impl Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let felt = self.to_felt();
        match parse_cairo_short_string(&felt) {
            Ok(name) if !name.is_empty() => f.write_str(&name),
            _ => write!(f, "{felt:#x}"),
        }
    }
}

/// Accepts either a `0x`-prefixed felt or a short string such as `SN_SEPOLIA`.
impl FromStr for ChainId {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let felt = if s.starts_with("0x") || s.starts_with("0X") {
            felt_from_prefixed_hex(s)?
        } else {
            cairo_short_string_to_felt(&s.to_ascii_uppercase())
                .map_err(|err| ConversionError::ShortStringError(err.to_string()))?
        };

        Ok(ChainId::from(felt))
    }
}

impl From<Felt> for ChainId {
    fn from(felt: Felt) -> Self {
        if felt == MAINNET {
            ChainId::Mainnet
        } else if felt == SEPOLIA {
            ChainId::Sepolia
        } else if felt == ZTARKNET {
            ChainId::Ztarknet
        } else {
            ChainId::Custom(felt)
        }
    }
}

impl From<&ChainId> for Felt {
    fn from(value: &ChainId) -> Self {
        match value {
            ChainId::Mainnet => MAINNET,
            ChainId::Sepolia => SEPOLIA,
            ChainId::Ztarknet => ZTARKNET,
            ChainId::Custom(felt) => *felt,
        }
    }
}

impl From<ChainId> for Felt {
    fn from(value: ChainId) -> Self {
        Felt::from(&value)
    }
}
