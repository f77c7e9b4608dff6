use std::fmt::Display;
use std::str::FromStr;

use tracing::debug;
use ztarknet_types::transactions::{Resource, ResourceBounds, ResourceBoundsMapping};

use crate::constants::{
    DEFAULT_L1_DATA_GAS_MAX_AMOUNT, DEFAULT_L1_DATA_GAS_MAX_PRICE_PER_UNIT,
    DEFAULT_L1_GAS_MAX_AMOUNT, DEFAULT_L1_GAS_MAX_PRICE_PER_UNIT, DEFAULT_L2_GAS_MAX_AMOUNT,
    DEFAULT_L2_GAS_MAX_PRICE_PER_UNIT, DEFAULT_LEGACY_MAX_FEE, DEFAULT_TIP,
};
use crate::error::{Error, ZtarknetResult};

/// Transaction version strategy, selected once per run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionVersion {
    /// INVOKE v1, DEPLOY_ACCOUNT v1 and DECLARE v2, paid with a max fee
    LegacyV1,
    /// Version 3 transactions paid with resource bounds
    #[default]
    V3,
}

impl FromStr for TransactionVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" | "legacy" => Ok(TransactionVersion::LegacyV1),
            "v3" | "3" => Ok(TransactionVersion::V3),
            other => Err(Error::InvalidFeeSpec {
                msg: format!("unknown transaction version {other:?}; expected v1 or v3"),
            }),
        }
    }
}

impl Display for TransactionVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionVersion::LegacyV1 => f.write_str("v1"),
            TransactionVersion::V3 => f.write_str("v3"),
        }
    }
}

/// Fee representation attached to exactly one transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeSpec {
    LegacyMaxFee(u128),
    ResourceBounds { bounds: ResourceBoundsMapping, tip: u64 },
}

impl FeeSpec {
    pub fn version(&self) -> TransactionVersion {
        match self {
            FeeSpec::LegacyMaxFee(_) => TransactionVersion::LegacyV1,
            FeeSpec::ResourceBounds { .. } => TransactionVersion::V3,
        }
    }
}

/// Caller-supplied fee values. Fields left as `None` fall back to the policy defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeOverrides {
    pub max_fee: Option<u128>,
    pub l1_gas: Option<u64>,
    pub l1_gas_price: Option<u128>,
    pub l2_gas: Option<u64>,
    pub l2_gas_price: Option<u128>,
    pub l1_data_gas: Option<u64>,
    pub l1_data_gas_price: Option<u128>,
    pub tip: Option<u64>,
}

impl FeeOverrides {
    fn has_resource_bound_overrides(&self) -> bool {
        self.l1_gas.is_some()
            || self.l1_gas_price.is_some()
            || self.l2_gas.is_some()
            || self.l2_gas_price.is_some()
            || self.l1_data_gas.is_some()
            || self.l1_data_gas_price.is_some()
            || self.tip.is_some()
    }
}

/// Static fee defaults. Fees are never estimated against the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePolicy {
    pub default_max_fee: u128,
    pub default_resource_bounds: ResourceBoundsMapping,
    pub default_tip: u64,
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            default_max_fee: DEFAULT_LEGACY_MAX_FEE,
            default_resource_bounds: ResourceBoundsMapping::new(
                DEFAULT_L1_GAS_MAX_AMOUNT,
                DEFAULT_L1_GAS_MAX_PRICE_PER_UNIT,
                DEFAULT_L1_DATA_GAS_MAX_AMOUNT,
                DEFAULT_L1_DATA_GAS_MAX_PRICE_PER_UNIT,
                DEFAULT_L2_GAS_MAX_AMOUNT,
                DEFAULT_L2_GAS_MAX_PRICE_PER_UNIT,
            ),
            default_tip: DEFAULT_TIP,
        }
    }
}

impl FeePolicy {
    /// Builds the fee representation for `version`. Overrides belonging to the other version's
    /// representation are rejected rather than ignored.
    pub fn build_fee_spec(
        &self,
        version: TransactionVersion,
        overrides: &FeeOverrides,
    ) -> ZtarknetResult<FeeSpec> {
        let fee_spec = match version {
            TransactionVersion::LegacyV1 => {
                if overrides.has_resource_bound_overrides() {
                    return Err(Error::InvalidFeeSpec {
                        msg: "resource bounds and tip apply to v3 transactions only".to_string(),
                    });
                }

                FeeSpec::LegacyMaxFee(overrides.max_fee.unwrap_or(self.default_max_fee))
            }
            TransactionVersion::V3 => {
                if overrides.max_fee.is_some() {
                    return Err(Error::InvalidFeeSpec {
                        msg: "max fee applies to v1 transactions only".to_string(),
                    });
                }

                let mut bounds = self.default_resource_bounds;
                for (resource, amount, price) in [
                    (Resource::L1Gas, overrides.l1_gas, overrides.l1_gas_price),
                    (Resource::L2Gas, overrides.l2_gas, overrides.l2_gas_price),
                    (Resource::L1DataGas, overrides.l1_data_gas, overrides.l1_data_gas_price),
                ] {
                    let default = *bounds.get(resource);
                    *bounds.get_mut(resource) = ResourceBounds::new(
                        amount.unwrap_or(default.max_amount),
                        price.unwrap_or(default.max_price_per_unit),
                    );
                }

                FeeSpec::ResourceBounds { bounds, tip: overrides.tip.unwrap_or(self.default_tip) }
            }
        };

        debug!("Fee spec for {version} transactions: {fee_spec:?}");
        Ok(fee_spec)
    }
}
