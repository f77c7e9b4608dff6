use starknet_rs_core::types::Felt;
use ztarknet_types::felt::{parse_felt, parse_u256_amount, split_u256, Calldata};
use ztarknet_types::num_bigint::BigUint;

use crate::error::{Error, ZtarknetResult};

/// Parses comma separated calldata. Each item is a `0x` hex or decimal integer below the field
/// prime. An empty (or whitespace only) input is an empty sequence.
pub fn parse_calldata(raw: &str) -> ZtarknetResult<Calldata> {
    if raw.trim().is_empty() {
        return Ok(vec![]);
    }

    parse_calldata_items(raw.split(','))
}

/// Parses calldata that was already split into items
pub fn parse_calldata_items<I, S>(items: I) -> ZtarknetResult<Calldata>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let item = item.as_ref();
            parse_felt(item).map_err(|err| Error::InvalidCalldata {
                index,
                value: item.to_string(),
                reason: err.to_string(),
            })
        })
        .collect()
}

/// Decimal token amount as Cairo `u256` calldata: `[low, high]`
pub fn u256_calldata(amount: &BigUint) -> ZtarknetResult<[Felt; 2]> {
    let (low, high) = split_u256(amount)?;
    Ok([low, high])
}

pub fn parse_amount(raw: &str) -> ZtarknetResult<BigUint> {
    parse_u256_amount(raw).map_err(|err| Error::InvalidCalldata {
        index: 0,
        value: raw.to_string(),
        reason: err.to_string(),
    })
}
