use num_bigint::BigUint;
pub use starknet_rs_core::types::Felt;

use crate::error::ConversionError;

pub type Nonce = Felt;
pub type TransactionSignature = Vec<Felt>;
pub type CompiledClassHash = Felt;
pub type EntryPointSelector = Felt;
pub type Calldata = Vec<Felt>;
pub type ContractAddressSalt = Felt;
pub type BlockHash = Felt;
pub type TransactionHash = Felt;
pub type ClassHash = Felt;
pub type ContractAddress = Felt;
pub type Key = Felt;

/// Parses a `0x`-prefixed hex string. Unprefixed input is rejected so that decimal strings are
/// never silently read as hex.
pub fn felt_from_prefixed_hex(s: &str) -> Result<Felt, ConversionError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| ConversionError::CustomFromHexError(format!("missing 0x prefix: {s}")))?;

    parse_in_radix(digits, 16).map_err(|err| match err {
        ConversionError::InvalidFormat(_) => ConversionError::CustomFromHexError(s.to_string()),
        other => other,
    })
}

/// Parses either a `0x`-prefixed hex string or a decimal string into a felt. Values not below
/// the field prime are rejected instead of being reduced.
pub fn parse_felt(s: &str) -> Result<Felt, ConversionError> {
    let trimmed = s.trim();
    if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        felt_from_prefixed_hex(trimmed)
    } else {
        parse_in_radix(trimmed, 10)
    }
}

fn parse_in_radix(digits: &str, radix: u32) -> Result<Felt, ConversionError> {
    if digits.is_empty() {
        return Err(ConversionError::InvalidFormat("empty value".to_string()));
    }

    let value = BigUint::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| ConversionError::InvalidFormat(digits.to_string()))?;

    if value > Felt::MAX.to_biguint() {
        return Err(ConversionError::OutOfRangeError(format!(
            "{digits} is not below the field prime"
        )));
    }

    Ok(Felt::from(value))
}

/// Splits a 256-bit unsigned integer into its Cairo `u256` limbs.
/// Returns (low, high)
pub fn split_u256(value: &BigUint) -> Result<(Felt, Felt), ConversionError> {
    if value.bits() > 256 {
        return Err(ConversionError::OutOfRangeError(format!("{value} does not fit into u256")));
    }

    let low_mask = (BigUint::from(1_u8) << 128_u32) - 1_u8;
    let low = Felt::from(value & low_mask);
    let high = Felt::from(value >> 128);
    Ok((low, high))
}

/// Inverse of [`split_u256`]. Limbs wider than 128 bits are rejected.
pub fn join_u256(low: Felt, high: Felt) -> Result<BigUint, ConversionError> {
    let (low, high) = (low.to_biguint(), high.to_biguint());
    if low.bits() > 128 || high.bits() > 128 {
        return Err(ConversionError::OutOfRangeError("u256 limb wider than 128 bits".to_string()));
    }

    Ok((high << 128_u32) + low)
}

/// Parses a decimal amount into a 256-bit value.
pub fn parse_u256_amount(s: &str) -> Result<BigUint, ConversionError> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConversionError::InvalidFormat(format!("not a decimal amount: {s}")));
    }

    let value = BigUint::parse_bytes(trimmed.as_bytes(), 10)
        .ok_or_else(|| ConversionError::InvalidFormat(s.to_string()))?;
    if value.bits() > 256 {
        return Err(ConversionError::OutOfRangeError(format!("{s} does not fit into u256")));
    }

    Ok(value)
}
