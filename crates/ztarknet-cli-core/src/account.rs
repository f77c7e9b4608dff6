use std::fmt::Debug;

use rand::rngs::OsRng;
use rand::TryRngCore;
use starknet_rs_core::types::Felt;
use starknet_rs_signers::SigningKey;
use ztarknet_types::felt::{ContractAddress, TransactionSignature};

use crate::constants::EC_ORDER;
use crate::error::{Error, ZtarknetResult};

/// Draws up to this many candidates before giving up on the random source
const MAX_KEY_SAMPLING_ATTEMPTS: usize = 64;

/// Secret scalar of an account key. Never printed through `Debug`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PrivateKey(Felt);

impl PrivateKey {
    /// Wraps an existing scalar. Zero and values not below the curve order are rejected.
    pub fn new(secret_scalar: Felt) -> ZtarknetResult<Self> {
        if secret_scalar == Felt::ZERO || secret_scalar >= EC_ORDER {
            return Err(Error::MissingConfiguration {
                msg: "private key must be in the range [1, curve order)".to_string(),
            });
        }

        Ok(Self(secret_scalar))
    }

    pub fn secret_scalar(&self) -> Felt {
        self.0
    }

    /// Fixed-width (64 hex digits) `0x`-prefixed encoding
    pub fn to_fixed_hex_string(&self) -> String {
        format!("{:#066x}", self.0)
    }
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Samples a private key uniformly from `[1, curve order)` using the operating system's secure
/// random source.
pub fn generate_private_key() -> ZtarknetResult<PrivateKey> {
    let mut rng = OsRng;
    for _ in 0..MAX_KEY_SAMPLING_ATTEMPTS {
        let mut bytes = [0_u8; 32];
        rng.try_fill_bytes(&mut bytes).map_err(|err| Error::EntropyError { msg: err.to_string() })?;
        // the curve order is just above 2**251, so 252 bits keep the rejection rate low
        bytes[0] &= 0x0f;

        let candidate = Felt::from_bytes_be(&bytes);
        if candidate != Felt::ZERO && candidate < EC_ORDER {
            return Ok(PrivateKey(candidate));
        }
    }

    Err(Error::EntropyError {
        msg: format!("no valid scalar after {MAX_KEY_SAMPLING_ATTEMPTS} attempts"),
    })
}

/// Public key (x coordinate of `priv * G`) of the given private key
pub fn derive_public_key(private_key: &PrivateKey) -> Felt {
    SigningKey::from_secret_scalar(private_key.secret_scalar()).verifying_key().scalar()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPair {
    pub private_key: PrivateKey,
    pub public_key: Felt,
}

impl KeyPair {
    pub fn generate() -> ZtarknetResult<Self> {
        Self::from_private_key(generate_private_key()?)
    }

    pub fn from_private_key(private_key: PrivateKey) -> ZtarknetResult<Self> {
        Ok(Self { private_key, public_key: derive_public_key(&private_key) })
    }
}

/// An account as seen by the toolkit: where it lives and, optionally, the key that signs for it
#[derive(Clone)]
pub struct AccountIdentity {
    pub address: ContractAddress,
    pub public_key: Option<Felt>,
    signer: Option<SigningKey>,
}

impl AccountIdentity {
    pub fn new(address: ContractAddress, private_key: Option<PrivateKey>) -> Self {
        let signer = private_key.map(|key| SigningKey::from_secret_scalar(key.secret_scalar()));
        let public_key = signer.as_ref().map(|signer| signer.verifying_key().scalar());
        Self { address, public_key, signer }
    }

    /// Identity that can be queried but not used as a transaction sender
    pub fn read_only(address: ContractAddress) -> Self {
        Self::new(address, None)
    }

    pub fn can_sign(&self) -> bool {
        self.signer.is_some()
    }

    /// Signs a transaction hash, returning `[r, s]`
    pub fn sign_hash(
        &self,
        operation: &'static str,
        hash: &Felt,
    ) -> ZtarknetResult<TransactionSignature> {
        let signer = self
            .signer
            .as_ref()
            .ok_or(Error::UnsignedAccount { operation, address: self.address })?;

        let signature =
            signer.sign(hash).map_err(|err| Error::Signing { operation, msg: err.to_string() })?;
        Ok(vec![signature.r, signature.s])
    }
}

impl Debug for AccountIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountIdentity")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .field("can_sign", &self.can_sign())
            .finish()
    }
}
