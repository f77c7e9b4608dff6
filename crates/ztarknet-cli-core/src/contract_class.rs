use std::path::{Path, PathBuf};

use starknet_rs_core::types::contract::{CompiledClass, SierraClass};
use starknet_rs_core::types::Felt;
use tracing::debug;
use ztarknet_types::contract_class::SierraContractClass;
use ztarknet_types::felt::{ClassHash, CompiledClassHash};

use crate::error::{Error, ZtarknetResult};

/// Where the compiled (CASM) class hash of a declaration comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledClassSource {
    CasmFile(PathBuf),
    Hash(CompiledClassHash),
}

/// Everything a declare transaction needs about the class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarableClass {
    pub contract_class: SierraContractClass,
    pub class_hash: ClassHash,
    pub compiled_class_hash: CompiledClassHash,
}

fn load_error(path: &Path, msg: impl ToString) -> Error {
    Error::ContractClassLoad { path: path.display().to_string(), msg: msg.to_string() }
}

fn read_file(path: &Path) -> ZtarknetResult<String> {
    std::fs::read_to_string(path).map_err(|err| load_error(path, err))
}

/// Reads a Sierra artifact and computes its class hash
pub fn load_sierra_class(path: &Path) -> ZtarknetResult<(SierraContractClass, ClassHash)> {
    let sierra_class: SierraClass =
        serde_json::from_str(&read_file(path)?).map_err(|err| load_error(path, err))?;
    let class_hash = sierra_class.class_hash().map_err(|err| load_error(path, err))?;

    let flattened = sierra_class.flatten().map_err(|err| load_error(path, err))?;
    let contract_class = serde_json::to_value(flattened)
        .and_then(serde_json::from_value::<SierraContractClass>)
        .map_err(|err| load_error(path, err))?;

    debug!("Loaded Sierra class {class_hash:#x} from {}", path.display());
    Ok((contract_class, class_hash))
}

/// Reads a CASM artifact and computes the compiled class hash
pub fn load_compiled_class_hash(path: &Path) -> ZtarknetResult<CompiledClassHash> {
    let compiled_class: CompiledClass =
        serde_json::from_str(&read_file(path)?).map_err(|err| load_error(path, err))?;
    compiled_class.class_hash().map_err(|err| load_error(path, err))
}

pub fn load_declarable_class(
    sierra_path: &Path,
    compiled_class: &CompiledClassSource,
) -> ZtarknetResult<DeclarableClass> {
    let (contract_class, class_hash) = load_sierra_class(sierra_path)?;
    let compiled_class_hash: Felt = match compiled_class {
        CompiledClassSource::CasmFile(casm_path) => load_compiled_class_hash(casm_path)?,
        CompiledClassSource::Hash(hash) => *hash,
    };

    Ok(DeclarableClass { contract_class, class_hash, compiled_class_hash })
}
