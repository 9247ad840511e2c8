//! # Invocation Dispatch
//!
//! Maps a platform invocation (function name plus positional string
//! arguments) onto [`AssetContract`] operations and renders each result as
//! the text payload returned to the submitter.
//!
//! ## Payloads
//!
//! | Function | Payload |
//! |----------|---------|
//! | `InitLedger` | canonical array of the seeded records |
//! | `CreateAsset`, `UpdateAssetStatus` | canonical record as stored |
//! | `ReadAsset` | stored value verbatim |
//! | `TransferAsset` | previous owner, unquoted |
//! | `Exists`, `CheckAssetStatus`, `IsStatusValid` | `true` / `false` |
//! | `ListAll` | canonical array of listed values |
//! | `CheckTemperature` | `false` (exists), canonical record (created), `null` (within window) |
//!
//! `GetAllAssets` and `AssetExists` are accepted as aliases of `ListAll` and
//! `Exists`.

use std::str::FromStr;

use coldchain_core::{AssetStatus, CanonicalBytes, LedgerRecord, Temperature};

use crate::contract::{AssetContract, TemperatureCheck};
use crate::error::ContractError;
use crate::ledger::LedgerContext;
use crate::memory::MemoryLedger;

/// Every function the contract exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractFunction {
    InitLedger,
    CreateAsset,
    ReadAsset,
    UpdateAssetStatus,
    TransferAsset,
    Exists,
    ListAll,
    CheckTemperature,
    CheckAssetStatus,
    IsStatusValid,
}

impl ContractFunction {
    pub fn all() -> &'static [ContractFunction] {
        &[
            Self::InitLedger,
            Self::CreateAsset,
            Self::ReadAsset,
            Self::UpdateAssetStatus,
            Self::TransferAsset,
            Self::Exists,
            Self::ListAll,
            Self::CheckTemperature,
            Self::CheckAssetStatus,
            Self::IsStatusValid,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitLedger => "InitLedger",
            Self::CreateAsset => "CreateAsset",
            Self::ReadAsset => "ReadAsset",
            Self::UpdateAssetStatus => "UpdateAssetStatus",
            Self::TransferAsset => "TransferAsset",
            Self::Exists => "Exists",
            Self::ListAll => "ListAll",
            Self::CheckTemperature => "CheckTemperature",
            Self::CheckAssetStatus => "CheckAssetStatus",
            Self::IsStatusValid => "IsStatusValid",
        }
    }

    /// Number of positional arguments.
    pub fn arity(&self) -> usize {
        match self {
            Self::InitLedger | Self::ListAll => 0,
            Self::ReadAsset | Self::Exists | Self::CheckAssetStatus | Self::IsStatusValid => 1,
            Self::UpdateAssetStatus | Self::TransferAsset => 2,
            Self::CreateAsset | Self::CheckTemperature => 5,
        }
    }
}

impl std::fmt::Display for ContractFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractFunction {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GetAllAssets" => Ok(Self::ListAll),
            "AssetExists" => Ok(Self::Exists),
            other => Self::all()
                .iter()
                .copied()
                .find(|f| f.as_str() == other)
                .ok_or_else(|| ContractError::UnknownFunction(other.to_string())),
        }
    }
}

impl AssetContract {
    /// Run one invocation and render its result as text.
    pub fn invoke<C, S>(&self, ctx: &mut C, function: &str, args: &[S]) -> Result<String, ContractError>
    where
        C: LedgerContext + ?Sized,
        S: AsRef<str>,
    {
        let function: ContractFunction = function.parse()?;
        if args.len() != function.arity() {
            return Err(ContractError::ArgumentCount {
                function: function.as_str(),
                expected: function.arity(),
                actual: args.len(),
            });
        }
        let arg = |i: usize| args[i].as_ref();

        let payload = match function {
            ContractFunction::InitLedger => {
                let records: Vec<LedgerRecord> = self
                    .init_ledger(ctx)?
                    .into_iter()
                    .map(LedgerRecord::Asset)
                    .collect();
                CanonicalBytes::new(&records)?.to_string()
            }
            ContractFunction::CreateAsset => {
                let temperature = parse_temperature(function, arg(1))?;
                self.create_asset(ctx, arg(0), temperature, arg(2), arg(3), arg(4))?
                    .encode()?
                    .to_string()
            }
            ContractFunction::ReadAsset => self.read_asset(&*ctx, arg(0))?,
            ContractFunction::UpdateAssetStatus => self
                .update_asset_status(ctx, arg(0), arg(1))?
                .encode()?
                .to_string(),
            ContractFunction::TransferAsset => self.transfer_asset(ctx, arg(0), arg(1))?,
            ContractFunction::Exists => self.exists(&*ctx, arg(0))?.to_string(),
            ContractFunction::ListAll => CanonicalBytes::new(&self.list_all(&*ctx)?)?.to_string(),
            ContractFunction::CheckTemperature => {
                let temperature = parse_temperature(function, arg(1))?;
                match self.check_temperature(ctx, arg(0), temperature, arg(2), arg(3), arg(4))? {
                    TemperatureCheck::AlreadyExists => "false".to_string(),
                    TemperatureCheck::Created(asset) => asset.encode()?.to_string(),
                    TemperatureCheck::WithinRange => "null".to_string(),
                }
            }
            ContractFunction::CheckAssetStatus => self.check_asset_status(&*ctx, arg(0))?.to_string(),
            ContractFunction::IsStatusValid => AssetStatus::is_valid(arg(0)).to_string(),
        };
        Ok(payload)
    }
}

fn parse_temperature(function: ContractFunction, raw: &str) -> Result<Temperature, ContractError> {
    let invalid = |reason: String| ContractError::InvalidArgument {
        function: function.as_str(),
        name: "temperature",
        value: raw.to_string(),
        reason,
    };
    let value: f64 = raw.parse().map_err(|e: std::num::ParseFloatError| invalid(e.to_string()))?;
    Temperature::new(value).map_err(|e| invalid(e.to_string()))
}

/// HTTP-style status of a successful invocation.
pub const STATUS_OK: u16 = 200;
/// HTTP-style status of a failed invocation.
pub const STATUS_ERROR: u16 = 500;

/// Result of a submitted invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub message: String,
    pub payload: Vec<u8>,
}

impl Response {
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: STATUS_OK,
            message: String::new(),
            payload,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    pub fn payload_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

/// Run one invocation atomically against `ledger`.
///
/// Writes are committed only if the invocation succeeds; on failure the
/// ledger is left exactly as it was.
pub fn submit<S: AsRef<str>>(
    ledger: &mut MemoryLedger,
    contract: &AssetContract,
    function: &str,
    args: &[S],
) -> Response {
    let mut tx = ledger.begin();
    match contract.invoke(&mut tx, function, args) {
        Ok(payload) => {
            let written = tx.commit();
            tracing::info!(function, written, "invocation committed");
            Response::success(payload.into_bytes())
        }
        Err(err) => {
            tracing::warn!(function, error = %err, "invocation rejected");
            Response::error(format!("{function}: {err}"))
        }
    }
}
