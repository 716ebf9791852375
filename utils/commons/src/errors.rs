use super::*;

/// The custom errors the contract can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Listing price must be greater than zero (Error code: -4).
    InvalidPrice,
    /// No market item with the requested ID (Error code: -5).
    ItemNotFound,
    /// Attached amount does not cover item price and market fee
    /// (Error code: -6).
    InsufficientPayment,
    /// Market item has already been sold (Error code: -7).
    AlreadySold,
    /// Market fee above 100% (Error code: -8).
    InvalidFee,
    /// Only account addresses can call this function (Error code: -9).
    OnlyAccountAddress,
    /// This function must only be called by a contract (Error code: -10).
    ContractOnly,
    /// Failed to invoke a contract (Error code: -11).
    InvokeContractError,
    /// Failed to invoke a transfer (Error code: -12).
    InvokeTransferError,
    /// Incompatible contract (Error code: -13).
    Incompatible,
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping errors related to contract invocations to CustomContractError.
impl<T> From<CallContractError<T>> for CustomContractError {
    fn from(_cce: CallContractError<T>) -> Self {
        Self::InvokeContractError
    }
}

/// Mapping errors related to CCD transfers to CustomContractError.
impl From<TransferError> for CustomContractError {
    fn from(_te: TransferError) -> Self {
        Self::InvokeTransferError
    }
}
