use commons::{Percentage, Token};
use concordium_std::*;

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct InitParams {
    /// Account receiving the market fee on every sale.
    pub fee_account: AccountAddress,
    /// Market fee charged on top of the listing price.
    pub fee_percent: Percentage,
}

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct ListParams {
    /// NFT to put up for sale.
    pub token: Token,
    /// Listing price. The buyer pays this plus the market fee.
    pub price: Amount,
}

#[derive(Debug, Clone, SchemaType, Serialize)]
pub enum ViewInternalValueParams {
    FeeAccount,
    FeePercent,
}

#[derive(Debug, Clone, SchemaType, Serialize, PartialEq, Eq)]
pub enum InternalValue {
    FeeAccount(AccountAddress),
    FeePercent(Percentage),
}
