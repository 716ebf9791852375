use super::*;

/// Sequential identifier assigned to market items, starting at 1. IDs are
/// dense: after listing N items, every ID from 1 to N refers to an item.
pub type ItemId = u64;

/// Contract token ID type.
pub type ContractTokenId = TokenIdVec;
