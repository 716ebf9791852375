use super::*;

/// Token
#[derive(Debug, Serialize, SchemaType, Hash, PartialEq, Eq, Clone)]
pub struct Token {
    /// Address of the NFT contract holding the token.
    pub contract: ContractAddress,
    /// Token identifier within that contract.
    pub id: ContractTokenId,
}
