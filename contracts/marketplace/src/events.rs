use commons::{ContractTokenId, ItemId, Token, BOUGHT_TAG, OFFERED_TAG};
use concordium_std::*;

/// Item offered for sale event data.
#[derive(Debug, Serial)]
pub struct OfferedEvent<'a> {
    /// Market item identifier.
    pub item_id: ItemId,
    /// Token contract address.
    pub contract: &'a ContractAddress,
    /// Token identifier.
    pub id: &'a ContractTokenId,
    /// Listed price.
    pub price: Amount,
    /// Address of the seller.
    pub seller: &'a AccountAddress,
}

/// Item bought event data.
#[derive(Debug, Serial)]
pub struct BoughtEvent<'a> {
    /// Market item identifier.
    pub item_id: ItemId,
    /// Token contract address.
    pub contract: &'a ContractAddress,
    /// Token identifier.
    pub id: &'a ContractTokenId,
    /// Listed price, excluding the market fee.
    pub price: Amount,
    /// Previous token owner.
    pub seller: &'a AccountAddress,
    /// New token owner.
    pub buyer: &'a AccountAddress,
}

/// Tagged Custom event to be serialized for the event log.
#[derive(Debug)]
pub enum MarketEvent<'a> {
    /// Item listed for sale
    Offered(OfferedEvent<'a>),
    /// Item sold
    Bought(BoughtEvent<'a>),
}

impl<'a> MarketEvent<'a> {
    pub fn offered(
        item_id: ItemId,
        token: &'a Token,
        price: Amount,
        seller: &'a AccountAddress,
    ) -> Self {
        Self::Offered(OfferedEvent {
            item_id,
            contract: &token.contract,
            id: &token.id,
            price,
            seller,
        })
    }

    pub fn bought(
        item_id: ItemId,
        token: &'a Token,
        price: Amount,
        seller: &'a AccountAddress,
        buyer: &'a AccountAddress,
    ) -> Self {
        Self::Bought(BoughtEvent {
            item_id,
            contract: &token.contract,
            id: &token.id,
            price,
            seller,
            buyer,
        })
    }
}

impl<'a> Serial for MarketEvent<'a> {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            MarketEvent::Offered(event) => {
                out.write_u8(OFFERED_TAG)?;
                event.serial(out)
            }
            MarketEvent::Bought(event) => {
                out.write_u8(BOUGHT_TAG)?;
                event.serial(out)
            }
        }
    }
}
