use commons::{total_price, CustomContractError, ItemId, Percentage, Token};
use concordium_std::*;

/// A single market listing. Items are never removed: once sold, an item stays
/// in the table as an immutable sale record.
#[derive(Debug, Serialize, SchemaType, Clone, PartialEq, Eq)]
pub struct MarketItem {
    /// Sequential identifier, assigned on listing.
    pub item_id: ItemId,
    /// The escrowed NFT.
    pub token: Token,
    /// Listing price. Always greater than zero.
    pub price: Amount,
    /// Account that listed the item and receives the price on sale.
    pub seller: AccountAddress,
    /// Whether the item has been sold. Flips to true exactly once.
    pub sold: bool,
}

/// The contract state.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Account receiving the market fee. Immutable after init.
    pub fee_account: AccountAddress,
    /// Market fee percentage. Immutable after init.
    pub fee_percent: Percentage,
    /// Number of items ever listed. Item IDs run from 1 to this count.
    pub item_count: ItemId,
    pub items: StateMap<ItemId, MarketItem, S>,
}

// Functions for creating and updating the contract state.
impl<S: HasStateApi> State<S> {
    /// Creates a new state with no items.
    pub fn new(
        state_builder: &mut StateBuilder<S>,
        fee_account: AccountAddress,
        fee_percent: Percentage,
    ) -> Self {
        State {
            fee_account,
            fee_percent,
            item_count: 0,
            items: state_builder.new_map(),
        }
    }

    /// Store a new listing under the next sequential item ID and return the
    /// assigned ID.
    pub fn list(&mut self, token: Token, seller: AccountAddress, price: Amount) -> ItemId {
        self.item_count += 1;
        let item_id = self.item_count;
        self.items.insert(
            item_id,
            MarketItem {
                item_id,
                token,
                price,
                seller,
                sold: false,
            },
        );
        item_id
    }

    /// Look up an item, failing with ItemNotFound for IDs that were never
    /// assigned.
    pub fn item(&self, item_id: ItemId) -> ReceiveResult<MarketItem> {
        self.items
            .get(&item_id)
            .map(|item| item.clone())
            .ok_or_else(|| CustomContractError::ItemNotFound.into())
    }

    /// Full price of an item: listing price plus the market fee.
    pub fn total_price(&self, item_id: ItemId) -> ReceiveResult<Amount> {
        let item = self.item(item_id)?;
        Ok(total_price(item.price, self.fee_percent))
    }

    /// Mark an item as sold. The flag never flips back.
    pub fn mark_sold(&mut self, item_id: ItemId) -> ReceiveResult<()> {
        let mut item = self
            .items
            .get_mut(&item_id)
            .ok_or(CustomContractError::ItemNotFound)?;
        item.sold = true;
        Ok(())
    }
}
