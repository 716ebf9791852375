use commons::{total_price, CustomContractError, ItemId, Percentage};
use concordium_cis1::{OnReceivingCis1Params, TokenIdVec};
use concordium_std::*;

use crate::events::*;
use crate::external::*;
use crate::nft;
use crate::state::{MarketItem, State};

/// Initialize the marketplace with an empty item table. The fee account and
/// fee percentage are fixed for the lifetime of the contract instance.
#[init(contract = "Marketplace", parameter = "InitParams")]
fn init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params = InitParams::deserial(&mut ctx.parameter_cursor())?;

    ensure!(
        params.fee_percent <= Percentage::from_percent(100),
        CustomContractError::InvalidFee.into()
    );

    Ok(State::new(
        state_builder,
        params.fee_account,
        params.fee_percent,
    ))
}

/// List an NFT for sale at a fixed price.
///
/// The token is transferred into this contract's custody and stays in escrow
/// until it is bought. The seller must own the token and must have authorized
/// this contract as an operator on the NFT contract, both enforced by the NFT
/// contract during the custody transfer.
///
/// Rejects if:
/// - Sender is a contract address.
/// - The price is zero.
/// - The NFT contract rejects the custody transfer.
#[receive(
    mutable,
    contract = "Marketplace",
    name = "list",
    parameter = "ListParams",
    enable_logger
)]
fn list<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let seller = if let Address::Account(seller) = ctx.sender() {
        seller
    } else {
        bail!(CustomContractError::OnlyAccountAddress.into());
    };
    let params: ListParams = ctx.parameter_cursor().get()?;

    ensure!(
        params.price > Amount::zero(),
        CustomContractError::InvalidPrice.into()
    );

    // Take custody of the token for the duration of the listing
    nft::transfer_to_escrow(host, &params.token, seller, ctx.self_address())?;

    let item_id = host
        .state_mut()
        .list(params.token.clone(), seller, params.price);

    // Log item offered event
    logger.log(&MarketEvent::offered(
        item_id,
        &params.token,
        params.price,
        &seller,
    ))?;

    Ok(())
}

/// Hook invoked by the NFT contract when a token is transferred to this
/// contract. Custody transfers are always initiated by this contract itself
/// during listing, so the hook only acknowledges receipt.
#[receive(
    contract = "Marketplace",
    name = "onReceivingCIS1",
    parameter = "OnReceivingCis1Params<TokenIdVec>"
)]
fn on_receiving_cis1<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    _host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<()> {
    ensure!(
        matches!(ctx.sender(), Address::Contract(_)),
        CustomContractError::ContractOnly.into()
    );
    OnReceivingCis1Params::<TokenIdVec>::deserial(&mut ctx.parameter_cursor())?;

    Ok(())
}

/// Full price of an item: the listing price plus the market fee.
///
/// Rejects if no item with the given ID exists.
#[receive(
    contract = "Marketplace",
    name = "getTotalPrice",
    parameter = "ItemId",
    return_value = "Amount"
)]
fn get_total_price<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Amount> {
    let item_id: ItemId = ctx.parameter_cursor().get()?;
    host.state().total_price(item_id)
}

/// Buy a listed item. The attached amount must cover the listing price plus
/// the market fee; any excess is refunded to the buyer.
///
/// On success the seller receives the listing price, the fee account receives
/// the fee, the token leaves escrow to the buyer and the item is marked sold.
/// The item stays in the table as a sale record.
///
/// Rejects, checked in this order, if:
/// - Sender is a contract address.
/// - No item with the given ID exists.
/// - The attached amount is below the listing price plus the market fee.
/// - The item has already been sold.
#[receive(
    mutable,
    payable,
    contract = "Marketplace",
    name = "buy",
    parameter = "ItemId",
    enable_logger
)]
fn buy<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let buyer = if let Address::Account(buyer) = ctx.sender() {
        buyer
    } else {
        bail!(CustomContractError::OnlyAccountAddress.into());
    };
    let item_id: ItemId = ctx.parameter_cursor().get()?;

    let item = host.state().item(item_id)?;
    let total = total_price(item.price, host.state().fee_percent);

    ensure!(
        amount >= total,
        CustomContractError::InsufficientPayment.into()
    );
    ensure!(!item.sold, CustomContractError::AlreadySold.into());

    host.state_mut().mark_sold(item_id)?;

    // Log item bought event
    logger.log(&MarketEvent::bought(
        item_id,
        &item.token,
        item.price,
        &item.seller,
        &buyer,
    ))?;

    // Pay the listing price to the seller
    host.invoke_transfer(&item.seller, item.price)?;

    // Market fee can be `0` thereby avoiding unnecessary gas fees.
    let fee = total - item.price;
    if fee > Amount::zero() {
        let fee_account = host.state().fee_account;
        host.invoke_transfer(&fee_account, fee)?;
    }

    // Return overpaid funds to the buyer
    let remaining_funds = amount - total;
    if remaining_funds > Amount::zero() {
        host.invoke_transfer(&buyer, remaining_funds)?;
    }

    // Release the token from escrow to the buyer
    nft::transfer_to_buyer(host, &item.token, ctx.self_address(), buyer)?;

    Ok(())
}

/// View function that returns the market item with the given ID. Sold items
/// are retained as sale records and stay viewable.
#[receive(
    contract = "Marketplace",
    name = "view",
    parameter = "ItemId",
    return_value = "MarketItem"
)]
fn view<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<MarketItem> {
    let item_id: ItemId = ctx.parameter_cursor().get()?;
    host.state().item(item_id)
}

/// View function that returns the number of items ever listed.
#[receive(contract = "Marketplace", name = "viewItemCount", return_value = "ItemId")]
fn view_item_count<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<ItemId> {
    Ok(host.state().item_count)
}

/// Function to view values required for internal contract functionality. This includes:
/// - Fee percent. Market fee charged on top of the listing price on every sale.
/// - Fee account. Account address that receives the fee.
///
///  It rejects if:
///  - Fails to parse `ViewInternalValueParams` parameters.
#[receive(
    contract = "Marketplace",
    name = "viewInternalValue",
    parameter = "ViewInternalValueParams",
    return_value = "InternalValue"
)]
fn view_internal_value<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<InternalValue> {
    let state = host.state();
    let params = ViewInternalValueParams::deserial(&mut ctx.parameter_cursor())?;

    let value = match params {
        ViewInternalValueParams::FeeAccount => InternalValue::FeeAccount(state.fee_account),
        ViewInternalValueParams::FeePercent => InternalValue::FeePercent(state.fee_percent),
    };

    Ok(value)
}

#[concordium_cfg_test]
mod tests {
    use commons::test::parse_and_check_mock;
    use commons::Token;
    use concordium_cis1::{Receiver, TransferParams};
    use concordium_std::test_infrastructure::*;

    use super::*;

    const FEE_ACCOUNT: AccountAddress = AccountAddress([0; 32]);
    const SELLER: AccountAddress = AccountAddress([1; 32]);
    const BUYER: AccountAddress = AccountAddress([2; 32]);
    const OTHER: AccountAddress = AccountAddress([3; 32]);

    const NFT_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };

    const MARKETPLACE: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };

    fn token() -> Token {
        Token {
            contract: NFT_CONTRACT,
            id: TokenIdVec([1; 32].into()),
        }
    }

    fn new_host(fee_percent: Percentage) -> TestHost<State<TestStateApi>> {
        let mut ctx = TestInitContext::empty();
        let params = InitParams {
            fee_account: FEE_ACCOUNT,
            fee_percent,
        };
        let bytes = to_bytes(&params);
        ctx.set_init_origin(FEE_ACCOUNT).set_parameter(&bytes);
        let mut state_builder = TestStateBuilder::new();

        let state = init(&ctx, &mut state_builder).expect_report("Failed during init_Marketplace");

        TestHost::new(state, state_builder)
    }

    /// Set up the NFT contract transfer entrypoint, trapping unless a single
    /// token is moved from `from`.
    fn mock_nft_transfer(host: &mut TestHost<State<TestStateApi>>, from: Address) {
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            parse_and_check_mock::<TransferParams<TokenIdVec>, _, _>(
                move |params| params.0.len() == 1 && params.0[0].from == from,
                (),
            ),
        );
    }

    fn list_token(host: &mut TestHost<State<TestStateApi>>, price: Amount) -> ReceiveResult<()> {
        let mut ctx = TestReceiveContext::empty();
        let params = ListParams {
            token: token(),
            price,
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Account(SELLER))
            .set_self_address(MARKETPLACE)
            .set_parameter(&bytes);
        let mut logger = TestLogger::init();

        list(&ctx, host, &mut logger)
    }

    fn buy_item(
        host: &mut TestHost<State<TestStateApi>>,
        buyer: AccountAddress,
        item_id: ItemId,
        amount: Amount,
    ) -> ReceiveResult<()> {
        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&item_id);
        ctx.set_sender(Address::Account(buyer))
            .set_self_address(MARKETPLACE)
            .set_parameter(&bytes);
        let mut logger = TestLogger::init();

        buy(&ctx, host, amount, &mut logger)
    }

    /// Test that initialization stores the fee configuration.
    #[concordium_test]
    fn test_init() {
        let host = new_host(Percentage::from_percent(1));

        claim_eq!(host.state().fee_account, FEE_ACCOUNT);
        claim_eq!(host.state().fee_percent, Percentage::from_percent(1));
        claim_eq!(host.state().item_count, 0, "No items should be initialized");
    }

    #[concordium_test]
    fn test_init_rejects_fee_above_hundred_percent() {
        let mut ctx = TestInitContext::empty();
        let params = InitParams {
            fee_account: FEE_ACCOUNT,
            fee_percent: Percentage::from_percent(101),
        };
        let bytes = to_bytes(&params);
        ctx.set_init_origin(FEE_ACCOUNT).set_parameter(&bytes);
        let mut state_builder = TestStateBuilder::new();

        let result = init(&ctx, &mut state_builder);

        claim_eq!(result.err(), Some(CustomContractError::InvalidFee.into()));
    }

    /// Test that listing stores the new item, takes the token into escrow and
    /// logs the Offered event.
    #[concordium_test]
    fn test_list() {
        let price = Amount::from_ccd(1);
        let mut host = new_host(Percentage::from_percent(1));

        // The custody transfer must move the token from the seller into the
        // marketplace contract
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            parse_and_check_mock::<TransferParams<TokenIdVec>, _, _>(
                |params| {
                    params.0.len() == 1
                        && params.0[0].amount == 1
                        && params.0[0].from == Address::Account(SELLER)
                        && matches!(&params.0[0].to, Receiver::Contract(addr, _) if *addr == MARKETPLACE)
                },
                (),
            ),
        );

        let mut ctx = TestReceiveContext::empty();
        let params = ListParams {
            token: token(),
            price,
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Account(SELLER))
            .set_self_address(MARKETPLACE)
            .set_parameter(&bytes);
        let mut logger = TestLogger::init();

        list(&ctx, &mut host, &mut logger).expect_report("Failed to list token");

        claim_eq!(host.state().item_count, 1);
        let item = host.state().item(1).expect_report("Item 1 must exist");
        claim_eq!(
            item,
            MarketItem {
                item_id: 1,
                token: token(),
                price,
                seller: SELLER,
                sold: false,
            }
        );
        claim!(logger.logs.contains(&to_bytes(&MarketEvent::offered(
            1,
            &item.token,
            price,
            &SELLER,
        ))));
    }

    #[concordium_test]
    fn test_list_rejects_zero_price() {
        let mut host = new_host(Percentage::from_percent(1));
        mock_nft_transfer(&mut host, Address::Account(SELLER));

        let result = list_token(&mut host, Amount::zero());

        claim_eq!(result, Err(CustomContractError::InvalidPrice.into()));
        claim_eq!(host.state().item_count, 0, "No item should be stored");
    }

    #[concordium_test]
    fn test_list_rejects_contract_sender() {
        let mut host = new_host(Percentage::from_percent(1));

        let mut ctx = TestReceiveContext::empty();
        let params = ListParams {
            token: token(),
            price: Amount::from_ccd(1),
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Contract(NFT_CONTRACT))
            .set_self_address(MARKETPLACE)
            .set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = list(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::OnlyAccountAddress.into()));
    }

    /// Test that item IDs are assigned sequentially starting at 1.
    #[concordium_test]
    fn test_list_assigns_sequential_item_ids() {
        let mut host = new_host(Percentage::from_percent(1));
        mock_nft_transfer(&mut host, Address::Account(SELLER));

        list_token(&mut host, Amount::from_ccd(1)).expect_report("Failed to list token");
        list_token(&mut host, Amount::from_ccd(2)).expect_report("Failed to list token");

        claim_eq!(host.state().item_count, 2);
        claim_eq!(
            host.state().item(1).expect_report("Item 1 must exist").item_id,
            1
        );
        let second = host.state().item(2).expect_report("Item 2 must exist");
        claim_eq!(second.item_id, 2);
        claim_eq!(second.price, Amount::from_ccd(2));
    }

    /// Test that the total price is the listing price plus the market fee,
    /// with the fee rounded down.
    #[concordium_test]
    fn test_get_total_price() {
        let mut host = new_host(Percentage::from_percent(1));
        mock_nft_transfer(&mut host, Address::Account(SELLER));
        list_token(&mut host, Amount::from_ccd(2)).expect_report("Failed to list token");

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&1u64);
        ctx.set_parameter(&bytes);

        let total = get_total_price(&ctx, &host).expect_report("Failed to call getTotalPrice");

        claim_eq!(total, Amount::from_micro_ccd(2_020_000));
    }

    #[concordium_test]
    fn test_get_total_price_unknown_item() {
        let mut host = new_host(Percentage::from_percent(1));
        mock_nft_transfer(&mut host, Address::Account(SELLER));
        list_token(&mut host, Amount::from_ccd(1)).expect_report("Failed to list token");

        for item_id in [0u64, 2u64] {
            let mut ctx = TestReceiveContext::empty();
            let bytes = to_bytes(&item_id);
            ctx.set_parameter(&bytes);

            let result = get_total_price(&ctx, &host);

            claim_eq!(result, Err(CustomContractError::ItemNotFound.into()));
        }
    }

    /// Test that buying pays the seller, charges the fee, releases the token
    /// to the buyer, marks the item sold and logs the Bought event.
    #[concordium_test]
    fn test_buy() {
        let price = Amount::from_ccd(2);
        let fee = Amount::from_micro_ccd(20_000);
        let total = price + fee;

        let mut host = new_host(Percentage::from_percent(1));
        mock_nft_transfer(&mut host, Address::Account(SELLER));
        list_token(&mut host, price).expect_report("Failed to list token");

        // Buying must move the escrowed token from the marketplace to the buyer
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            parse_and_check_mock::<TransferParams<TokenIdVec>, _, _>(
                |params| {
                    params.0.len() == 1
                        && params.0[0].from == Address::Contract(MARKETPLACE)
                        && matches!(&params.0[0].to, Receiver::Account(addr) if *addr == BUYER)
                },
                (),
            ),
        );
        host.set_self_balance(total);

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&1u64);
        ctx.set_sender(Address::Account(BUYER))
            .set_self_address(MARKETPLACE)
            .set_parameter(&bytes);
        let mut logger = TestLogger::init();

        buy(&ctx, &mut host, total, &mut logger).expect_report("Failed to buy item");

        claim!(host.transfer_occurred(&SELLER, price));
        claim!(host.transfer_occurred(&FEE_ACCOUNT, fee));
        claim_eq!(host.get_transfers().len(), 2, "No other transfers expected");
        let item = host.state().item(1).expect_report("Item 1 must exist");
        claim!(item.sold, "Item should be marked as sold");
        claim!(logger.logs.contains(&to_bytes(&MarketEvent::bought(
            1,
            &item.token,
            price,
            &SELLER,
            &BUYER,
        ))));
    }

    #[concordium_test]
    fn test_buy_with_zero_fee() {
        let price = Amount::from_ccd(5);

        let mut host = new_host(Percentage::from_percent(0));
        mock_nft_transfer(&mut host, Address::Account(SELLER));
        list_token(&mut host, price).expect_report("Failed to list token");

        mock_nft_transfer(&mut host, Address::Contract(MARKETPLACE));
        host.set_self_balance(price);

        buy_item(&mut host, BUYER, 1, price).expect_report("Failed to buy item");

        claim!(host.transfer_occurred(&SELLER, price));
        claim_eq!(
            host.get_transfers().len(),
            1,
            "Only the seller payout is expected"
        );
    }

    #[concordium_test]
    fn test_buy_refunds_overpayment() {
        let price = Amount::from_ccd(2);
        let total = Amount::from_micro_ccd(2_020_000);
        let paid = Amount::from_ccd(3);

        let mut host = new_host(Percentage::from_percent(1));
        mock_nft_transfer(&mut host, Address::Account(SELLER));
        list_token(&mut host, price).expect_report("Failed to list token");

        mock_nft_transfer(&mut host, Address::Contract(MARKETPLACE));
        host.set_self_balance(paid);

        buy_item(&mut host, BUYER, 1, paid).expect_report("Failed to buy item");

        claim!(host.transfer_occurred(&SELLER, price));
        claim!(host.transfer_occurred(&FEE_ACCOUNT, Amount::from_micro_ccd(20_000)));
        claim!(host.transfer_occurred(&BUYER, paid - total));
    }

    /// Test that underpaying by exactly the market fee is rejected and leaves
    /// the item unsold with no funds moved.
    #[concordium_test]
    fn test_buy_rejects_underpayment() {
        let price = Amount::from_ccd(2);

        let mut host = new_host(Percentage::from_percent(1));
        mock_nft_transfer(&mut host, Address::Account(SELLER));
        list_token(&mut host, price).expect_report("Failed to list token");

        // Covers the price but not the market fee
        let result = buy_item(&mut host, BUYER, 1, price);

        claim_eq!(result, Err(CustomContractError::InsufficientPayment.into()));
        let item = host.state().item(1).expect_report("Item 1 must exist");
        claim!(!item.sold, "Item should stay unsold");
        claim!(host.get_transfers().is_empty(), "No funds should move");
    }

    #[concordium_test]
    fn test_buy_rejects_unknown_item() {
        let total = Amount::from_micro_ccd(2_020_000);

        let mut host = new_host(Percentage::from_percent(1));
        mock_nft_transfer(&mut host, Address::Account(SELLER));
        list_token(&mut host, Amount::from_ccd(2)).expect_report("Failed to list token");

        for item_id in [0u64, 2u64] {
            let result = buy_item(&mut host, BUYER, item_id, total);

            claim_eq!(result, Err(CustomContractError::ItemNotFound.into()));
        }
        claim!(host.get_transfers().is_empty(), "No funds should move");
    }

    /// Test that an item can only be sold once, regardless of the caller or
    /// the attached amount.
    #[concordium_test]
    fn test_buy_rejects_sold_item() {
        let price = Amount::from_ccd(2);
        let total = Amount::from_micro_ccd(2_020_000);

        let mut host = new_host(Percentage::from_percent(1));
        mock_nft_transfer(&mut host, Address::Account(SELLER));
        list_token(&mut host, price).expect_report("Failed to list token");

        mock_nft_transfer(&mut host, Address::Contract(MARKETPLACE));
        host.set_self_balance(total);
        buy_item(&mut host, BUYER, 1, total).expect_report("Failed to buy item");

        host.set_self_balance(total + total);
        let result = buy_item(&mut host, OTHER, 1, total + total);

        claim_eq!(result, Err(CustomContractError::AlreadySold.into()));
        claim_eq!(
            host.get_transfers().len(),
            2,
            "Only the transfers of the first sale are expected"
        );
    }

    #[concordium_test]
    fn test_view_item_count() {
        let mut host = new_host(Percentage::from_percent(1));
        mock_nft_transfer(&mut host, Address::Account(SELLER));

        let ctx = TestReceiveContext::empty();
        let count = view_item_count(&ctx, &host).expect_report("Failed to call viewItemCount");
        claim_eq!(count, 0);

        list_token(&mut host, Amount::from_ccd(1)).expect_report("Failed to list token");

        let count = view_item_count(&ctx, &host).expect_report("Failed to call viewItemCount");
        claim_eq!(count, 1);
    }

    #[concordium_test]
    fn test_view_unknown_item() {
        let host = new_host(Percentage::from_percent(1));

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&1u64);
        ctx.set_parameter(&bytes);

        let result = view(&ctx, &host);

        claim_eq!(result, Err(CustomContractError::ItemNotFound.into()));
    }

    #[concordium_test]
    fn test_view_internal_value() {
        let host = new_host(Percentage::from_percent(1));

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&ViewInternalValueParams::FeeAccount);
        ctx.set_parameter(&bytes);
        let result =
            view_internal_value(&ctx, &host).expect_report("Failed to call viewInternalValue");
        claim_eq!(result, InternalValue::FeeAccount(FEE_ACCOUNT));

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&ViewInternalValueParams::FeePercent);
        ctx.set_parameter(&bytes);
        let result =
            view_internal_value(&ctx, &host).expect_report("Failed to call viewInternalValue");
        claim_eq!(result, InternalValue::FeePercent(Percentage::from_percent(1)));
    }

    #[concordium_test]
    fn test_on_receiving_cis1_rejects_account_sender() {
        let host = new_host(Percentage::from_percent(1));

        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(SELLER));

        let result = on_receiving_cis1(&ctx, &host);

        claim_eq!(result, Err(CustomContractError::ContractOnly.into()));
    }
}
