use commons::{CustomContractError, Token};
use concordium_cis1::{AdditionalData, Receiver, Transfer};
use concordium_std::*;

/// Receive name of the hook invoked on this contract when it is the recipient
/// of a CIS-1 transfer.
pub const ON_RECEIVING_CIS1_NAME: &str = "Marketplace.onReceivingCIS1";

/// Move the token from the seller into this contract's custody. The NFT
/// contract rejects the transfer unless the seller owns the token and has
/// authorized this contract as an operator.
pub fn transfer_to_escrow<T>(
    host: &mut impl HasHost<T>,
    token: &Token,
    seller: AccountAddress,
    custodian: ContractAddress,
) -> ReceiveResult<()> {
    transfer(
        host,
        token,
        Address::Account(seller),
        Receiver::Contract(
            custodian,
            OwnedReceiveName::new_unchecked(ON_RECEIVING_CIS1_NAME.into()),
        ),
    )
}

/// Release the escrowed token from this contract's custody to the buyer.
pub fn transfer_to_buyer<T>(
    host: &mut impl HasHost<T>,
    token: &Token,
    custodian: ContractAddress,
    buyer: AccountAddress,
) -> ReceiveResult<()> {
    transfer(
        host,
        token,
        Address::Contract(custodian),
        Receiver::Account(buyer),
    )
}

fn transfer<T>(
    host: &mut impl HasHost<T>,
    token: &Token,
    from: Address,
    to: Receiver,
) -> ReceiveResult<()> {
    host.invoke_contract(
        &token.contract,
        &(
            1u16,
            Transfer {
                token_id: token.id.clone(),
                amount: 1,
                from,
                to,
                data: AdditionalData::empty(),
            },
        ),
        EntrypointName::new_unchecked("transfer"),
        Amount::zero(),
    )
    .map_err(handle_call_error)?;

    Ok(())
}

fn handle_call_error<R>(error: CallContractError<R>) -> Reject {
    match error {
        CallContractError::MissingEntrypoint | CallContractError::MessageFailed => {
            CustomContractError::Incompatible.into()
        }
        CallContractError::LogicReject { .. } => CustomContractError::InvokeContractError.into(),
        e => e.into(),
    }
}

#[concordium_cfg_test]
mod tests {
    use commons::test::parse_and_check_mock;
    use concordium_cis1::{TokenIdVec, TransferParams};
    use concordium_std::test_infrastructure::*;

    use super::*;

    const NFT_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };

    const MARKETPLACE: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };

    const SELLER: AccountAddress = AccountAddress([1; 32]);
    const BUYER: AccountAddress = AccountAddress([2; 32]);

    fn token() -> Token {
        Token {
            contract: NFT_CONTRACT,
            id: TokenIdVec([1; 32].into()),
        }
    }

    #[concordium_test]
    fn test_transfer_to_escrow() {
        let state = ();
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new(state, state_builder);

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

        let response = transfer_to_escrow(&mut host, &token(), SELLER, MARKETPLACE);

        claim_eq!(response, Ok(()))
    }

    #[concordium_test]
    fn test_transfer_to_buyer() {
        let state = ();
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new(state, state_builder);

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

        let response = transfer_to_buyer(&mut host, &token(), MARKETPLACE, BUYER);

        claim_eq!(response, Ok(()))
    }
}
