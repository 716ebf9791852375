use super::*;

/// Full price a buyer has to pay for a listed item: the listing price plus
/// the market fee. The fee rounds down to whole micro CCD.
pub fn total_price(price: Amount, platform_fee: Percentage) -> Amount {
    price + platform_fee * price
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    #[concordium_test]
    fn test_total_price() {
        claim_eq!(
            total_price(Amount::from_ccd(2), Percentage::from_percent(1)),
            Amount::from_micro_ccd(2_020_000)
        );
        claim_eq!(
            total_price(Amount::from_ccd(100), Percentage::from_percent(0)),
            Amount::from_ccd(100)
        );
    }

    #[concordium_test]
    fn test_total_price_rounds_fee_down() {
        claim_eq!(
            total_price(Amount::from_micro_ccd(99), Percentage::from_percent(50)),
            Amount::from_micro_ccd(99 + 49)
        );
        claim_eq!(
            total_price(Amount::from_micro_ccd(1), Percentage::from_percent(1)),
            Amount::from_micro_ccd(1)
        );
    }
}
