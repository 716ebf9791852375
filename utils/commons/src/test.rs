//! Reusable mock entrypoints for contract tests.
use concordium_std::test_infrastructure::MockFn;
use concordium_std::*;

/// Mock entrypoint that parses its parameter as `D`, traps unless `check`
/// accepts the parsed value, and returns `return_value` otherwise.
pub fn parse_and_check_mock<D: Deserial, R: Clone + Serial + 'static, S>(
    check: impl Fn(&D) -> bool + 'static,
    return_value: R,
) -> MockFn<S> {
    MockFn::new_v1(move |parameter, _amount, _balance, _state| {
        let value =
            D::deserial(&mut Cursor::new(parameter.as_ref())).map_err(|_| CallContractError::Trap)?;
        if !check(&value) {
            return Err(CallContractError::Trap);
        }
        Ok((false, return_value.clone()))
    })
}
