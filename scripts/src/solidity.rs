//! Definitions of Solidity functions called on deployed spells

use alloy::sol;

sol! {
    /// The deployed spell, which delegates its actions to a separate contract
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract DssSpell {
        function action() external view returns (address);
    }
}
