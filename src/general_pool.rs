//! General pool program id and account derivations

use solana_program::pubkey::Pubkey;

solana_program::declare_id!("GenUMNGcWca1GiPLfg89698Gfys1dzk9BAGsyb9aEujU");

/// Generates pool market authority & bump seed
pub fn find_program_address(program_id: &Pubkey, pool_market: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[&pool_market.to_bytes()[..32]], program_id)
}

/// Generates withdrawal requests queue address for a token
pub fn find_withdrawal_requests_program_address(
    program_id: &Pubkey,
    pool_market: &Pubkey,
    token_mint: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            br"withdrawals",
            &pool_market.to_bytes()[..32],
            &token_mint.to_bytes()[..32],
        ],
        program_id,
    )
}

/// Generates a single owner's withdrawal request address
pub fn find_withdrawal_request_program_address(
    program_id: &Pubkey,
    withdrawal_requests: &Pubkey,
    owner: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            br"withdrawal",
            &withdrawal_requests.to_bytes()[..32],
            &owner.to_bytes()[..32],
        ],
        program_id,
    )
}

/// Generates transit account holding collateral until a withdrawal is processed
pub fn find_transit_program_address(
    program_id: &Pubkey,
    pool_market: &Pubkey,
    mint: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            br"transit",
            &pool_market.to_bytes()[..32],
            &mint.to_bytes()[..32],
        ],
        program_id,
    )
}
