use async_trait::async_trait;
use everlend_strategies::{
    governance::{
        get_proposal_address, serialize_instruction_to_base64, ProposalCreator, ProposalRequest,
    },
    StrategyResult,
};
use log::info;
use solana_program::{instruction::Instruction, pubkey::Pubkey};

/// Prints the proposal instead of sending it
pub struct DryRunProposalCreator {
    pub governance_program: Pubkey,
}

#[async_trait]
impl ProposalCreator for DryRunProposalCreator {
    async fn create_proposal(&self, request: ProposalRequest) -> StrategyResult<Pubkey> {
        let proposal = get_proposal_address(
            &self.governance_program,
            &request.governance,
            &request.governing_token_mint,
            request.proposal_index,
        );
        info!("Dry run, proposal {} is not sent", proposal);

        println!("Proposal: {}", proposal);
        println!("Title: {}", request.title);
        println!("Realm: {}", request.realm);
        println!("Governance: {}", request.governance);
        println!("Token owner record: {}", request.token_owner_record);
        println!("Draft: {}", request.is_draft);
        for (i, ix) in request.instructions.iter().enumerate() {
            let instruction = Instruction::from(ix.data.clone());
            println!(
                "#{} program {} hold up {}s{}",
                i,
                instruction.program_id,
                ix.hold_up_time,
                if ix.chunk_split_by_default {
                    " (chunk split)"
                } else {
                    ""
                }
            );
            println!("{}", serialize_instruction_to_base64(&instruction)?);
        }

        Ok(proposal)
    }
}
