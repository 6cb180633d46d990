use solana_instruction::Instruction;
use solana_sdk::signature::{
    Keypair,
    Signature,
};

use crate::transactions::CustomRpcClient;

/// A utility wrapper newtype for instructions that only need a single signer. This facilitates
/// simple construction and submission of single signer transactions with one instruction.
#[derive(Debug)]
pub struct SingleSignerInstruction(Instruction);

impl TryFrom<Instruction> for SingleSignerInstruction {
    type Error = anyhow::Error;

    fn try_from(instruction: Instruction) -> Result<Self, Self::Error> {
        let num_signers = instruction
            .accounts
            .iter()
            .filter(|meta| meta.is_signer)
            .count();
        if num_signers != 1 {
            return Err(anyhow::anyhow!(
                "Expected exactly one signer, found {num_signers}."
            ));
        };
        Ok(Self(instruction))
    }
}

impl From<SingleSignerInstruction> for Instruction {
    fn from(instruction: SingleSignerInstruction) -> Self {
        instruction.0
    }
}

impl SingleSignerInstruction {
    pub async fn send_single_signer(
        self,
        rpc: &CustomRpcClient,
        signer: &Keypair,
    ) -> anyhow::Result<Signature> {
        rpc.send_single_signer(signer, [self.0]).await
    }
}
