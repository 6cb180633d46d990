//! Builds the demo program's instructions for a fixed payer and program ID.

use demo_interface::{
    instructions::{
        tagged,
        AddInstructionData,
        EchoInstructionData,
        InstructionTag,
        LamportsInstructionData,
    },
    pack::Pack,
};
use solana_instruction::{
    AccountMeta,
    Instruction,
};
use solana_sdk::pubkey::Pubkey;

use crate::{
    demo_program_id,
    pda::find_jar_address,
};

pub fn system_program_id() -> Pubkey {
    Pubkey::new_from_array(demo_interface::SYSTEM_PROGRAM_ID)
}

#[derive(Clone, Debug)]
pub struct DemoInstructionBuilder {
    pub payer: Pubkey,
    pub program_id: Pubkey,
}

impl DemoInstructionBuilder {
    pub fn new(payer: Pubkey, program_id: Pubkey) -> Self {
        Self { payer, program_id }
    }

    /// A builder targeting the default demo program ID.
    pub fn for_payer(payer: Pubkey) -> Self {
        Self::new(payer, demo_program_id())
    }

    /// The payer's jar account address.
    pub fn jar_address(&self) -> Pubkey {
        find_jar_address(&self.payer, &self.program_id).0
    }

    /// Asks the program to log `message` back.
    pub fn echo(&self, message: &str) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: vec![AccountMeta::new_readonly(self.payer, true)],
            data: EchoInstructionData::new(message).pack_tagged(),
        }
    }

    /// Asks the program to add `a` and `b` and log the sum.
    pub fn add(&self, a: u64, b: u64) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: vec![AccountMeta::new_readonly(self.payer, true)],
            data: tagged(InstructionTag::Add, &AddInstructionData::new(a, b).pack()),
        }
    }

    /// Moves `lamports` from the payer to `to` through the program.
    pub fn transfer(&self, to: &Pubkey, lamports: u64) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(self.payer, true),
                AccountMeta::new(*to, false),
                AccountMeta::new_readonly(system_program_id(), false),
            ],
            data: tagged(
                InstructionTag::Transfer,
                &LamportsInstructionData::new(lamports).pack(),
            ),
        }
    }

    /// Donates `lamports` into the payer's jar, creating the jar on the first donation.
    pub fn donate(&self, lamports: u64) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(self.payer, true),
                AccountMeta::new(self.jar_address(), false),
                AccountMeta::new_readonly(system_program_id(), false),
            ],
            data: tagged(
                InstructionTag::Donate,
                &LamportsInstructionData::new(lamports).pack(),
            ),
        }
    }
}
