//! Helpers for running system program instructions in a local [`Mollusk`] instance, used to check
//! the giveback transfers without a network.

use std::collections::HashMap;

use mollusk_svm::{
    Mollusk,
    MolluskContext,
};
use solana_account::Account;
use solana_sdk::pubkey::Pubkey;

use crate::instruction_builder::system_program_id;

/// Creates and returns a [`MolluskContext`] with the builtin programs and the passed accounts
/// already created.
pub fn new_system_mollusk_context(
    accounts: Vec<(Pubkey, Account)>,
) -> MolluskContext<HashMap<Pubkey, Account>> {
    let mollusk = Mollusk::default();

    // Create mollusk context with the simple hashmap implementation for the AccountStore.
    let context = mollusk.with_context(HashMap::new());

    // Create each account passed in at its respective address using the specified account data.
    for (address, account) in accounts {
        context.account_store.borrow_mut().insert(address, account);
    }

    context
}

/// Create the data necessary to send to [`MolluskContext`] to mock a funded wallet.
pub fn create_mock_user_account(address: Pubkey, lamport_balance: u64) -> (Pubkey, Account) {
    (
        address,
        Account {
            lamports: lamport_balance,
            data: vec![],
            owner: system_program_id(),
            executable: false,
            rent_epoch: 0,
        },
    )
}

/// Reads an account's lamports from the context's account store, zero if it doesn't exist.
pub fn lamports_of(context: &MolluskContext<HashMap<Pubkey, Account>>, address: &Pubkey) -> u64 {
    context
        .account_store
        .borrow()
        .get(address)
        .map_or(0, |account| account.lamports)
}
