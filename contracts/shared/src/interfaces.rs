use crate::types::Subject;
use soroban_sdk::{contractclient, Address, Env};

/// Read-only view of the shares market that gated contracts depend on.
#[contractclient(name = "ShareRegistryClient")]
pub trait ShareRegistry {
    /// Units of `subject` held by `holder`, 0 when absent.
    fn shares_balance(env: Env, subject: Subject, holder: Address) -> u64;

    /// Creator of `subject`, if the subject exists.
    fn subject_creator(env: Env, subject: Subject) -> Option<Address>;
}
