//! Keccak-256 Merkle proofs with sorted-pair hashing.
//!
//! A leaf commits to `xdr(claimant) ‖ amount` with the amount as 16 big-endian
//! bytes. Siblings are ordered before hashing, so proofs carry no
//! left/right flags.

use shared::types::{Amount, Hash};
use soroban_sdk::{xdr::ToXdr, Address, Bytes, BytesN, Env, Vec};

fn keccak(env: &Env, data: &Bytes) -> Hash {
    BytesN::from_array(env, &env.crypto().keccak256(data).to_array())
}

pub fn leaf_hash(env: &Env, claimant: &Address, amount: Amount) -> Hash {
    let mut data = claimant.clone().to_xdr(env);
    data.extend_from_array(&amount.to_be_bytes());
    keccak(env, &data)
}

pub fn hash_pair(env: &Env, a: &Hash, b: &Hash) -> Hash {
    let (a, b) = (a.to_array(), b.to_array());
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

    let mut data = Bytes::from_array(env, &lo);
    data.extend_from_array(&hi);
    keccak(env, &data)
}

/// Folds `proof` onto `leaf` and compares the result with `root`.
pub fn verify(env: &Env, proof: &Vec<Hash>, root: &Hash, leaf: Hash) -> bool {
    let computed = proof
        .iter()
        .fold(leaf, |node, sibling| hash_pair(env, &node, &sibling));
    computed == *root
}
