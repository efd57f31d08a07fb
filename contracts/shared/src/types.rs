use soroban_sdk::BytesN;

/// Token amount in base units.
pub type Amount = i128;

/// 32-byte digest.
pub type Hash = BytesN<32>;

/// Identifier of a shares market (e.g. a topic hash).
pub type Subject = BytesN<32>;
