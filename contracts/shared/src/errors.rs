use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotInit = 1,
    AlreadyInit = 2,
    Unauthorized = 3,
    InvInput = 4,
    Overflow = 5,

    // Shares market: input validation
    InvalidRange = 10,
    InvalidDeclineRatio = 11,
    Address0 = 12,
    InvalidParams = 13,

    // Shares market: state preconditions
    ShareCreated = 20,
    ShareNotExists = 21,
    InsufficientShares = 22,
    CannotSellLastShare = 23,
    NoRewards = 24,

    // Shares market: economic bounds
    InAmountNotEnough = 30,
    OutAmountNotEnough = 31,
    InsufficientEth = 32,

    // Shares market: external calls
    UnableSendDevFund = 40,

    // Vesting lock
    InvalidTime = 50,
    NoVestedAmount = 51,
    TransferAmountGt0 = 52,
    TransferAccExists = 53,
    Ended = 54,

    // Airdrop
    InvalidProof = 60,
    NotShareHolder = 61,
    NotCreator = 62,
    ClaimEnded = 63,
    MaxClaimsReached = 64,
    OnlyClaimOnceAllowed = 65,
    ClaimNotEnded = 66,
    InsufficientUnclaimed = 67,
}
