#![cfg(test)]

use crate::{FeeBreakdown, SharesMarket, SharesMarketClient};
use shared::{
    constants::{UNIT, ZERO_ACCOUNT},
    errors::Error,
};
use soroban_sdk::{
    testutils::{Address as _, MockAuth, MockAuthInvoke},
    token::{StellarAssetClient, TokenClient},
    Address, BytesN, Env, IntoVal, String, Vec,
};

const RATIO: u64 = 16_000;
const PERCENT: i128 = UNIT / 100;

struct Setup<'a> {
    env: Env,
    market: SharesMarketClient<'a>,
    owner: Address,
    token: TokenClient<'a>,
    token_admin: StellarAssetClient<'a>,
    native: TokenClient<'a>,
    native_admin: StellarAssetClient<'a>,
    creator: Address,
    subject: BytesN<32>,
}

impl<'a> Setup<'a> {
    /// Market with zero fees and one subject opened by `creator`
    fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();

        let owner = Address::generate(&env);
        let issuer = Address::generate(&env);
        let token_id = env.register_stellar_asset_contract(issuer.clone());
        let native_id = env.register_stellar_asset_contract(issuer);

        let market = SharesMarketClient::new(&env, &env.register_contract(None, SharesMarket));
        market.initialize(&owner, &token_id, &native_id);

        let creator = Address::generate(&env);
        let subject = BytesN::from_array(&env, &[7u8; 32]);
        market.create_shares(&creator, &subject, &RATIO, &0);

        Setup {
            market,
            owner,
            token: TokenClient::new(&env, &token_id),
            token_admin: StellarAssetClient::new(&env, &token_id),
            native: TokenClient::new(&env, &native_id),
            native_admin: StellarAssetClient::new(&env, &native_id),
            creator,
            subject,
            env,
        }
    }

    fn funded_trader(&self) -> Address {
        let trader = Address::generate(&self.env);
        self.token_admin.mint(&trader, &UNIT);
        trader
    }

    fn set_fees(&self, protocol: i128, creator: i128, holder: i128, lp: i128) {
        self.market.set_protocol_fee_percent(&self.owner, &protocol);
        self.market.set_creator_fee_percent(&self.owner, &creator);
        self.market.set_holder_fee_percent(&self.owner, &holder);
        self.market.set_lp_farming_fee_percent(&self.owner, &lp);
    }
}

fn unit_price(supply: i128) -> i128 {
    supply * supply * UNIT / RATIO as i128
}

#[test]
fn test_initialize() {
    let s = Setup::new();

    assert_eq!(s.market.owner(), s.owner);
    assert_eq!(s.market.token(), s.token.address);
    assert_eq!(s.market.native_token(), s.native.address);

    let config = s.market.fee_config();
    assert_eq!(config.protocol_fee_percent, 0);
    assert_eq!(config.protocol_fee_destination, s.owner);
    assert_eq!(config.dev_fund_destination, s.owner);
    assert_eq!(config.lp_farming_address, s.owner);
}

#[test]
fn test_initialize_twice() {
    let s = Setup::new();
    let result = s
        .market
        .try_initialize(&s.owner, &s.token.address, &s.native.address);
    assert_eq!(result, Err(Ok(Error::AlreadyInit)));
}

#[test]
fn test_create_shares() {
    let s = Setup::new();

    assert_eq!(s.market.shares_supply(&s.subject), 1);
    assert_eq!(s.market.shares_balance(&s.subject, &s.creator), 1);
    assert_eq!(s.market.subject_creator(&s.subject), Some(s.creator.clone()));

    let info = s.market.get_subject(&s.subject);
    assert_eq!(info.decline_ratio, RATIO);
    assert_eq!(info.supply, 1);
}

#[test]
fn test_create_shares_twice() {
    let s = Setup::new();
    let other = Address::generate(&s.env);
    let result = s.market.try_create_shares(&other, &s.subject, &RATIO, &0);
    assert_eq!(result, Err(Ok(Error::ShareCreated)));
}

#[test]
fn test_create_shares_invalid_ratio() {
    let s = Setup::new();
    let subject = BytesN::from_array(&s.env, &[8u8; 32]);

    assert_eq!(
        s.market.try_create_shares(&s.creator, &subject, &0, &0),
        Err(Ok(Error::InvalidDeclineRatio))
    );
    assert_eq!(
        s.market.try_create_shares(&s.creator, &subject, &3, &0),
        Err(Ok(Error::InvalidDeclineRatio))
    );
    assert_eq!(s.market.shares_supply(&subject), 0);
}

#[test]
fn test_create_shares_charges_eth_fee() {
    let s = Setup::new();
    let dev_fund = Address::generate(&s.env);
    s.market.set_dev_fund_destination(&s.owner, &dev_fund);
    s.market.set_create_shares_eth_fee(&s.owner, &500);

    let creator = Address::generate(&s.env);
    s.native_admin.mint(&creator, &1_000);
    let subject = BytesN::from_array(&s.env, &[9u8; 32]);

    assert_eq!(
        s.market.try_create_shares(&creator, &subject, &RATIO, &499),
        Err(Ok(Error::InsufficientEth))
    );

    let record = s.market.create_shares(&creator, &subject, &RATIO, &1_000);
    assert_eq!(record.price, 0);
    assert_eq!(record.supply, 1);
    assert_eq!(s.native.balance(&dev_fund), 500);
    assert_eq!(s.native.balance(&creator), 500);
}

#[test]
fn test_create_shares_dev_fund_is_market() {
    let s = Setup::new();
    s.market
        .set_dev_fund_destination(&s.owner, &s.market.address);
    s.market.set_create_shares_eth_fee(&s.owner, &500);

    let creator = Address::generate(&s.env);
    s.native_admin.mint(&creator, &1_000);
    let subject = BytesN::from_array(&s.env, &[9u8; 32]);

    assert_eq!(
        s.market.try_create_shares(&creator, &subject, &RATIO, &1_000),
        Err(Ok(Error::UnableSendDevFund))
    );
    assert_eq!(s.market.subject_creator(&subject), None);
    assert_eq!(s.native.balance(&creator), 1_000);
}

#[test]
fn test_create_shares_unfunded_creator_rolls_back() {
    let s = Setup::new();
    s.market.set_create_shares_eth_fee(&s.owner, &500);

    let creator = Address::generate(&s.env);
    let subject = BytesN::from_array(&s.env, &[9u8; 32]);

    let result = s.market.try_create_shares(&creator, &subject, &RATIO, &500);
    assert!(result.is_err());
    assert_eq!(s.market.shares_supply(&subject), 0);
}

#[test]
fn test_price_queries() {
    let s = Setup::new();

    assert_eq!(s.market.get_price(&0, &1, &RATIO), 0);
    assert_eq!(s.market.get_price(&1, &1, &RATIO), unit_price(1));
    assert_eq!(
        s.market.get_price(&2, &3, &RATIO),
        unit_price(2) + unit_price(3) + unit_price(4)
    );
    assert_eq!(s.market.try_get_price(&1, &0, &RATIO), Err(Ok(Error::InvalidRange)));
    assert_eq!(s.market.try_get_price(&0, &2, &RATIO), Err(Ok(Error::InvalidRange)));

    assert_eq!(s.market.get_buy_price(&s.subject, &1), unit_price(1));
    // the last unit prices at zero even though it can never be sold
    assert_eq!(s.market.get_sell_price(&s.subject, &1), 0);
    assert_eq!(
        s.market.try_get_sell_price(&s.subject, &2),
        Err(Ok(Error::InvalidRange))
    );

    let unknown = BytesN::from_array(&s.env, &[1u8; 32]);
    assert_eq!(
        s.market.try_get_buy_price(&unknown, &1),
        Err(Ok(Error::ShareNotExists))
    );
}

#[test]
fn test_buy_first_unit() {
    let s = Setup::new();
    let buyer = s.funded_trader();

    let record = s
        .market
        .buy_shares(&buyer, &buyer, &s.subject, &1, &UNIT);

    assert_eq!(record.price, UNIT / RATIO as i128);
    assert_eq!(record.supply, 2);
    assert!(record.is_buy);
    assert_eq!(s.market.shares_supply(&s.subject), 2);
    assert_eq!(s.market.shares_balance(&s.subject, &buyer), 1);
    assert_eq!(s.token.balance(&buyer), UNIT - record.price);
    assert_eq!(s.token.balance(&s.market.address), record.price);
}

#[test]
fn test_buy_and_sell_distribute_fees() {
    let s = Setup::new();
    let protocol_dest = Address::generate(&s.env);
    let lp = Address::generate(&s.env);
    s.market.set_protocol_fee_destination(&s.owner, &protocol_dest);
    s.market.set_lp_farming_address(&s.owner, &lp);
    s.set_fees(5 * PERCENT, 5 * PERCENT, 10 * PERCENT, 2 * PERCENT);

    let price = unit_price(1);
    let expected = FeeBreakdown {
        protocol_fee: price * 5 / 100,
        creator_fee: price * 5 / 100,
        holder_fee: price * 10 / 100,
        lp_farming_fee: price * 2 / 100,
    };
    assert_eq!(s.market.compute_fees(&price), expected);
    let all_fees = price * 22 / 100;
    assert_eq!(s.market.get_buy_price_with_fees(&s.subject, &1), price + all_fees);

    let buyer = s.funded_trader();
    let record = s
        .market
        .buy_shares(&buyer, &buyer, &s.subject, &1, &(price + all_fees));
    assert_eq!(record.protocol_fee, expected.protocol_fee);
    assert_eq!(record.holder_fee, expected.holder_fee);

    assert_eq!(s.token.balance(&buyer), UNIT - price - all_fees);
    assert_eq!(s.token.balance(&protocol_dest), expected.protocol_fee);
    assert_eq!(s.token.balance(&s.creator), expected.creator_fee);
    assert_eq!(s.token.balance(&lp), expected.lp_farming_fee);
    assert_eq!(
        s.token.balance(&s.market.address),
        price + expected.holder_fee
    );

    // sell the same unit back to a third party
    let payee = Address::generate(&s.env);
    assert_eq!(s.market.get_sell_price_with_fees(&s.subject, &1), price - all_fees);
    let record = s
        .market
        .sell_shares(&buyer, &payee, &s.subject, &1, &(price - all_fees));
    assert!(!record.is_buy);
    assert_eq!(record.recipient, payee);
    assert_eq!(record.supply, 1);

    assert_eq!(s.token.balance(&payee), price - all_fees);
    assert_eq!(s.token.balance(&protocol_dest), 2 * expected.protocol_fee);
    assert_eq!(s.token.balance(&s.creator), 2 * expected.creator_fee);
    assert_eq!(s.token.balance(&lp), 2 * expected.lp_farming_fee);
    // only the two holder fees remain, all owed as rewards
    assert_eq!(s.token.balance(&s.market.address), 2 * expected.holder_fee);

    let creator_reward = s.market.get_reward(&s.subject, &s.creator);
    let seller_reward = s.market.get_reward(&s.subject, &buyer);
    assert_eq!(creator_reward, expected.holder_fee + expected.holder_fee / 2);
    assert_eq!(seller_reward, expected.holder_fee / 2);
    assert_eq!(creator_reward + seller_reward, 2 * expected.holder_fee);
}

#[test]
fn test_holder_fee_split_among_prior_holders() {
    let s = Setup::new();
    s.set_fees(0, 0, 10 * PERCENT, 0);

    let first = s.funded_trader();
    let second = s.funded_trader();
    s.market.buy_shares(&first, &first, &s.subject, &1, &UNIT);
    s.market.buy_shares(&second, &second, &s.subject, &1, &UNIT);

    // first buy: fee of 1² units, all to the creator (supply 1)
    // second buy: fee of 2² units, split between creator and first buyer
    let first_fee = unit_price(1) / 10;
    let second_fee = unit_price(2) / 10;

    assert_eq!(
        s.market.get_reward(&s.subject, &s.creator),
        first_fee + second_fee / 2
    );
    assert_eq!(s.market.get_reward(&s.subject, &first), second_fee / 2);
    assert_eq!(s.market.get_reward(&s.subject, &second), 0);
}

#[test]
fn test_cannot_sell_last_share() {
    let s = Setup::new();

    let result = s
        .market
        .try_sell_shares(&s.creator, &s.creator, &s.subject, &1, &0);
    assert_eq!(result, Err(Ok(Error::CannotSellLastShare)));
    assert_eq!(s.market.shares_supply(&s.subject), 1);
    assert_eq!(s.market.shares_balance(&s.subject, &s.creator), 1);
}

#[test]
fn test_sell_more_than_held() {
    let s = Setup::new();
    let buyer = s.funded_trader();
    s.market.buy_shares(&buyer, &buyer, &s.subject, &2, &UNIT);

    let outsider = Address::generate(&s.env);
    assert_eq!(
        s.market
            .try_sell_shares(&outsider, &outsider, &s.subject, &1, &0),
        Err(Ok(Error::InsufficientShares))
    );
    assert_eq!(
        s.market.try_sell_shares(&buyer, &buyer, &s.subject, &3, &0),
        Err(Ok(Error::CannotSellLastShare))
    );
}

#[test]
fn test_slippage_bounds() {
    let s = Setup::new();
    s.set_fees(5 * PERCENT, 0, 0, 0);
    let buyer = s.funded_trader();

    let cost = s.market.get_buy_price_with_fees(&s.subject, &1);
    assert_eq!(
        s.market
            .try_buy_shares(&buyer, &buyer, &s.subject, &1, &(cost - 1)),
        Err(Ok(Error::InAmountNotEnough))
    );
    s.market.buy_shares(&buyer, &buyer, &s.subject, &1, &cost);

    let proceeds = s.market.get_sell_price_with_fees(&s.subject, &1);
    assert_eq!(
        s.market
            .try_sell_shares(&buyer, &buyer, &s.subject, &1, &(proceeds + 1)),
        Err(Ok(Error::OutAmountNotEnough))
    );
    assert_eq!(s.market.shares_balance(&s.subject, &buyer), 1);
}

#[test]
fn test_zero_account_recipient() {
    let s = Setup::new();
    let buyer = s.funded_trader();
    let zero = Address::from_string(&String::from_str(&s.env, ZERO_ACCOUNT));

    assert_eq!(
        s.market.try_buy_shares(&buyer, &zero, &s.subject, &1, &UNIT),
        Err(Ok(Error::Address0))
    );
    assert_eq!(
        s.market
            .try_sell_shares(&s.creator, &zero, &s.subject, &0, &0),
        Err(Ok(Error::Address0))
    );
}

#[test]
fn test_trade_unknown_subject() {
    let s = Setup::new();
    let buyer = s.funded_trader();
    let unknown = BytesN::from_array(&s.env, &[1u8; 32]);

    assert_eq!(
        s.market.try_buy_shares(&buyer, &buyer, &unknown, &1, &UNIT),
        Err(Ok(Error::ShareNotExists))
    );
}

#[test]
fn test_zero_amount_trade() {
    let s = Setup::new();
    s.set_fees(5 * PERCENT, 5 * PERCENT, 5 * PERCENT, 5 * PERCENT);
    let buyer = s.funded_trader();

    let record = s.market.buy_shares(&buyer, &buyer, &s.subject, &0, &0);
    assert_eq!(record.price, 0);
    assert_eq!(record.holder_fee, 0);
    assert_eq!(s.market.shares_supply(&s.subject), 1);
    assert_eq!(s.token.balance(&buyer), UNIT);

    let record = s.market.sell_shares(&buyer, &buyer, &s.subject, &0, &0);
    assert_eq!(record.price, 0);
    assert_eq!(s.market.shares_supply(&s.subject), 1);
}

#[test]
fn test_unfunded_buyer_rolls_back() {
    let s = Setup::new();
    let buyer = Address::generate(&s.env);

    let result = s.market.try_buy_shares(&buyer, &buyer, &s.subject, &1, &UNIT);
    assert!(result.is_err());
    assert_eq!(s.market.shares_supply(&s.subject), 1);
    assert_eq!(s.market.shares_balance(&s.subject, &buyer), 0);
}

#[test]
fn test_buy_requires_buyer_auth() {
    let s = Setup::new();
    let buyer = s.funded_trader();

    // authorize a sell only
    let result = s
        .market
        .mock_auths(&[MockAuth {
            address: &buyer,
            invoke: &MockAuthInvoke {
                contract: &s.market.address,
                fn_name: "sell_shares",
                args: (buyer.clone(), buyer.clone(), s.subject.clone(), 1u64, UNIT).into_val(&s.env),
                sub_invokes: &[],
            },
        }])
        .try_buy_shares(&buyer, &buyer, &s.subject, &1, &UNIT);

    // an auth failure is a host error, not a contract error
    assert!(matches!(result, Err(Err(_))));
    assert_eq!(s.market.shares_supply(&s.subject), 1);
    assert_eq!(s.market.shares_balance(&s.subject, &buyer), 0);
    assert_eq!(s.token.balance(&buyer), UNIT);
}

#[test]
fn test_balances_sum_to_supply() {
    let s = Setup::new();
    s.set_fees(0, 0, 10 * PERCENT, 0);
    let alice = s.funded_trader();
    let bob = s.funded_trader();

    s.market.buy_shares(&alice, &alice, &s.subject, &3, &UNIT);
    s.market.buy_shares(&bob, &bob, &s.subject, &2, &UNIT);
    s.market.sell_shares(&alice, &alice, &s.subject, &1, &0);
    s.market.buy_shares(&alice, &bob, &s.subject, &1, &UNIT);

    let total = s.market.shares_balance(&s.subject, &s.creator)
        + s.market.shares_balance(&s.subject, &alice)
        + s.market.shares_balance(&s.subject, &bob);
    assert_eq!(s.market.shares_balance(&s.subject, &alice), 2);
    assert_eq!(s.market.shares_balance(&s.subject, &bob), 3);
    assert_eq!(total, s.market.shares_supply(&s.subject));
}

#[test]
fn test_accumulator_never_decreases() {
    let s = Setup::new();
    s.set_fees(0, 0, 10 * PERCENT, 0);
    let trader = s.funded_trader();

    let mut last = s.market.reward_per_share_stored(&s.subject);
    for _ in 0..3 {
        s.market.buy_shares(&trader, &trader, &s.subject, &2, &UNIT);
        let now = s.market.reward_per_share_stored(&s.subject);
        assert!(now > last);
        last = now;
    }
    s.market.sell_shares(&trader, &trader, &s.subject, &1, &0);
    assert!(s.market.reward_per_share_stored(&s.subject) > last);
}

#[test]
fn test_new_units_do_not_earn_own_fee() {
    let s = Setup::new();
    s.set_fees(0, 0, 10 * PERCENT, 0);
    let buyer = s.funded_trader();

    s.market.buy_shares(&buyer, &buyer, &s.subject, &5, &UNIT);
    assert_eq!(s.market.get_reward(&s.subject, &buyer), 0);

    let position = s.market.holder_position(&s.subject, &buyer);
    assert_eq!(position.balance, 5);
    assert_eq!(
        position.reward_per_share_paid,
        s.market.reward_per_share_stored(&s.subject)
    );
}

#[test]
fn test_withdraw_reward() {
    let s = Setup::new();
    s.set_fees(0, 0, 10 * PERCENT, 0);
    let buyer = s.funded_trader();
    s.market.buy_shares(&buyer, &buyer, &s.subject, &1, &UNIT);

    let reward = unit_price(1) / 10;
    assert_eq!(s.market.withdraw_reward(&s.creator, &s.subject), reward);
    assert_eq!(s.token.balance(&s.creator), reward);
    assert_eq!(s.market.get_reward(&s.subject, &s.creator), 0);

    assert_eq!(
        s.market.try_withdraw_reward(&s.creator, &s.subject),
        Err(Ok(Error::NoRewards))
    );
    assert_eq!(s.token.balance(&s.creator), reward);
}

#[test]
fn test_withdraw_without_reward() {
    let s = Setup::new();
    let stranger = Address::generate(&s.env);
    let unknown = BytesN::from_array(&s.env, &[1u8; 32]);

    assert_eq!(
        s.market.try_withdraw_reward(&s.creator, &s.subject),
        Err(Ok(Error::NoRewards))
    );
    assert_eq!(
        s.market.try_withdraw_reward(&stranger, &unknown),
        Err(Ok(Error::NoRewards))
    );
}

#[test]
fn test_shares_and_earnings_batch() {
    let s = Setup::new();
    s.set_fees(0, 0, 10 * PERCENT, 0);

    let second = BytesN::from_array(&s.env, &[8u8; 32]);
    s.market.create_shares(&s.creator, &second, &RATIO, &0);
    let buyer = s.funded_trader();
    s.market.buy_shares(&buyer, &buyer, &second, &2, &UNIT);

    let mut subjects = Vec::new(&s.env);
    subjects.push_back(s.subject.clone());
    subjects.push_back(second.clone());
    let holdings = s.market.get_shares_and_earnings(&s.creator, &subjects);

    assert_eq!(holdings.len(), 2);
    let first = holdings.get(0).unwrap();
    assert_eq!(first.subject, s.subject);
    assert_eq!(first.shares, 1);
    assert_eq!(first.earnings, 0);

    let other = holdings.get(1).unwrap();
    assert_eq!(other.shares, 1);
    assert_eq!(other.earnings, (unit_price(1) + unit_price(2)) / 10);
}

#[test]
fn test_fee_setters_owner_only() {
    let s = Setup::new();
    let stranger = Address::generate(&s.env);

    assert_eq!(
        s.market.try_set_protocol_fee_percent(&stranger, &PERCENT),
        Err(Ok(Error::Unauthorized))
    );
    assert_eq!(
        s.market.try_set_lp_farming_address(&stranger, &stranger),
        Err(Ok(Error::Unauthorized))
    );
    assert_eq!(
        s.market.try_transfer_ownership(&stranger, &stranger),
        Err(Ok(Error::Unauthorized))
    );
}

#[test]
fn test_fee_setters_validate() {
    let s = Setup::new();

    assert_eq!(
        s.market.try_set_holder_fee_percent(&s.owner, &UNIT),
        Err(Ok(Error::InvalidParams))
    );
    assert_eq!(
        s.market.try_set_creator_fee_percent(&s.owner, &-1),
        Err(Ok(Error::InvalidParams))
    );
    assert_eq!(
        s.market.try_set_create_shares_eth_fee(&s.owner, &-1),
        Err(Ok(Error::InvalidParams))
    );

    s.market.set_protocol_fee_percent(&s.owner, &(60 * PERCENT));
    assert_eq!(
        s.market.try_set_creator_fee_percent(&s.owner, &(40 * PERCENT)),
        Err(Ok(Error::InvalidParams))
    );
    s.market.set_creator_fee_percent(&s.owner, &(39 * PERCENT));

    let config = s.market.fee_config();
    assert_eq!(config.protocol_fee_percent, 60 * PERCENT);
    assert_eq!(config.creator_fee_percent, 39 * PERCENT);
}

#[test]
fn test_transfer_ownership() {
    let s = Setup::new();
    let next = Address::generate(&s.env);

    s.market.transfer_ownership(&s.owner, &next);
    assert_eq!(s.market.owner(), next);

    assert_eq!(
        s.market.try_set_holder_fee_percent(&s.owner, &PERCENT),
        Err(Ok(Error::Unauthorized))
    );
    s.market.set_holder_fee_percent(&next, &PERCENT);
}

#[test]
fn test_fee_setter_requires_owner_auth() {
    let env = Env::default();
    env.mock_all_auths();
    let owner = Address::generate(&env);
    let asset = env.register_stellar_asset_contract(owner.clone());
    let market = SharesMarketClient::new(&env, &env.register_contract(None, SharesMarket));
    market.initialize(&owner, &asset, &asset);

    // authorize a different function only
    let result = market
        .mock_auths(&[MockAuth {
            address: &owner,
            invoke: &MockAuthInvoke {
                contract: &market.address,
                fn_name: "set_creator_fee_percent",
                args: (owner.clone(), PERCENT).into_val(&env),
                sub_invokes: &[],
            },
        }])
        .try_set_protocol_fee_percent(&owner, &PERCENT);
    assert!(matches!(result, Err(Err(_))));
}
