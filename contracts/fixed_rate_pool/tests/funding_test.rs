mod common;

use common::*;
use fixed_rate_pool::{Error, Surplus, MAX_AMOUNT, MAX_BATCH_SIZE};

const HUNDRED: i128 = 100 * SCALE;
/// Deficit of a fresh 100 token, one year deposit
const FULL_DEFICIT: i128 = 24_999_999;

// ============================================
// FUND
// ============================================

#[test]
fn test_fund_full_deficit() {
    let ctx = TestContext::new();
    let pool = ctx.pool();
    let user = ctx.user();
    let funder = ctx.user();
    let deposit_id = ctx.deposit(&user, HUNDRED, YEAR);

    let (funding_id, funded) = pool.fund(&funder, &deposit_id, &MAX_AMOUNT);
    assert_eq!(funding_id, 1);
    assert_eq!(funded, FULL_DEFICIT);
    assert_eq!(ctx.balance(&funder), USER_BALANCE - FULL_DEFICIT);

    let funding = pool.get_funding(&funding_id);
    assert_eq!(funding.deposit_id, deposit_id);
    assert_eq!(funding.principal_paid, FULL_DEFICIT);
    assert_eq!(funding.funded_virtual_amount, 1_020_000_000);
    assert_eq!(funding.recorded_income_index, fixed_rate_pool::PRECISION);
    assert_eq!(pool.get_deposit(&deposit_id).funding_id, funding_id);

    // Units minted 1:1 with the covered virtual amount
    assert_eq!(ctx.multitoken().balance_of(&funder, &funding_id), 1_020_000_000);
    assert_eq!(ctx.multitoken().total_supply(&funding_id), 1_020_000_000);

    let balanced = Surplus {
        is_negative: false,
        amount: 0,
    };
    assert_eq!(pool.surplus_of_deposit(&deposit_id), balanced);
    assert_eq!(pool.surplus(), balanced);

    // Nothing left to cover
    assert_eq!(
        pool.try_fund(&funder, &deposit_id, &MAX_AMOUNT),
        Err(Ok(Error::NoDeficitToFund))
    );
}

#[test]
fn test_funders_collect_floating_yield() {
    let ctx = TestContext::new();
    let pool = ctx.pool();
    let user = ctx.user();
    let funder = ctx.user();
    let deposit_id = ctx.deposit(&user, HUNDRED, YEAR);
    let (funding_id, _) = pool.fund(&funder, &deposit_id, &MAX_AMOUNT);

    // Venue value grows by 10%
    ctx.accrue_yield(ctx.vault().total_value() / 10);
    ctx.advance(30 * DAY);

    let owed = pool.total_interest_owed_to_funders();
    assert_close(owed, 102_000_000, 2);

    let surplus_before = pool.surplus();
    let paid = pool.pay_interest_to_funders(&deposit_id);
    assert_eq!(paid, owed);

    // Paying funders moves value out of the venue and out of the
    // liabilities alike
    let surplus_after = pool.surplus();
    assert_eq!(surplus_after.is_negative, surplus_before.is_negative);
    assert_close(surplus_after.amount, surplus_before.amount, 2);
    assert_close(pool.total_interest_owed_to_funders(), 0, 1);

    let accounting = pool.get_accounting();
    assert_eq!(accounting.total_interest_paid_to_funders, paid);
    assert_eq!(pool.get_funding(&funding_id).total_interest_paid, paid);

    // Dividend sits in the multitoken until the funder pulls it
    let multitoken = ctx.multitoken();
    // per-unit bookkeeping may round a unit away
    let dividend = multitoken.dividend_of(&funder, &funding_id, &ctx.stablecoin);
    assert_close(dividend, paid, 1);

    let balance_before = ctx.balance(&funder);
    let withdrawn = multitoken.withdraw_dividend(&funder, &funding_id, &ctx.stablecoin);
    assert_eq!(withdrawn, dividend);
    assert_eq!(ctx.balance(&funder), balance_before + dividend);

    // A second call right away has nothing to pay
    assert_close(pool.pay_interest_to_funders(&deposit_id), 0, 1);
}

#[test]
fn test_views_are_idempotent() {
    let ctx = TestContext::new();
    let pool = ctx.pool();
    let user = ctx.user();
    let funder = ctx.user();
    let deposit_id = ctx.deposit(&user, HUNDRED, YEAR);
    pool.fund(&funder, &deposit_id, &(FULL_DEFICIT / 2));
    ctx.accrue_yield(5 * SCALE);

    assert_eq!(pool.surplus(), pool.surplus());
    assert_eq!(pool.surplus_of_deposit(&deposit_id), pool.surplus_of_deposit(&deposit_id));
    assert_eq!(
        pool.total_interest_owed_to_funders(),
        pool.total_interest_owed_to_funders()
    );
}

#[test]
fn test_partial_funding_then_early_exit_refunds_funders() {
    let ctx = TestContext::new();
    let pool = ctx.pool();
    let user = ctx.user();
    let funder = ctx.user();
    let deposit_id = ctx.deposit(&user, HUNDRED, YEAR);

    // Cover 90% of the deficit
    let (funding_id, funded) = pool.fund(&funder, &deposit_id, &22_499_999);
    assert_eq!(funded, 22_499_999);
    assert_eq!(pool.get_funding(&funding_id).funded_virtual_amount, 917_999_995);

    let payout = pool.withdraw(&user, &deposit_id, &510_000_000, &true);
    assert_eq!(payout, 495_000_000);

    // Lost yield on the exiting half is worth more than the principal
    // funders put behind it, so the refund is capped at that principal
    let funding = pool.get_funding(&funding_id);
    assert_eq!(funding.total_refunded, 11_249_999);
    assert_eq!(funding.funded_virtual_amount, 917_999_995 - 458_999_997);
    assert_eq!(funding.principal_paid, 22_499_999 - 11_249_999);
    assert!(funding.total_refunded <= funded);

    assert_close(
        ctx.multitoken().dividend_of(&funder, &funding_id, &ctx.stablecoin),
        11_249_999,
        1,
    );

    let accounting = pool.get_accounting();
    assert_eq!(accounting.total_funded_virtual_amount, funding.funded_virtual_amount);
    assert_eq!(accounting.total_deposit, 50 * SCALE);
}

#[test]
fn test_fund_errors() {
    let ctx = TestContext::new();
    let pool = ctx.pool();
    let user = ctx.user();
    let funder = ctx.user();
    let deposit_id = ctx.deposit(&user, HUNDRED, YEAR);

    assert_eq!(
        pool.try_fund(&funder, &deposit_id, &0),
        Err(Ok(Error::InvalidAmount))
    );
    assert_eq!(
        pool.try_fund(&funder, &42, &MAX_AMOUNT),
        Err(Ok(Error::DepositNotFound))
    );
    assert_eq!(
        pool.try_pay_interest_to_funders(&deposit_id),
        Err(Ok(Error::DepositNotFunded))
    );

    // Venue already earned more than the promise
    ctx.accrue_yield(5 * SCALE);
    assert!(!pool.surplus_of_deposit(&deposit_id).is_negative);
    assert_eq!(
        pool.try_fund(&funder, &deposit_id, &MAX_AMOUNT),
        Err(Ok(Error::NoDeficitToFund))
    );

    let second = ctx.deposit(&user, HUNDRED, YEAR);
    ctx.advance(YEAR);
    assert_eq!(
        pool.try_fund(&funder, &second, &MAX_AMOUNT),
        Err(Ok(Error::AlreadyMatured))
    );

    pool.pause();
    assert_eq!(
        pool.try_fund(&funder, &second, &MAX_AMOUNT),
        Err(Ok(Error::ContractPaused))
    );
}

#[test]
fn test_fund_in_steps() {
    let ctx = TestContext::new();
    let pool = ctx.pool();
    let user = ctx.user();
    let alice = ctx.user();
    let bob = ctx.user();
    let deposit_id = ctx.deposit(&user, HUNDRED, YEAR);

    let (first_id, _) = pool.fund(&alice, &deposit_id, &(FULL_DEFICIT / 2));
    let (second_id, funded) = pool.fund(&bob, &deposit_id, &MAX_AMOUNT);

    // One funding per deposit, shared by both funders
    assert_eq!(first_id, second_id);
    assert_eq!(pool.funding_count(), 1);
    assert_eq!(funded, FULL_DEFICIT - FULL_DEFICIT / 2);

    let funding = pool.get_funding(&first_id);
    assert_eq!(funding.principal_paid, FULL_DEFICIT);
    assert_eq!(funding.funded_virtual_amount, 1_020_000_000);

    let multitoken = ctx.multitoken();
    assert_eq!(
        multitoken.balance_of(&alice, &first_id) + multitoken.balance_of(&bob, &first_id),
        1_020_000_000
    );
    assert!(!pool.surplus_of_deposit(&deposit_id).is_negative);
}

// ============================================
// BATCH FUNDING
// ============================================

#[test]
fn test_fund_all() {
    let ctx = TestContext::new();
    let pool = ctx.pool();
    let user = ctx.user();
    let funder = ctx.user();

    for _ in 0..3 {
        ctx.deposit(&user, HUNDRED, YEAR);
    }

    let total = pool.fund_all(&funder);
    assert_eq!(total, 3 * FULL_DEFICIT);
    assert_eq!(pool.funding_count(), 3);
    for deposit_id in 1..=3u64 {
        assert_eq!(pool.get_deposit(&deposit_id).funding_id, deposit_id);
    }

    assert_eq!(pool.try_fund_all(&funder), Err(Ok(Error::NoDeficitToFund)));
}

#[test]
fn test_fund_multiple_skips_closed_and_covered() {
    let ctx = TestContext::new();
    let pool = ctx.pool();
    let user = ctx.user();
    let funder = ctx.user();

    let first = ctx.deposit(&user, HUNDRED, YEAR);
    let second = ctx.deposit(&user, HUNDRED, YEAR);
    let third = ctx.deposit(&user, HUNDRED, YEAR);

    pool.withdraw(&user, &first, &MAX_AMOUNT, &true);
    pool.fund(&funder, &second, &MAX_AMOUNT);

    // Range reaches past the last deposit; only the third is funded
    let total = pool.fund_multiple(&funder, &1, &5);
    assert_eq!(total, FULL_DEFICIT);
    assert_ne!(pool.get_deposit(&third).funding_id, 0);

    assert_eq!(
        pool.try_fund_multiple(&funder, &1, &(MAX_BATCH_SIZE + 1)),
        Err(Ok(Error::BatchTooLarge))
    );
    assert_eq!(
        pool.try_fund_multiple(&funder, &1, &0),
        Err(Ok(Error::InvalidAmount))
    );
    assert_eq!(
        pool.try_fund_multiple(&funder, &1, &3),
        Err(Ok(Error::NoDeficitToFund))
    );
}

#[test]
fn test_fund_all_skips_closed_deposits_past_batch_size() {
    let ctx = TestContext::new();
    ctx.env.cost_estimate().budget().reset_unlimited();
    let pool = ctx.pool();
    let user = ctx.user();
    let funder = ctx.user();

    let count = MAX_BATCH_SIZE as u64 + 1;
    for _ in 0..count {
        ctx.deposit(&user, HUNDRED, YEAR);
    }
    for deposit_id in 1..count {
        pool.withdraw(&user, &deposit_id, &MAX_AMOUNT, &true);
    }

    // Only the last id is still open
    let total = pool.fund_all(&funder);
    assert_eq!(total, FULL_DEFICIT);
    assert_eq!(pool.get_deposit(&count).funding_id, 1);
    assert_eq!(pool.funding_count(), 1);

    assert_eq!(pool.try_fund_all(&funder), Err(Ok(Error::NoDeficitToFund)));
}

#[test]
fn test_fund_all_moves_past_matured_window() {
    let ctx = TestContext::new();
    ctx.env.cost_estimate().budget().reset_unlimited();
    let pool = ctx.pool();
    let user = ctx.user();
    let funder = ctx.user();

    let window = MAX_BATCH_SIZE as u64;
    for _ in 0..window {
        ctx.deposit(&user, HUNDRED, DAY);
    }
    for _ in 0..5 {
        ctx.deposit(&user, HUNDRED, YEAR);
    }

    // One call covers one window of ids
    pool.fund_all(&funder);
    assert_eq!(pool.funding_count(), window);
    assert_eq!(pool.get_deposit(&(window + 1)).funding_id, 0);
    assert_eq!(pool.try_fund_all(&funder), Err(Ok(Error::NoDeficitToFund)));

    // The short deposits mature and the next call reaches the rest
    ctx.advance(DAY);
    assert_eq!(pool.fund_all(&funder), 5 * FULL_DEFICIT);
    for deposit_id in window + 1..=window + 5 {
        assert_ne!(pool.get_deposit(&deposit_id).funding_id, 0);
    }
}

#[test]
fn test_fund_all_without_deposits() {
    let ctx = TestContext::new();
    let funder = ctx.user();

    assert_eq!(
        ctx.pool().try_fund_all(&funder),
        Err(Ok(Error::NoDeficitToFund))
    );
}

// ============================================
// LIFECYCLE WITH FUNDERS
// ============================================

#[test]
fn test_mature_withdraw_settles_funders_first() {
    let ctx = TestContext::new();
    let pool = ctx.pool();
    let user = ctx.user();
    let funder = ctx.user();
    let deposit_id = ctx.deposit(&user, HUNDRED, YEAR);
    let (funding_id, _) = pool.fund(&funder, &deposit_id, &MAX_AMOUNT);

    ctx.accrue_yield(ctx.vault().total_value() / 10);
    ctx.advance(YEAR);

    let payout = pool.withdraw(&user, &deposit_id, &MAX_AMOUNT, &false);
    assert_eq!(payout, 1_020_000_000);
    assert_eq!(ctx.balance(&ctx.beneficiary), 4_999_999);

    let funding = pool.get_funding(&funding_id);
    assert_close(funding.total_interest_paid, 102_000_000, 2);
    assert_eq!(funding.funded_virtual_amount, 0);
    assert_eq!(funding.principal_paid, 0);
    assert_eq!(funding.total_refunded, 0);

    let accounting = pool.get_accounting();
    assert_eq!(accounting.total_funded_virtual_amount, 0);
    assert_eq!(accounting.funded_virtual_index_sum, 0);
    assert_eq!(accounting.total_deposit, 0);
    assert!(!pool.surplus().is_negative);
}

#[test]
fn test_rollover_closes_funding() {
    let ctx = TestContext::new();
    let pool = ctx.pool();
    let user = ctx.user();
    let funder = ctx.user();
    let deposit_id = ctx.deposit(&user, HUNDRED, YEAR);
    let (funding_id, _) = pool.fund(&funder, &deposit_id, &MAX_AMOUNT);

    ctx.accrue_yield(ctx.vault().total_value() / 10);
    ctx.advance(YEAR);

    let (new_id, _) = pool.rollover_deposit(&user, &deposit_id, &(ctx.now() + YEAR));

    let funding = pool.get_funding(&funding_id);
    assert_close(funding.total_interest_paid, 102_000_000, 2);
    assert_eq!(funding.funded_virtual_amount, 0);
    assert_close(
        ctx.multitoken().dividend_of(&funder, &funding_id, &ctx.stablecoin),
        funding.total_interest_paid,
        1,
    );

    // The new deposit starts unfunded
    let new = pool.get_deposit(&new_id);
    assert_eq!(new.funding_id, 0);
    assert_eq!(new.principal, 1_020_000_000);
    assert_eq!(pool.get_accounting().total_funded_virtual_amount, 0);
}

// ============================================
// REWARDS
// ============================================

#[test]
fn test_funder_rewards_paid_as_dividend() {
    let ctx = TestContext::new();
    ctx.enable_rewards();

    let pool = ctx.pool();
    let user = ctx.user();
    let funder = ctx.user();
    let deposit_id = ctx.deposit(&user, HUNDRED, YEAR);
    let (funding_id, _) = pool.fund(&funder, &deposit_id, &MAX_AMOUNT);

    ctx.accrue_yield(SCALE);
    ctx.advance(30 * DAY);
    pool.pay_interest_to_funders(&deposit_id);

    let expected = FULL_DEFICIT * (30 * DAY) as i128 / YEAR as i128;
    let rewarded = ctx
        .multitoken()
        .dividend_of(&funder, &funding_id, &ctx.reward_token);
    assert_close(rewarded, expected, 1);
    assert_eq!(pool.get_funding(&funding_id).last_payout_timestamp, ctx.now());

    // No time passed, no new reward
    pool.pay_interest_to_funders(&deposit_id);
    assert_eq!(
        ctx.multitoken().dividend_of(&funder, &funding_id, &ctx.reward_token),
        rewarded
    );
}
