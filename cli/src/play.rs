//! `play` and `list` command handlers.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::{TimeDelta, Utc};

use swipecart_engine::swipecart_types::{Challenge, ChallengeId, RewardId, Store};
use swipecart_engine::{
    Cart, Catalog, ChallengeSession, Checkout, CheckoutScope, PointsWallet, ScoringRules,
};

/// One swipe on the current item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Scan,
    Skip,
}

pub fn parse_decisions(raw: &str) -> Result<Vec<Decision>> {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| match c.to_ascii_lowercase() {
            's' | 'r' => Ok(Decision::Scan),
            'k' | 'l' => Ok(Decision::Skip),
            other => bail!("unknown decision '{other}' (use s to scan, k to skip)"),
        })
        .collect()
}

/// Settings the handlers need from config.
pub struct PlayContext {
    pub catalog: Catalog,
    pub store: Store,
    pub rules: ScoringRules,
    pub cart: Cart,
    pub wallet: PointsWallet,
    pub barcode_validity: TimeDelta,
}

pub struct PlayRequest<'a> {
    pub challenge: &'a str,
    pub decisions: &'a str,
    pub elapsed: Option<Duration>,
    pub checkout: bool,
    pub redeem: &'a [String],
}

pub fn list(catalog: &Catalog, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Stores:")?;
    for store in catalog.stores() {
        writeln!(out, "  {:<12} {}", store.id, store.name)?;
    }
    writeln!(out, "\nChallenges:")?;
    for challenge in catalog.challenges() {
        write_challenge_line(challenge, out)?;
    }
    writeln!(out, "\nRewards:")?;
    for reward in catalog.rewards() {
        writeln!(
            out,
            "  {:<3} {:>5} pts  {}",
            reward.id, reward.points_cost, reward.title
        )?;
    }
    Ok(())
}

fn write_challenge_line(challenge: &Challenge, out: &mut impl Write) -> Result<()> {
    let limit = challenge
        .time_limit()
        .map(|limit| format!("{}m", limit.as_secs() / 60))
        .unwrap_or_else(|| "-".to_owned());
    writeln!(
        out,
        "  {:<3} {:<22} {} items  {:>4} pts  {limit}",
        challenge.id(),
        challenge.title(),
        challenge.len(),
        challenge.potential_points(),
    )?;
    Ok(())
}

pub fn play(ctx: &mut PlayContext, request: &PlayRequest<'_>, out: &mut impl Write) -> Result<()> {
    let id = ChallengeId::new(request.challenge);
    let challenge: Arc<Challenge> = ctx
        .catalog
        .challenge(&id)
        .with_context(|| format!("unknown challenge {id}"))?;
    let decisions = parse_decisions(request.decisions)?;
    if decisions.len() > challenge.len() {
        bail!(
            "{} decisions given but challenge {id} has {} items",
            decisions.len(),
            challenge.len()
        );
    }

    let mut session = ChallengeSession::start(Arc::clone(&challenge), ctx.rules)?;
    writeln!(
        out,
        "{} at {} ({} potential points)",
        challenge.title(),
        ctx.store.name,
        session.potential_points()
    )?;

    for decision in decisions {
        if let Some(item) = session.current_item() {
            let verb = match decision {
                Decision::Scan => "scan",
                Decision::Skip => "skip",
            };
            writeln!(out, "  {verb:<4} {} ({})", item.name, item.location)?;
        }
        match decision {
            Decision::Scan => session.scan(&mut ctx.cart)?,
            Decision::Skip => session.skip(&mut ctx.cart)?,
        };
        for event in session.take_events() {
            writeln!(out, "       {}", event.format())?;
        }
    }

    if let Some(elapsed) = request.elapsed
        && !session.is_completed()
    {
        session.advance_clock(elapsed, &mut ctx.cart)?;
        for event in session.take_events() {
            writeln!(out, "  {}", event.format())?;
        }
    }

    let Some(summary) = session.completion() else {
        writeln!(
            out,
            "Session in progress: {} of {} items processed, {} points so far",
            session.current_index(),
            challenge.len(),
            session.earned_points()
        )?;
        return Ok(());
    };
    writeln!(
        out,
        "Collected {} of {} items, {} points ({} combo bonus)",
        summary.scanned,
        challenge.len(),
        summary.earned_points,
        summary.combo_bonus_total
    )?;

    if !request.checkout {
        return Ok(());
    }
    checkout(ctx, CheckoutScope::Challenge(id), out)?;

    for reward_id in request.redeem {
        let reward = ctx
            .catalog
            .reward(&RewardId::new(reward_id.as_str()))
            .with_context(|| format!("unknown reward {reward_id}"))?;
        let balance = ctx.wallet.redeem(reward)?;
        writeln!(out, "Redeemed {}: {balance} points left", reward.title)?;
    }
    Ok(())
}

fn checkout(ctx: &mut PlayContext, scope: CheckoutScope, out: &mut impl Write) -> Result<()> {
    let checkout = Checkout::begin(
        &ctx.cart,
        &ctx.store,
        scope,
        Utc::now(),
        ctx.barcode_validity,
    )?;
    let totals = checkout.totals();
    writeln!(out, "Subtotal {}", totals.subtotal)?;
    writeln!(out, "Tax ({}) {}", ctx.cart.tax_rate(), totals.tax)?;
    writeln!(out, "Total {}", totals.total)?;
    writeln!(out, "Barcode {}", checkout.barcode().code())?;
    writeln!(out, "        {}", checkout.barcode().pattern())?;

    let receipt = checkout.complete(&mut ctx.cart, &mut ctx.wallet, Utc::now())?;
    writeln!(
        out,
        "Checkout complete: +{} points, balance {}",
        receipt.points_earned, receipt.balance
    )?;
    Ok(())
}
