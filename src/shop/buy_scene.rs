//! Purchase handler: settles a trade or narrates why it didn't happen.

use log::{debug, info, warn};

use crate::shop::errors::ShopError;
use crate::shop::module::{ArmorShopModule, NavigationContext, CHOICE_PARAMETER};
use crate::shop::narrative;
use crate::shop::pricing::TradeQuote;
use crate::shop::services::HostServices;
use crate::shop::types::{Action, Armor, Parameters, DEFAULT_GROUP};

/// How a purchase request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// No usable choice was submitted.
    Confused,
    /// The character couldn't cover the cost.
    Rejected { quote: TradeQuote },
    Purchased { quote: TradeQuote, armor: Armor },
}

pub fn handle_viewpoint<S>(
    services: &S,
    shop: &ArmorShopModule,
    ctx: &mut NavigationContext<'_>,
) -> Result<PurchaseOutcome, ShopError>
where
    S: HostServices + ?Sized,
{
    let outcome = settle(services, shop, ctx)?;
    add_menu(ctx);
    services.save_viewpoint(ctx.viewpoint)?;
    Ok(outcome)
}

fn settle<S>(
    services: &S,
    shop: &ArmorShopModule,
    ctx: &mut NavigationContext<'_>,
) -> Result<PurchaseOutcome, ShopError>
where
    S: HostServices + ?Sized,
{
    let Some(choice) = chosen_armor(services, ctx.parameters)? else {
        debug!("{}: no usable choice from {}", CHOICE_PARAMETER, ctx.character.id);
        ctx.viewpoint.description.push_str(&narrative::confused());
        return Ok(PurchaseOutcome::Confused);
    };

    let (current, trade_in) = shop.trade_in_for(services, ctx.character)?;
    let gold = services.gold_for(ctx.character);
    let quote = TradeQuote::new(gold, trade_in, choice.cost);

    let Some(gold_after) = quote.gold_after() else {
        info!(
            "{} can't afford armor id={} (gold={}, trade-in={}, cost={})",
            ctx.character.id, choice.id, gold, trade_in, choice.cost
        );
        ctx.viewpoint
            .description
            .push_str(&narrative::theft_failure(&choice.name));
        return Ok(PurchaseOutcome::Rejected { quote });
    };

    services.set_gold_for(ctx.character, gold_after);
    services.set_armor_for(ctx.character, &choice);
    services.save_character(ctx.character)?;
    info!(
        "{} bought armor id={} for {} (trade-in {}), gold now {}",
        ctx.character.id,
        choice.id,
        choice.cost,
        trade_in,
        gold_after
    );

    ctx.viewpoint.description.push_str(&narrative::purchase_success(
        current.as_ref().map(|a| a.name.as_str()),
        &choice.name,
    ));
    Ok(PurchaseOutcome::Purchased {
        quote,
        armor: choice,
    })
}

fn chosen_armor<S>(services: &S, parameters: &Parameters) -> Result<Option<Armor>, ShopError>
where
    S: HostServices + ?Sized,
{
    let Some(raw) = parameters.get(CHOICE_PARAMETER) else {
        return Ok(None);
    };
    match raw.trim().parse() {
        Ok(id) => services.armor_by_id(id),
        Err(_) => Ok(None),
    }
}

fn add_menu(ctx: &mut NavigationContext<'_>) {
    match ctx.referrer {
        Some(referrer) => ctx
            .viewpoint
            .add_action_to_group(Action::titled(referrer.id, "Back"), DEFAULT_GROUP),
        None => warn!(
            "no referrer for buy scene id={}, leaving menu empty",
            ctx.scene.id
        ),
    }
}
