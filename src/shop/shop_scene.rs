//! The shop floor: trade-in offer, the armor list, and the way back out.

use log::debug;

use crate::logutil::escape_log;
use crate::shop::errors::ShopError;
use crate::shop::module::{ArmorShopModule, NavigationContext, BUY_TEMPLATE, CHOICE_PARAMETER};
use crate::shop::narrative;
use crate::shop::pricing::is_selectable;
use crate::shop::services::HostServices;
use crate::shop::types::{
    Action, Armor, Attachment, Form, FormElement, FormElementKind, FormElementOptions,
    SceneRecord, DEFAULT_GROUP, HIDDEN_GROUP,
};

/// Prepare the shop viewpoint with the current trade-in value, if any, and the
/// list of armor for the character's level.
pub fn handle_viewpoint<S>(
    services: &S,
    shop: &ArmorShopModule,
    ctx: &mut NavigationContext<'_>,
) -> Result<(), ShopError>
where
    S: HostServices + ?Sized,
{
    let (current, trade_in) = shop.trade_in_for(services, ctx.character)?;

    if let Some(armor) = current.as_ref().filter(|_| trade_in > 0) {
        ctx.viewpoint.description = format!(
            "{}{}",
            ctx.scene.description,
            narrative::trade_in_offer(trade_in, &armor.name)
        );
    }

    add_for_sale_form(services, ctx, current.as_ref(), trade_in)?;
    add_menu(ctx)?;

    debug!(
        "shop viewpoint for {}: {}",
        ctx.character.id,
        escape_log(&ctx.viewpoint.description)
    );
    services.save_viewpoint(ctx.viewpoint)
}

fn add_for_sale_form<S>(
    services: &S,
    ctx: &mut NavigationContext<'_>,
    current: Option<&Armor>,
    trade_in: i64,
) -> Result<(), ShopError>
where
    S: HostServices + ?Sized,
{
    let gold = services.gold_for(ctx.character);
    let armors = services.armors_for_level(ctx.character.level)?;

    // Anything too expensive, or already worn, is shown but can't be picked.
    let elements = armors
        .iter()
        .map(|a| FormElement {
            name: CHOICE_PARAMETER.to_string(),
            kind: FormElementKind::Button,
            label: a.name.clone(),
            value: a.id.to_string(),
            options: if is_selectable(a, current, trade_in, gold) {
                FormElementOptions::none()
            } else {
                FormElementOptions::disabled()
            },
        })
        .collect();

    let buy_action = buy_action(services, ctx.scene)?;
    ctx.viewpoint.attach(Attachment::Form(Form {
        elements,
        action: buy_action.clone(),
    }));

    // The buy action has to be in the viewpoint to be takeable, but stays out of
    // the menu. Clients may render a submit button for the form instead.
    ctx.viewpoint.add_action_to_group(buy_action, HIDDEN_GROUP);
    Ok(())
}

fn buy_action<S>(services: &S, scene: &SceneRecord) -> Result<Action, ShopError>
where
    S: HostServices + ?Sized,
{
    for child_id in &scene.children {
        if let Some(child) = services.find_scene(*child_id)? {
            if child.template == BUY_TEMPLATE {
                return Ok(Action::new(child.id));
            }
        }
    }
    Err(ShopError::MissingChildScene { scene_id: scene.id })
}

fn add_menu(ctx: &mut NavigationContext<'_>) -> Result<(), ShopError> {
    let parent = ctx
        .scene
        .parents
        .first()
        .copied()
        .ok_or(ShopError::MissingParentScene {
            scene_id: ctx.scene.id,
        })?;
    ctx.viewpoint
        .add_action_to_group(Action::titled(parent, "Back"), DEFAULT_GROUP);
    Ok(())
}
