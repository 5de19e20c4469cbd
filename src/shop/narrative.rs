//! Shop text. Uses the host's backtick color codes (`` `5 ``, `` `! ``, `` `n `` ...),
//! see [`crate::logutil::strip_color_codes`] for a plain rendering.

pub const SHOPKEEPER: &str = "Pegasus";
pub const DEFAULT_SHOP_TITLE: &str = "Pegasus's Armor";

pub fn shop_description() -> String {
    format!(
        "`5The fair and beautiful `#{SHOPKEEPER}`5 greets you with a warm smile \
         as you stroll over to her brightly colored gypsy wagon, which is placed, \
         not out of coincidence, right next to `!MightyE`5's weapon shop.\n\
         Her outfit is as brightly colored and outrageous as her wagon, \
         and it is almost (but not quite) enough to make you look away from her huge \
         gray eyes and flashes of skin between her not-quite-sufficient gypsy clothes. "
    )
}

pub fn trade_in_offer(value: i64, armor_name: &str) -> String {
    format!(
        "\n`!{SHOPKEEPER}`7 looks at you and says, \"`#I'll give you `^{value}`# trade-in value for your `5{armor_name}`#.\""
    )
}

pub fn confused() -> String {
    format!(
        "`!{SHOPKEEPER}`7 looks at you, confused for a second, then realizes that you've apparently \
         taken one too many bonks on the head, and nods and smiles."
    )
}

pub fn theft_failure(armor_name: &str) -> String {
    format!(
        "Waiting until `!{SHOPKEEPER}`7 looks away, you reach carefully for the `5{armor_name}`7, \
         which you silently remove from the stack of clothes upon which it sits. Secure in your theft, \
         you turn around only to realize that your turning action is hindered by a fist closed tightly \
         around your throat. Glancing down, you trace the fist to the arm on which it is attached, \
         which in turn is attached to a very muscular `!MightyE`5. You try to explain what happened here, \
         but your throat doesn't seem to be able to open up to let your voice through, let alone essential \
         oxygen. As darkness creeps in on the edge of your vision, you glance pleadingly, but futilely at \
         `!{SHOPKEEPER}`7 who is staring dreamily at `!MightyE`5, her hands clutched next to her face, \
         which is painted with a large admiring smile. You wake up some time later, having been tossed \
         unconscious into the street. "
    )
}

/// `old_name` is `None` when the character walked in wearing nothing.
pub fn purchase_success(old_name: Option<&str>, new_name: &str) -> String {
    let handover = match old_name {
        Some(old) => format!(
            "`!{SHOPKEEPER}`7 takes your `5{old}`7 and promptly puts a price on it, \
             putting it on display with the rest of her armor.`n`nIn return, she hands you a shiny "
        ),
        None => format!("`!{SHOPKEEPER}`7 counts your gold twice and hands you a shiny "),
    };
    format!(
        "{handover}new `5{new_name}`7. You begin to protest, \"`@Won't I look silly wearing nothing \
         but my `&{new_name}`@?`5\" you ask. You ponder it a moment, and then realize that everyone \
         else in the town is doing the same thing. \"`@Oh well, when in Rome...`5\""
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_mentions_both_pieces() {
        let text = purchase_success(Some("Fuzzy Slippers"), "Leather Tunic");
        assert!(text.contains("`5Fuzzy Slippers`7"));
        assert!(text.contains("`&Leather Tunic`@"));
    }

    #[test]
    fn success_without_old_armor() {
        let text = purchase_success(None, "Leather Tunic");
        assert!(text.contains("counts your gold"));
        assert!(!text.contains("puts a price on it"));
    }

    #[test]
    fn offer_quotes_value() {
        assert!(trade_in_offer(36, "Thong").contains("`^36`#"));
    }
}
