use crate::session;
use anyhow::Result;
use munch_core::model::{CollectionId, RestaurantId};

pub fn run(
    collection: String,
    restaurant: String,
    date: Option<String>,
    user: Option<String>,
    json: bool,
) -> Result<()> {
    let engine = session::engine()?;
    let user = session::acting_user(user)?;
    let date = session::parse_when(date.as_deref())?;

    let decision = engine.record_manual_visit(
        &CollectionId::from(collection),
        &user,
        &RestaurantId::from(restaurant),
        date,
    )?;
    if json {
        return session::print_json(&decision);
    }
    println!(
        "Recorded visit {} to {} on {}",
        decision.id.short(),
        decision.selected_restaurant().map(|r| r.as_str()).unwrap_or("-"),
        decision.visit_date.format("%Y-%m-%d")
    );
    Ok(())
}
