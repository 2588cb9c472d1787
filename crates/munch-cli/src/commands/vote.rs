use crate::session;
use anyhow::Result;
use munch_core::model::RestaurantId;

pub fn run(id: String, restaurants: Vec<String>, user: Option<String>, json: bool) -> Result<()> {
    let engine = session::engine()?;
    let user = session::acting_user(user)?;
    let decision_id = session::resolve_id(&engine, &id)?;

    let ranking: Vec<RestaurantId> = restaurants.into_iter().map(RestaurantId::from).collect();
    let receipt = engine.submit_group_vote(&decision_id, &user, ranking)?;

    if json {
        return session::print_json(&receipt);
    }
    if receipt.replaced {
        println!("Replaced {}'s ballot on decision {}", user, decision_id.short());
    } else {
        println!("Recorded {}'s ballot on decision {}", user, decision_id.short());
    }
    Ok(())
}
