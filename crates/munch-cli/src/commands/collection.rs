use crate::session;
use anyhow::{bail, Context, Result};
use chrono::Utc;
use munch_core::model::{Collection, CollectionId, RestaurantId, RestaurantRef};
use munch_store::DecisionStore;

pub fn create(id: String, name: String, user: Option<String>) -> Result<()> {
    let repo = session::repository()?;
    let id = CollectionId::from(id);
    if repo.get_collection(&id)?.is_some() {
        bail!("collection '{}' already exists", id);
    }
    let owner = session::acting_user(user).ok();
    repo.put_collection(&Collection {
        id: id.clone(),
        name,
        owner,
        restaurants: Vec::new(),
        created_at: Utc::now(),
    })?;
    println!("Created collection {}", id);
    Ok(())
}

pub fn add(collection: String, restaurant: String, external: bool) -> Result<()> {
    let repo = session::repository()?;
    let collection = CollectionId::from(collection);

    let reference = if external {
        RestaurantRef::External {
            external_id: restaurant,
        }
    } else {
        let id = RestaurantId::from(restaurant);
        if repo.get_restaurant(&id)?.is_none() {
            bail!(
                "restaurant '{}' not found; register it with `munch restaurant add`",
                id
            );
        }
        RestaurantRef::Plain(id)
    };

    let updated = repo
        .add_to_collection(&collection, reference)
        .with_context(|| format!("failed to update collection '{}'", collection))?;
    println!(
        "Collection {} now has {} restaurant{}",
        updated.id,
        updated.restaurants.len(),
        if updated.restaurants.len() == 1 { "" } else { "s" }
    );
    Ok(())
}

pub fn show(id: String, json: bool) -> Result<()> {
    let repo = session::repository()?;
    let id = CollectionId::from(id);
    let collection = repo
        .get_collection(&id)?
        .with_context(|| format!("collection '{}' not found", id))?;
    let members = repo.get_restaurants_in_collection(&id)?;

    if json {
        let output = serde_json::json!({
            "collection": collection,
            "restaurants": members,
        });
        return session::print_json(&output);
    }

    println!("collection {}", collection.id);
    println!("Name:    {}", collection.name);
    if let Some(owner) = &collection.owner {
        println!("Owner:   {}", owner);
    }
    println!("Created: {}", collection.created_at.format("%Y-%m-%d %H:%M:%S %Z"));
    println!();
    if members.is_empty() {
        println!("No restaurants yet");
    }
    for member in &members {
        match repo.get_restaurant(member)? {
            Some(r) => println!("  - {}  {}", r.id, r.name),
            None => println!("  - {}", member),
        }
    }
    let unresolved = collection.restaurants.len().saturating_sub(members.len());
    if unresolved > 0 {
        println!();
        println!("{} reference(s) could not be resolved", unresolved);
    }
    Ok(())
}
