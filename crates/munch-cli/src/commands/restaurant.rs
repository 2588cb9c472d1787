use crate::session;
use anyhow::{bail, Result};
use munch_core::model::{Restaurant, RestaurantId};

pub fn add(
    id: String,
    name: String,
    external_id: Option<String>,
    cuisine: Option<String>,
) -> Result<()> {
    let repo = session::repository()?;
    let id = RestaurantId::from(id);
    if repo.get_restaurant(&id)?.is_some() {
        bail!("restaurant '{}' already exists", id);
    }
    if let Some(ext) = &external_id {
        if let Some(other) = repo
            .list_restaurants()?
            .into_iter()
            .find(|r| r.external_id.as_deref() == Some(ext.as_str()))
        {
            bail!("external id '{}' already belongs to '{}'", ext, other.id);
        }
    }
    repo.put_restaurant(&Restaurant {
        id: id.clone(),
        name,
        external_id,
        cuisine,
    })?;
    println!("Added restaurant {}", id);
    Ok(())
}

pub fn list(json: bool) -> Result<()> {
    let repo = session::repository()?;
    let mut restaurants = repo.list_restaurants()?;
    restaurants.sort_by(|a, b| a.id.cmp(&b.id));

    if json {
        return session::print_json(&restaurants);
    }
    if restaurants.is_empty() {
        println!("No restaurants yet");
        return Ok(());
    }
    for r in &restaurants {
        let mut line = format!("{}  {}", r.id, r.name);
        if let Some(cuisine) = &r.cuisine {
            line.push_str(&format!(" ({})", cuisine));
        }
        if let Some(ext) = &r.external_id {
            line.push_str(&format!(" [{}]", ext));
        }
        println!("{}", line);
    }
    Ok(())
}
