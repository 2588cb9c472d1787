use crate::session;
use anyhow::Result;
use munch_core::model::CollectionId;

pub fn run(collection: String, json: bool) -> Result<()> {
    let engine = session::engine()?;
    let stats = engine.get_statistics(&CollectionId::from(collection))?;

    if json {
        return session::print_json(&stats);
    }

    println!("collection {}", stats.collection_id);
    println!("Completed decisions: {}", stats.total_decisions);
    println!();
    println!("{:<20} {:>6}  {:>6}  {}", "restaurant", "picks", "weight", "last picked");
    for (restaurant, entry) in &stats.per_restaurant {
        println!(
            "{:<20} {:>6}  {:>6.2}  {}",
            restaurant.as_str(),
            entry.selection_count,
            entry.current_weight,
            entry
                .last_selected
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "never".to_string())
        );
    }
    Ok(())
}
