use crate::session;
use anyhow::Result;
use chrono::Utc;
use munch_core::model::GroupId;

pub fn run(group: String, json: bool) -> Result<()> {
    let engine = session::engine()?;
    let decisions = engine.list_group_decisions(&GroupId::from(group.as_str()))?;
    let now = Utc::now();

    if json {
        let entries: Vec<_> = decisions
            .iter()
            .map(|d| {
                serde_json::json!({
                    "id": d.id.hex(),
                    "status": d.status_at(now),
                    "decision": d,
                })
            })
            .collect();
        return session::print_json(&entries);
    }

    if decisions.is_empty() {
        println!("No decisions yet for group '{}'", group);
        return Ok(());
    }
    for d in &decisions {
        println!(
            "{}  {:<9}  {:<6}  {}  {}",
            d.id.short(),
            d.status_at(now).to_string(),
            d.method.to_string(),
            d.created_at.format("%Y-%m-%d %H:%M"),
            d.selected_restaurant().map(|r| r.as_str()).unwrap_or("-")
        );
    }
    Ok(())
}
