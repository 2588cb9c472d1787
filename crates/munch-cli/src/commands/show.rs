use crate::session;
use anyhow::Result;
use chrono::Utc;
use munch_core::model::DecisionResult;

pub fn run(id: String, json: bool) -> Result<()> {
    let engine = session::engine()?;
    let decision_id = session::resolve_id(&engine, &id)?;
    let decision = engine.get_decision(&decision_id)?;
    let status = decision.status_at(Utc::now());

    if json {
        let output = serde_json::json!({
            "id": decision.id.hex(),
            "status": status,
            "decision": decision,
        });
        return session::print_json(&output);
    }

    println!("decision {}", decision.id.hex());
    println!("Kind:       {} ({})", decision.kind, decision.method);
    println!("Status:     {}", status);
    println!("Collection: {}", decision.collection_id);
    if let Some(group) = &decision.group_id {
        println!("Group:      {}", group);
    }
    println!(
        "Participants: {}",
        decision
            .participants
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Created:    {}", decision.created_at.format("%Y-%m-%d %H:%M:%S %Z"));
    println!("Deadline:   {}", decision.deadline.format("%Y-%m-%d %H:%M:%S %Z"));
    println!("Visit:      {}", decision.visit_date.format("%Y-%m-%d %H:%M:%S %Z"));

    if !decision.ballots.is_empty() {
        println!();
        println!("Ballots:");
        for ballot in &decision.ballots {
            let ranking: Vec<_> = ballot
                .ranked_restaurant_ids
                .iter()
                .map(|r| r.as_str())
                .collect();
            println!("  {}: {}", ballot.user_id, ranking.join(" > "));
        }
    }
    if let Some(result) = &decision.result {
        println!();
        print_result(result);
    }
    Ok(())
}

pub fn print_result(result: &DecisionResult) {
    println!("Selected: {}", result.restaurant_id);
    println!("At:       {}", result.selected_at.format("%Y-%m-%d %H:%M:%S %Z"));
    println!();
    println!("    {}", result.reasoning);
    if !result.weights.is_empty() {
        println!();
        println!("Weights:");
        for (restaurant, weight) in &result.weights {
            println!("  {:<20} {:.2}", restaurant.as_str(), weight);
        }
    }
}
