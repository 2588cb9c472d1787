use crate::session;
use anyhow::{anyhow, Context, Result};
use munch_core::model::{CollectionId, DecisionMethod, GroupId, UserId};
use munch_store::DecisionStore;

pub fn start(
    collection: String,
    group: String,
    participants: Vec<String>,
    method: String,
    deadline_hours: i64,
    visit_date: Option<String>,
    json: bool,
) -> Result<()> {
    let engine = session::engine()?;
    let method = DecisionMethod::parse(&method)
        .ok_or_else(|| anyhow!("unknown method '{}': expected tiered or random", method))?;
    let visit_date = session::parse_when(visit_date.as_deref())?;
    let group = GroupId::from(group);

    let participants: Vec<UserId> = if participants.is_empty() {
        let found = engine
            .store()
            .get_group(&group)?
            .with_context(|| format!("group '{}' not found", group))?;
        found.admins.into_iter().chain(found.members).collect()
    } else {
        participants.into_iter().map(UserId::from).collect()
    };

    let decision = engine.create_group_decision(
        &CollectionId::from(collection),
        &group,
        participants,
        method,
        visit_date,
        deadline_hours,
    )?;

    if json {
        return session::print_json(&decision);
    }
    println!(
        "Started {} decision {} for group {}",
        decision.method,
        decision.id.short(),
        group
    );
    let participants: Vec<&str> = decision.participants.iter().map(|p| p.as_str()).collect();
    println!("Participants: {}", participants.join(", "));
    println!("Deadline:     {}", decision.deadline.format("%Y-%m-%d %H:%M:%S %Z"));
    Ok(())
}
