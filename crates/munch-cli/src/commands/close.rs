use crate::session;
use anyhow::Result;

pub fn close(id: String, user: Option<String>, json: bool) -> Result<()> {
    let engine = session::engine()?;
    let user = session::acting_user(user)?;
    let decision_id = session::resolve_id(&engine, &id)?;
    let decision = engine.close_group_decision(&decision_id, &user)?;
    if json {
        return session::print_json(&decision);
    }
    println!("Closed decision {}", decision.id.short());
    Ok(())
}

pub fn expire(id: String, json: bool) -> Result<()> {
    let engine = session::engine()?;
    let decision_id = session::resolve_id(&engine, &id)?;
    let decision = engine.expire_overdue(&decision_id)?;
    if json {
        return session::print_json(&decision);
    }
    println!(
        "Expired decision {} (deadline was {})",
        decision.id.short(),
        decision.deadline.format("%Y-%m-%d %H:%M:%S %Z")
    );
    Ok(())
}
