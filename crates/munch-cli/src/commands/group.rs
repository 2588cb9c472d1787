use crate::session;
use anyhow::{bail, Result};
use munch_core::model::{Group, GroupId, UserId};
use munch_store::DecisionStore;

pub fn create(
    id: String,
    name: String,
    admins: Vec<String>,
    members: Vec<String>,
    user: Option<String>,
) -> Result<()> {
    let repo = session::repository()?;
    let id = GroupId::from(id);
    if repo.get_group(&id)?.is_some() {
        bail!("group '{}' already exists", id);
    }

    let creator = session::acting_user(user)?;
    let mut admin_ids = vec![creator];
    for admin in admins {
        let admin = UserId::from(admin);
        if !admin_ids.contains(&admin) {
            admin_ids.push(admin);
        }
    }
    let mut member_ids: Vec<UserId> = Vec::new();
    for member in members {
        let member = UserId::from(member);
        if !admin_ids.contains(&member) && !member_ids.contains(&member) {
            member_ids.push(member);
        }
    }

    repo.put_group(&Group {
        id: id.clone(),
        name,
        admins: admin_ids,
        members: member_ids,
    })?;
    println!("Created group {}", id);
    Ok(())
}
