//! Registry management and dispatch commands

use anyhow::Result;

use super::output::Output;
use super::session::Session;
use crate::domain::CallerId;

pub fn add(output: &Output, session: &mut Session, caller: &CallerId, name: &str) -> Result<()> {
    let handle = session.add(caller, name)?;
    session.save()?;

    let position = session.registry().plugin_count() - 1;
    if output.is_json() {
        output.data(&serde_json::json!({
            "name": name,
            "handle": handle,
            "position": position,
        }));
    } else {
        output.success(&format!(
            "Registered plugin '{}' as {} at position {}",
            name, handle, position
        ));
    }

    Ok(())
}

pub fn remove(
    output: &Output,
    session: &mut Session,
    caller: &CallerId,
    position: usize,
) -> Result<()> {
    let handle = session.remove(caller, position)?;
    session.save()?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "handle": handle,
            "position": position,
        }));
    } else {
        output.success(&format!("Removed plugin {} from position {}", handle, position));
    }

    Ok(())
}

pub fn list(output: &Output, session: &Session) -> Result<()> {
    let entries = session.registry().entries();

    if output.is_json() {
        output.data(&entries);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No plugins registered.");
        return Ok(());
    }

    output.row(&["POSITION", "HANDLE", "NAME"]);
    for entry in entries {
        output.row(&[
            &entry.position.to_string(),
            &entry.handle.to_string(),
            &entry.name,
        ]);
    }

    Ok(())
}

pub fn count(output: &Output, session: &Session) -> Result<()> {
    let count = session.registry().plugin_count();

    if output.is_json() {
        output.data(&serde_json::json!({ "count": count }));
    } else {
        println!("{}", count);
    }

    Ok(())
}

pub fn exec(
    output: &Output,
    session: &Session,
    caller: &CallerId,
    position: usize,
    input: u64,
) -> Result<()> {
    let dispatch = session.execute(caller, position, input)?;
    // A dispatch may have mutated plugin state (e.g. minted a vault)
    session.save()?;

    if output.is_json() {
        output.data(&dispatch);
        return Ok(());
    }

    println!("{}", dispatch.value);
    for notification in &dispatch.notifications {
        println!("  {} {}", notification.topic, notification.payload);
    }

    Ok(())
}

pub fn transfer_admin(
    output: &Output,
    session: &Session,
    caller: &CallerId,
    new_admin: CallerId,
) -> Result<()> {
    session.registry().transfer_admin(caller, new_admin.clone())?;
    session.save()?;

    output.success(&format!("Transferred administration to '{}'", new_admin));

    Ok(())
}
