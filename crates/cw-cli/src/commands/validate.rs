//! Validate a data directory: world integrity plus config cross-references.

use std::path::Path;

use super::{GameData, load_data};

/// Check the data set and print a one-line summary on success.
pub fn run(data: Option<&Path>) -> Result<(), String> {
    let GameData {
        world,
        graph,
        config,
    } = load_data(data)?;

    let mut problems = Vec::new();

    match &config.start_room {
        Some(start) if world.find_room(start).is_none() => {
            problems.push(format!("start room \"{start}\" does not exist"));
        }
        Some(_) => {}
        None => problems.push("no start room configured".to_string()),
    }
    if let Some(intro) = &config.intro_dialogue {
        if graph.get(intro).is_none() {
            problems.push(format!("intro dialogue \"{intro}\" does not exist"));
        }
    }
    for trigger in &config.triggers {
        if world.find_room(&trigger.room).is_none() {
            problems.push(format!("trigger room \"{}\" does not exist", trigger.room));
        }
        if graph.get(&trigger.dialogue).is_none() {
            problems.push(format!(
                "trigger dialogue \"{}\" does not exist",
                trigger.dialogue
            ));
        }
    }
    for room_id in &config.teleport_rooms {
        if world.find_room(room_id).is_none() {
            problems.push(format!("teleport room \"{room_id}\" does not exist"));
        }
    }
    let gating_items = [
        ("teleport item", config.teleport_item.as_deref()),
        ("map item", config.map_item.as_deref()),
        ("exhaustible key", config.exhaustible_key.as_deref()),
    ];
    for (what, id) in gating_items {
        if let Some(id) = id {
            if world.find_item(id).is_none() {
                problems.push(format!("{what} \"{id}\" does not exist"));
            }
        }
    }

    if problems.is_empty() {
        println!(
            "ok: {} rooms, {} items, {} dialogue nodes",
            world.rooms().count(),
            world.items().count(),
            graph.len()
        );
        Ok(())
    } else {
        Err(problems.join("\n"))
    }
}
