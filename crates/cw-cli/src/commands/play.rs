//! Start or resume a game session.

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use cw_engine::{CommandInterpreter, DialogueRunner, SessionState};

use super::{GameData, load_data};
use crate::console::ConsolePresenter;

/// Run the turn loop until the player quits or input ends.
pub fn run(
    data: Option<&Path>,
    load: Option<&str>,
    saves: Option<&Path>,
    seed: Option<u64>,
    delay: Option<u64>,
) -> Result<(), String> {
    let GameData {
        mut world,
        graph,
        mut config,
    } = load_data(data)?;
    if let Some(dir) = saves {
        config.save_dir = dir.to_path_buf();
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if let Some(delay) = delay {
        config.dialogue_delay_ms = delay;
    }

    let start_room = config
        .start_room
        .clone()
        .ok_or("no start room configured")?;
    if world.find_room(&start_room).is_none() {
        return Err(format!("start room \"{start_room}\" does not exist"));
    }
    let intro = config.intro_dialogue.clone();
    let delay_ms = config.dialogue_delay_ms;
    let capacity = config.inventory_capacity;

    let mut interpreter = CommandInterpreter::new(config);
    let mut presenter = ConsolePresenter::new();
    let mut session =
        SessionState::new("", capacity, start_room).map_err(|e| e.to_string())?;

    match load {
        Some(name) => {
            // Reuse the load verb so the restore path is identical.
            let restored = interpreter
                .execute(
                    &format!("load {name}"),
                    &mut session,
                    &mut world,
                    &graph,
                    &mut presenter,
                )
                .map_err(|e| e.to_string())?;
            if !restored {
                return Err(format!("could not restore save \"{name}\""));
            }
            // Pick the story back up where the snapshot left it.
            let last = session.last_dialogue.clone();
            if let Some(last) = last {
                if graph.get(&last).is_some() {
                    DialogueRunner::new(delay_ms)
                        .run(&graph, &last, &mut session, &mut world, &mut presenter)
                        .map_err(|e| e.to_string())?;
                }
            }
        }
        None => {
            if let Some(intro) = intro {
                DialogueRunner::new(delay_ms)
                    .run(&graph, &intro, &mut session, &mut world, &mut presenter)
                    .map_err(|e| e.to_string())?;
            }
            session.tutorial_completed = true;
            interpreter
                .arrive(&mut session, &mut world, &graph, &mut presenter)
                .map_err(|e| e.to_string())?;
        }
    }

    let stdin = io::stdin();
    loop {
        print!("\n> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "quit" | "exit") {
            println!("{}", "Stay warm out there.".dimmed());
            break;
        }
        interpreter
            .execute(input, &mut session, &mut world, &graph, &mut presenter)
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}
