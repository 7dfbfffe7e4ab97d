//! The player-command interpreter.
//!
//! One verb per input line, validated strictly before any mutation. A
//! rejected command reports its reason through the presenter and changes
//! nothing; only engine-level failures (corrupt data, unresolvable ids)
//! abort the turn loop.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use cw_core::{Direction, WorldError, WorldRegistry, normalize_id};

use crate::dialogue::{ASSISTANT_NAME_KEY, DialogueGraph, DialogueRunner};
use crate::error::{CommandError, EngineError, EngineResult};
use crate::presenter::{LineKind, LineStyle, Presenter};
use crate::save::SaveManager;
use crate::session::SessionState;

/// Speaker name used for engine messages when no assistant is named yet.
const FALLBACK_SPEAKER: &str = "Assistant";
/// Speaker category used for engine messages.
const SYSTEM_CATEGORY: &str = "helper";

/// The closed set of player verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Take an item from the current room.
    PickUp,
    /// List the available commands.
    Help,
    /// Jump to a random whitelisted room.
    Teleport,
    /// Walk through an exit.
    Move,
    /// Examine the current room or a carried item.
    Analyze,
    /// Set down the top inventory item.
    Drop,
    /// List the carried items.
    Inventory,
    /// Apply the top inventory item to an adjacent door.
    Use,
    /// Write a numbered save file.
    Save,
    /// Restore a named save file.
    Load,
    /// Consult the ship chart.
    Map,
}

impl Verb {
    /// Match a lowercased token against the verb's trigger and aliases.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "take" | "pickup" | "pick" | "grab" => Some(Self::PickUp),
            "help" | "?" | "commands" => Some(Self::Help),
            "teleport" | "tp" | "warp" => Some(Self::Teleport),
            "move" | "go" | "walk" | "head" => Some(Self::Move),
            "analyze" | "analyse" | "examine" | "inspect" => Some(Self::Analyze),
            "drop" | "discard" => Some(Self::Drop),
            "inventory" | "inv" | "i" => Some(Self::Inventory),
            "use" | "apply" => Some(Self::Use),
            "save" => Some(Self::Save),
            "load" | "restore" => Some(Self::Load),
            "map" | "chart" => Some(Self::Map),
            _ => None,
        }
    }
}

/// A parsed input line: one verb plus an optional argument.
///
/// Everything after the verb is concatenated without separators and
/// lowercased, so "take Access Code" carries the argument "accesscode".
/// Id normalization makes that match the item "access_code".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// The recognized verb.
    pub verb: Verb,
    /// The concatenated, lowercased argument, if any tokens followed.
    pub arg: Option<String>,
}

/// Split an input line into a [`ParsedCommand`].
pub fn parse_line(input: &str) -> Result<ParsedCommand, CommandError> {
    let mut tokens = input.split_whitespace();
    let first = tokens.next().ok_or(CommandError::CommandNotRecognized)?;
    let verb = Verb::parse(&first.to_lowercase()).ok_or(CommandError::CommandNotRecognized)?;

    let arg: String = tokens.collect::<Vec<_>>().concat().to_lowercase();
    Ok(ParsedCommand {
        verb,
        arg: if arg.is_empty() { None } else { Some(arg) },
    })
}

/// Help-screen metadata for one verb, authored alongside the world data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CommandHelp {
    /// Primary trigger word.
    pub trigger: String,
    /// Alternative trigger words.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// One-line usage description.
    pub help: String,
}

/// A scripted dialogue fired the first time the player enters a room.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RoomTrigger {
    /// Room whose first entry fires the trigger.
    pub room: String,
    /// Dialogue node to run.
    pub dialogue: String,
    /// One-time event id guarding the trigger.
    pub event: String,
}

/// Static configuration of the interpreter, authored alongside the world.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InterpreterConfig {
    /// Directory save files are written to.
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,
    /// Rooms the teleport verb may land in.
    #[serde(default)]
    pub teleport_rooms: Vec<String>,
    /// Item that must be carried for the teleport verb to exist.
    #[serde(default)]
    pub teleport_item: Option<String>,
    /// Item that must be carried to consult the chart. None means ungated.
    #[serde(default)]
    pub map_item: Option<String>,
    /// Key item that goes dead after one successful use, if any.
    #[serde(default)]
    pub exhaustible_key: Option<String>,
    /// First-entry dialogues per room.
    #[serde(default)]
    pub triggers: Vec<RoomTrigger>,
    /// Help-screen entries.
    #[serde(default)]
    pub commands: Vec<CommandHelp>,
    /// Pacing delay between dialogue lines, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub dialogue_delay_ms: u64,
    /// Seed for the teleport room picker.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Room a new game starts in.
    #[serde(default)]
    pub start_room: Option<String>,
    /// Dialogue run once when a new game begins.
    #[serde(default)]
    pub intro_dialogue: Option<String>,
    /// Inventory weight capacity for new sessions, in kilograms.
    #[serde(default = "default_capacity")]
    pub inventory_capacity: f64,
}

fn default_save_dir() -> PathBuf {
    PathBuf::from("saves")
}

fn default_delay_ms() -> u64 {
    500
}

fn default_seed() -> u64 {
    42
}

fn default_capacity() -> f64 {
    30.0
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
            teleport_rooms: Vec::new(),
            teleport_item: None,
            map_item: None,
            exhaustible_key: None,
            triggers: Vec::new(),
            commands: Vec::new(),
            dialogue_delay_ms: default_delay_ms(),
            seed: default_seed(),
            start_room: None,
            intro_dialogue: None,
            inventory_capacity: default_capacity(),
        }
    }
}

impl InterpreterConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Executes parsed player commands against the session and the world.
#[derive(Debug)]
pub struct CommandInterpreter {
    config: InterpreterConfig,
    runner: DialogueRunner,
    save: SaveManager,
    rng: StdRng,
}

impl CommandInterpreter {
    /// Create an interpreter from its static configuration.
    pub fn new(config: InterpreterConfig) -> Self {
        let runner = DialogueRunner::new(config.dialogue_delay_ms);
        let save = SaveManager::new(config.save_dir.clone());
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            runner,
            save,
            rng,
        }
    }

    /// The interpreter's static configuration.
    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Execute one input line.
    ///
    /// Returns `Ok(true)` if the command succeeded, `Ok(false)` if it was
    /// rejected (the reason has already been reported to the presenter),
    /// and `Err` only for fatal engine failures.
    pub fn execute(
        &mut self,
        input: &str,
        session: &mut SessionState,
        world: &mut WorldRegistry,
        graph: &DialogueGraph,
        presenter: &mut dyn Presenter,
    ) -> EngineResult<bool> {
        match self.dispatch(input, session, world, graph, presenter) {
            Ok(()) => Ok(true),
            Err(CommandError::Engine(err)) => Err(err),
            Err(rejection) => {
                log::debug!("command rejected: {rejection}");
                self.say(session, presenter, &rejection.to_string());
                Ok(false)
            }
        }
    }

    /// Present the player's arrival in the current room.
    ///
    /// The first visit gets the full description, later visits a short
    /// one. The visit is then recorded and, if a first-entry trigger is
    /// configured and has not fired, its dialogue runs. A trigger naming a
    /// missing dialogue is logged and skipped rather than aborting the
    /// arrival.
    pub fn arrive(
        &mut self,
        session: &mut SessionState,
        world: &mut WorldRegistry,
        graph: &DialogueGraph,
        presenter: &mut dyn Presenter,
    ) -> Result<(), CommandError> {
        let room_id = session.current_room.clone();
        let first_visit = !session.has_visited(&room_id);
        let text = describe_room(world, &room_id, first_visit)
            .ok_or_else(|| EngineError::from(WorldError::UnknownRoom(room_id.clone())))?;
        self.say(session, presenter, &text);
        session.visit(&room_id);

        let trigger = self
            .config
            .triggers
            .iter()
            .find(|t| normalize_id(&t.room) == normalize_id(&room_id))
            .cloned();
        if let Some(trigger) = trigger {
            if session.activate_event(&trigger.event) {
                match self
                    .runner
                    .run(graph, &trigger.dialogue, session, world, presenter)
                {
                    Err(EngineError::DialogueNotFound(id)) => {
                        log::warn!("room trigger for \"{room_id}\" names missing dialogue \"{id}\"");
                    }
                    other => other?,
                }
            }
        }
        Ok(())
    }

    fn dispatch(
        &mut self,
        input: &str,
        session: &mut SessionState,
        world: &mut WorldRegistry,
        graph: &DialogueGraph,
        presenter: &mut dyn Presenter,
    ) -> Result<(), CommandError> {
        let parsed = parse_line(input)?;
        log::debug!("dispatching {:?} arg {:?}", parsed.verb, parsed.arg);
        let arg = parsed.arg.as_deref();
        match parsed.verb {
            Verb::PickUp => self.do_pick_up(required(arg)?, session, world, presenter),
            Verb::Help => self.do_help(session, presenter),
            Verb::Teleport => self.do_teleport(session, world, graph, presenter),
            Verb::Move => self.do_move(required(arg)?, session, world, graph, presenter),
            Verb::Analyze => self.do_analyze(arg, session, world, presenter),
            Verb::Drop => self.do_drop(session, world, presenter),
            Verb::Inventory => self.do_inventory(session, world, presenter),
            Verb::Use => self.do_use(required(arg)?, session, world, presenter),
            Verb::Save => self.do_save(session, world, presenter),
            Verb::Load => self.do_load(required(arg)?, session, world, graph, presenter),
            Verb::Map => self.do_map(session, world, presenter),
        }
    }

    fn do_pick_up(
        &mut self,
        arg: &str,
        session: &mut SessionState,
        world: &mut WorldRegistry,
        presenter: &mut dyn Presenter,
    ) -> Result<(), CommandError> {
        let item = world.find_item(arg).ok_or(CommandError::ItemNotFound)?;
        let item_id = item.id.clone();
        let item_name = item.name.clone();
        let pickable = item.pickable;
        let weight = item.weight();

        let room_id = session.current_room.clone();
        let room = world
            .find_room(&room_id)
            .ok_or_else(|| EngineError::from(WorldError::UnknownRoom(room_id.clone())))?;
        if !room.contains_item(&item_id) {
            return Err(CommandError::ItemNotInRoom);
        }
        if !pickable {
            return Err(CommandError::ItemNotPickable);
        }
        if session.inventory.current_load(world) + weight > session.inventory.capacity() {
            return Err(CommandError::InventoryFull);
        }

        if !session.inventory.pick_up(world, &room_id, &item_id) {
            return Err(CommandError::ItemNotInRoom);
        }
        self.say(session, presenter, &format!("You take the {item_name}."));
        Ok(())
    }

    fn do_drop(
        &mut self,
        session: &mut SessionState,
        world: &mut WorldRegistry,
        presenter: &mut dyn Presenter,
    ) -> Result<(), CommandError> {
        let top = session
            .inventory
            .top()
            .ok_or(CommandError::ItemNotInInventory)?
            .to_string();
        let name = world
            .find_item(&top)
            .map_or_else(|| top.clone(), |item| item.name.clone());

        let room_id = session.current_room.clone();
        if !session.inventory.drop_top(world, &room_id) {
            return Err(EngineError::from(WorldError::UnknownRoom(room_id)).into());
        }
        self.say(session, presenter, &format!("You set down the {name}."));
        Ok(())
    }

    fn do_inventory(
        &mut self,
        session: &mut SessionState,
        world: &mut WorldRegistry,
        presenter: &mut dyn Presenter,
    ) -> Result<(), CommandError> {
        if session.inventory.is_empty() {
            self.say(session, presenter, "You are carrying nothing.");
            return Ok(());
        }
        let load = session.inventory.current_load(world);
        let capacity = session.inventory.capacity();
        let mut text = format!("Carrying ({load:.1}/{capacity:.1} kg):");
        for (index, id) in session.inventory.items().iter().enumerate() {
            let name = world
                .find_item(id)
                .map_or_else(|| id.clone(), |item| item.name.clone());
            if index == 0 {
                text.push_str(&format!("\n  {name} (top)"));
            } else {
                text.push_str(&format!("\n  {name}"));
            }
        }
        self.say(session, presenter, &text);
        Ok(())
    }

    fn do_analyze(
        &mut self,
        arg: Option<&str>,
        session: &mut SessionState,
        world: &mut WorldRegistry,
        presenter: &mut dyn Presenter,
    ) -> Result<(), CommandError> {
        match arg {
            None => {
                // Drift guard: the resolved room must be the session's room.
                let room = world
                    .find_room(&session.current_room)
                    .ok_or(CommandError::NotInThisRoom)?;
                if normalize_id(&room.id) != normalize_id(&session.current_room) {
                    return Err(CommandError::NotInThisRoom);
                }
                let text = describe_room(world, &session.current_room, true)
                    .ok_or(CommandError::NotInThisRoom)?;
                self.say(session, presenter, &text);
            }
            Some(arg) => {
                let item = world.find_item(arg).ok_or(CommandError::ItemNotFound)?;
                if !session.inventory.contains(&item.id) {
                    return Err(CommandError::ItemNotInInventory);
                }
                if !item.analyzable {
                    return Err(CommandError::ItemNotAnalyzable);
                }
                let text = format!(
                    "{}: {} Weight: {} kg.",
                    item.name,
                    item.description,
                    item.weight()
                );
                self.say(session, presenter, &text);
            }
        }
        Ok(())
    }

    fn do_move(
        &mut self,
        arg: &str,
        session: &mut SessionState,
        world: &mut WorldRegistry,
        graph: &DialogueGraph,
        presenter: &mut dyn Presenter,
    ) -> Result<(), CommandError> {
        let direction = Direction::parse(arg).ok_or(CommandError::ArgumentInvalid)?;
        let current = world
            .find_room(&session.current_room)
            .ok_or_else(|| EngineError::from(WorldError::UnknownRoom(session.current_room.clone())))?;
        let target_id = current
            .exit(direction)
            .ok_or(CommandError::RoomNotFound)?
            .to_string();
        let target = world
            .find_room(&target_id)
            .ok_or_else(|| EngineError::from(WorldError::UnknownRoom(target_id.clone())))?;
        if target.locked {
            let required = match &target.unlock_key {
                Some(key) => world
                    .find_item(key)
                    .map_or_else(|| key.clone(), |item| item.name.clone()),
                None => "something you do not have".to_string(),
            };
            return Err(CommandError::RoomLocked { required });
        }

        session.current_room = target.id.clone();
        log::info!("moved {} to \"{}\"", direction.name(), session.current_room);
        self.arrive(session, world, graph, presenter)
    }

    fn do_use(
        &mut self,
        arg: &str,
        session: &mut SessionState,
        world: &mut WorldRegistry,
        presenter: &mut dyn Presenter,
    ) -> Result<(), CommandError> {
        let direction = Direction::parse(arg).ok_or(CommandError::ArgumentInvalid)?;
        let current = world
            .find_room(&session.current_room)
            .ok_or_else(|| EngineError::from(WorldError::UnknownRoom(session.current_room.clone())))?;
        let target_id = current
            .exit(direction)
            .ok_or(CommandError::RoomNotFound)?
            .to_string();

        let top = session
            .inventory
            .top()
            .ok_or(CommandError::ItemNotInInventory)?
            .to_string();
        let key = world
            .find_item(&top)
            .ok_or_else(|| EngineError::from(WorldError::UnknownItem(top.clone())))?;
        if !key.usable {
            return Err(CommandError::ItemNotUsable);
        }
        let key_id = key.id.clone();
        let key_name = key.name.clone();

        let target = world
            .find_room(&target_id)
            .ok_or_else(|| EngineError::from(WorldError::UnknownRoom(target_id.clone())))?;
        if !target.locked {
            return Err(CommandError::RoomNotLocked);
        }
        let matches = target
            .unlock_key
            .as_deref()
            .is_some_and(|required| normalize_id(required) == normalize_id(&key_id));
        if !matches {
            return Err(CommandError::IncompatibleKey);
        }
        let target_name = target.name.clone();

        world
            .find_room_mut(&target_id)
            .ok_or_else(|| EngineError::from(WorldError::UnknownRoom(target_id.clone())))?
            .locked = false;
        log::info!("room \"{target_id}\" unlocked with \"{key_id}\"");
        self.say(
            session,
            presenter,
            &format!("You unlock {target_name} with the {key_name}."),
        );

        let exhausted = self
            .config
            .exhaustible_key
            .as_deref()
            .is_some_and(|id| normalize_id(id) == normalize_id(&key_id));
        if exhausted {
            if let Some(item) = world.find_item_mut(&key_id) {
                item.usable = false;
            }
            self.say(
                session,
                presenter,
                &format!("The {key_name} sparks once and goes dead."),
            );
        }
        Ok(())
    }

    fn do_teleport(
        &mut self,
        session: &mut SessionState,
        world: &mut WorldRegistry,
        graph: &DialogueGraph,
        presenter: &mut dyn Presenter,
    ) -> Result<(), CommandError> {
        // Without the device the verb stays hidden: the rejection is the
        // same one an unknown word gets.
        let device_held = self
            .config
            .teleport_item
            .as_deref()
            .is_some_and(|id| session.inventory.contains(id));
        if !device_held {
            return Err(CommandError::CommandNotRecognized);
        }

        let candidates: Vec<String> = self
            .config
            .teleport_rooms
            .iter()
            .filter_map(|id| world.find_room(id).map(|room| room.id.clone()))
            .collect();
        if candidates.is_empty() {
            return Err(CommandError::RoomNotFound);
        }
        let picked = &candidates[self.rng.random_range(0..candidates.len())];

        session.current_room = picked.clone();
        log::info!("teleported to \"{picked}\"");
        self.say(session, presenter, "The deck lurches. You are elsewhere.");
        self.arrive(session, world, graph, presenter)
    }

    fn do_map(
        &mut self,
        session: &mut SessionState,
        world: &mut WorldRegistry,
        presenter: &mut dyn Presenter,
    ) -> Result<(), CommandError> {
        let chart_held = match self.config.map_item.as_deref() {
            Some(id) => session.inventory.contains(id),
            None => true,
        };
        if !chart_held {
            return Err(CommandError::ItemNotInInventory);
        }

        let mut text = describe_room(world, &session.current_room, false)
            .ok_or_else(|| EngineError::from(WorldError::UnknownRoom(session.current_room.clone())))?;
        let total = world.rooms().count();
        let charted = session.visited_rooms.len();
        text.push_str(&format!("\nCharted: {charted} of {total} rooms."));
        self.say(session, presenter, &text);
        Ok(())
    }

    fn do_help(
        &mut self,
        session: &mut SessionState,
        presenter: &mut dyn Presenter,
    ) -> Result<(), CommandError> {
        let device_held = self
            .config
            .teleport_item
            .as_deref()
            .is_some_and(|id| session.inventory.contains(id));

        let mut text = String::from("Available commands:");
        for entry in &self.config.commands {
            let is_teleport = Verb::parse(&entry.trigger.to_lowercase()) == Some(Verb::Teleport);
            if is_teleport && !device_held {
                continue;
            }
            if entry.aliases.is_empty() {
                text.push_str(&format!("\n  {} - {}", entry.trigger, entry.help));
            } else {
                text.push_str(&format!(
                    "\n  {} ({}) - {}",
                    entry.trigger,
                    entry.aliases.join(", "),
                    entry.help
                ));
            }
        }
        self.say(session, presenter, &text);
        Ok(())
    }

    fn do_save(
        &mut self,
        session: &mut SessionState,
        world: &mut WorldRegistry,
        presenter: &mut dyn Presenter,
    ) -> Result<(), CommandError> {
        let path = self.save.save(session, world).map_err(CommandError::from)?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        self.say(session, presenter, &format!("Progress saved to {name}."));
        Ok(())
    }

    fn do_load(
        &mut self,
        arg: &str,
        session: &mut SessionState,
        world: &mut WorldRegistry,
        graph: &DialogueGraph,
        presenter: &mut dyn Presenter,
    ) -> Result<(), CommandError> {
        let path = self.save.path_for(arg);
        if !path.exists() {
            return Err(CommandError::SaveFileNotFound);
        }
        self.save
            .load(&path, session, world)
            .map_err(CommandError::from)?;
        self.say(session, presenter, &format!("Save {arg} restored."));
        self.arrive(session, world, graph, presenter)
    }

    /// Voice an engine message through the assistant.
    fn say(&self, session: &SessionState, presenter: &mut dyn Presenter, text: &str) {
        let speaker = session
            .placeholder(ASSISTANT_NAME_KEY)
            .unwrap_or(FALLBACK_SPEAKER);
        let style = LineStyle {
            category: SYSTEM_CATEGORY,
            kind: LineKind::System,
        };
        presenter.display(speaker, style, text);
    }
}

/// Missing-argument guard shared by the verbs that need one.
fn required(arg: Option<&str>) -> Result<&str, CommandError> {
    arg.ok_or(CommandError::ArgumentInvalid)
}

/// Render a room for the player.
///
/// The full form carries the long description and the ground items; both
/// forms list the exits with their lock state.
fn describe_room(world: &WorldRegistry, room_id: &str, full: bool) -> Option<String> {
    let room = world.find_room(room_id)?;
    let mut out = if full {
        format!("You are in {}. {}", room.name, room.description)
    } else {
        format!("You are back in {}.", room.name)
    };
    for (direction, target_id) in room.exits() {
        let Some(target) = world.find_room(target_id) else {
            continue;
        };
        let lock = if target.locked { " (locked)" } else { "" };
        out.push_str(&format!(
            "\nTo the {} lies {}{}.",
            direction.name(),
            target.name,
            lock
        ));
    }
    if full && !room.items().is_empty() {
        let names: Vec<&str> = room
            .items()
            .iter()
            .filter_map(|id| world.find_item(id))
            .map(|item| item.name.as_str())
            .collect();
        out.push_str(&format!("\nOn the ground: {}.", names.join(", ")));
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::ScriptedPresenter;
    use cw_core::{Item, Room};
    use std::path::Path;

    fn test_world() -> WorldRegistry {
        let mut world = WorldRegistry::new();
        let items = [
            Item::new("access_code", "Access Code", "A scratched code card.", 1.0)
                .unwrap()
                .pickable()
                .analyzable(),
            Item::new("key_1", "Keycard Level 1", "Opens level 1 doors.", 1.0)
                .unwrap()
                .pickable()
                .usable(),
            Item::new("key_10", "Keycard Level 10", "A single-use magnetic key.", 1.0)
                .unwrap()
                .pickable()
                .usable(),
            Item::new("holomap", "Holomap", "Projects the deck layout.", 0.5)
                .unwrap()
                .pickable(),
            Item::new("warp_device", "Warp Device", "Hums quietly.", 2.0)
                .unwrap()
                .pickable(),
            Item::new("anvil", "Anvil", "Too heavy to reason about.", 50.0)
                .unwrap()
                .pickable(),
            Item::new("bolted_console", "Bolted Console", "Part of the ship.", 5.0).unwrap(),
        ];
        for item in items {
            world.add_item(item).unwrap();
        }
        world
            .add_room(
                Room::new("cryo_bay", "Cryo Bay", "Frost coats the pods.")
                    .with_exit(Direction::North, "corridor")
                    .with_item("access_code")
                    .with_item("key_1")
                    .with_item("key_10")
                    .with_item("holomap")
                    .with_item("warp_device")
                    .with_item("anvil")
                    .with_item("bolted_console"),
            )
            .unwrap();
        world
            .add_room(
                Room::new("corridor", "Corridor", "A long service corridor.")
                    .with_exit(Direction::South, "cryo_bay")
                    .with_exit(Direction::North, "vault")
                    .with_exit(Direction::East, "armory"),
            )
            .unwrap();
        world
            .add_room(
                Room::new("vault", "Vault", "Sealed crates everywhere.")
                    .locked_by("key_1")
                    .with_exit(Direction::South, "corridor"),
            )
            .unwrap();
        world
            .add_room(
                Room::new("armory", "Armory", "Racks stripped bare.")
                    .locked_by("key_10")
                    .with_exit(Direction::West, "corridor"),
            )
            .unwrap();
        world
    }

    fn test_config(dir: &Path) -> InterpreterConfig {
        InterpreterConfig {
            save_dir: dir.to_path_buf(),
            teleport_rooms: vec!["corridor".to_string()],
            teleport_item: Some("warp_device".to_string()),
            map_item: Some("holomap".to_string()),
            exhaustible_key: Some("key_10".to_string()),
            triggers: vec![RoomTrigger {
                room: "corridor".to_string(),
                dialogue: "corridor_intro".to_string(),
                event: "corridor_seen".to_string(),
            }],
            commands: vec![
                CommandHelp {
                    trigger: "move".to_string(),
                    aliases: vec!["go".to_string()],
                    help: "Move in a direction.".to_string(),
                },
                CommandHelp {
                    trigger: "teleport".to_string(),
                    aliases: vec!["tp".to_string()],
                    help: "Warp somewhere reachable.".to_string(),
                },
            ],
            dialogue_delay_ms: 0,
            seed: 42,
            start_room: Some("cryo_bay".to_string()),
            intro_dialogue: None,
            inventory_capacity: 30.0,
        }
    }

    fn test_graph() -> DialogueGraph {
        DialogueGraph::from_json(
            r#"[{"id": "corridor_intro", "speaker": "AX-7", "category": "helper",
                 "text": "Something moved down here once."}]"#,
        )
        .unwrap()
    }

    fn test_session() -> SessionState {
        let mut session = SessionState::new("Rook", 30.0, "cryo_bay").unwrap();
        session.set_placeholder(ASSISTANT_NAME_KEY, "AX-7");
        session
    }

    struct Fixture {
        interp: CommandInterpreter,
        session: SessionState,
        world: WorldRegistry,
        graph: DialogueGraph,
        presenter: ScriptedPresenter,
        _dir: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        Fixture {
            interp: CommandInterpreter::new(test_config(dir.path())),
            session: test_session(),
            world: test_world(),
            graph: test_graph(),
            presenter: ScriptedPresenter::new(),
            _dir: dir,
        }
    }

    impl Fixture {
        fn run(&mut self, input: &str) -> bool {
            self.interp
                .execute(
                    input,
                    &mut self.session,
                    &mut self.world,
                    &self.graph,
                    &mut self.presenter,
                )
                .unwrap()
        }

        fn err(&mut self, input: &str) -> CommandError {
            self.interp
                .dispatch(
                    input,
                    &mut self.session,
                    &mut self.world,
                    &self.graph,
                    &mut self.presenter,
                )
                .unwrap_err()
        }
    }

    #[test]
    fn parse_concatenates_and_lowercases_argument() {
        let parsed = parse_line("take Access Code").unwrap();
        assert_eq!(parsed.verb, Verb::PickUp);
        assert_eq!(parsed.arg.as_deref(), Some("accesscode"));

        let parsed = parse_line("INV").unwrap();
        assert_eq!(parsed.verb, Verb::Inventory);
        assert_eq!(parsed.arg, None);
    }

    #[test]
    fn unknown_input_is_rejected() {
        let mut f = fixture();
        assert!(matches!(f.err(""), CommandError::CommandNotRecognized));
        assert!(matches!(
            f.err("frobnicate"),
            CommandError::CommandNotRecognized
        ));
        // The rejection is reported, not fatal.
        assert!(!f.run("frobnicate"));
        assert!(f.presenter.transcript().contains("don't know that command"));
    }

    #[test]
    fn take_moves_item_from_room_to_stack() {
        let mut f = fixture();
        assert!(f.run("take Access Code"));
        assert_eq!(f.session.inventory.top(), Some("access_code"));
        assert!(
            !f.world
                .find_room("cryo_bay")
                .unwrap()
                .contains_item("access_code")
        );

        // Already carried: the room no longer has it.
        assert!(matches!(
            f.err("take access code"),
            CommandError::ItemNotInRoom
        ));
    }

    #[test]
    fn take_validates_before_moving() {
        let mut f = fixture();
        assert!(matches!(f.err("take ghost"), CommandError::ItemNotFound));
        assert!(matches!(
            f.err("take bolted console"),
            CommandError::ItemNotPickable
        ));
        assert!(matches!(f.err("take anvil"), CommandError::InventoryFull));
        assert!(f.session.inventory.is_empty());
    }

    #[test]
    fn move_describes_fully_once_then_briefly() {
        let mut f = fixture();
        assert!(f.run("go north"));
        assert_eq!(f.session.current_room, "corridor");
        assert!(f.presenter.transcript().contains("A long service corridor."));

        assert!(f.run("go south"));
        f.presenter.lines.clear();
        assert!(f.run("go north"));
        let revisit = f.presenter.transcript();
        assert!(revisit.contains("You are back in Corridor."));
        assert!(!revisit.contains("A long service corridor."));
    }

    #[test]
    fn trigger_dialogue_fires_on_first_entry_only() {
        let mut f = fixture();
        assert!(f.run("go north"));
        assert!(
            f.presenter
                .transcript()
                .contains("Something moved down here once.")
        );

        assert!(f.run("go south"));
        f.presenter.lines.clear();
        assert!(f.run("go north"));
        assert!(
            !f.presenter
                .transcript()
                .contains("Something moved down here once.")
        );
    }

    #[test]
    fn missing_trigger_dialogue_is_not_fatal() {
        let mut f = fixture();
        f.interp.config.triggers[0].dialogue = "ghost_dialogue".to_string();

        assert!(f.run("go north"));
        assert_eq!(f.session.current_room, "corridor");
        assert!(f.presenter.transcript().contains("Corridor"));
    }

    #[test]
    fn locked_room_blocks_movement_and_names_the_key() {
        let mut f = fixture();
        assert!(f.run("go north"));
        match f.err("go north") {
            CommandError::RoomLocked { required } => assert_eq!(required, "Keycard Level 1"),
            other => panic!("unexpected: {other}"),
        }
        assert_eq!(f.session.current_room, "corridor");
    }

    #[test]
    fn use_unlocks_matching_door_once() {
        let mut f = fixture();
        assert!(f.run("take key 1"));
        assert!(f.run("go north"));

        assert!(f.run("use north"));
        assert!(!f.world.find_room("vault").unwrap().locked);
        assert!(f.presenter.transcript().contains("You unlock Vault"));

        assert!(matches!(f.err("use north"), CommandError::RoomNotLocked));
        // And the door stays open for movement.
        assert!(f.run("go north"));
        assert_eq!(f.session.current_room, "vault");
    }

    #[test]
    fn use_validates_in_order() {
        let mut f = fixture();
        assert!(f.run("go north"));

        assert!(matches!(f.err("use vault"), CommandError::ArgumentInvalid));
        assert!(matches!(f.err("use west"), CommandError::RoomNotFound));
        assert!(matches!(
            f.err("use north"),
            CommandError::ItemNotInInventory
        ));

        assert!(f.run("go south"));
        assert!(f.run("take access code"));
        assert!(f.run("go north"));
        assert!(matches!(f.err("use north"), CommandError::ItemNotUsable));
    }

    #[test]
    fn wrong_key_is_incompatible() {
        let mut f = fixture();
        assert!(f.run("take key 1"));
        assert!(f.run("go north"));

        // The armory needs key_10; key_1 is on top.
        assert!(matches!(f.err("use east"), CommandError::IncompatibleKey));
        assert!(f.world.find_room("armory").unwrap().locked);
    }

    #[test]
    fn exhaustible_key_goes_dead_after_one_use() {
        let mut f = fixture();
        assert!(f.run("take key 10"));
        assert!(f.run("go north"));

        assert!(f.run("use east"));
        assert!(!f.world.find_room("armory").unwrap().locked);
        assert!(!f.world.find_item("key_10").unwrap().usable);
        assert!(f.presenter.transcript().contains("goes dead"));

        // A second unlock attempt with the dead key is refused.
        f.world.find_room_mut("vault").unwrap().locked = true;
        assert!(matches!(f.err("use north"), CommandError::ItemNotUsable));
    }

    #[test]
    fn teleport_is_hidden_without_the_device() {
        let mut f = fixture();
        assert!(matches!(
            f.err("tp"),
            CommandError::CommandNotRecognized
        ));

        assert!(f.run("take warp device"));
        assert!(f.run("tp"));
        assert_eq!(f.session.current_room, "corridor");
        assert!(f.session.has_visited("corridor"));
    }

    #[test]
    fn help_lists_teleport_only_with_the_device() {
        let mut f = fixture();
        assert!(f.run("help"));
        let hidden = f.presenter.transcript();
        assert!(hidden.contains("move (go)"));
        assert!(!hidden.contains("teleport"));

        assert!(f.run("take warp device"));
        f.presenter.lines.clear();
        assert!(f.run("help"));
        assert!(f.presenter.transcript().contains("teleport (tp)"));
    }

    #[test]
    fn map_requires_the_chart_item() {
        let mut f = fixture();
        assert!(matches!(f.err("map"), CommandError::ItemNotInInventory));

        assert!(f.run("take holomap"));
        assert!(f.run("go north"));
        assert!(f.run("map"));
        assert!(f.presenter.transcript().contains("Charted: 1 of 4 rooms."));
    }

    #[test]
    fn analyze_room_and_item() {
        let mut f = fixture();
        assert!(f.run("analyze"));
        assert!(f.presenter.transcript().contains("Frost coats the pods."));

        assert!(matches!(
            f.err("analyze access code"),
            CommandError::ItemNotInInventory
        ));
        assert!(f.run("take access code"));
        f.presenter.lines.clear();
        assert!(f.run("analyze access code"));
        let text = f.presenter.transcript();
        assert!(text.contains("A scratched code card."));
        assert!(text.contains("Weight: 1 kg."));

        assert!(f.run("take holomap"));
        assert!(matches!(
            f.err("analyze holomap"),
            CommandError::ItemNotAnalyzable
        ));
    }

    #[test]
    fn drop_returns_top_item_to_the_room() {
        let mut f = fixture();
        assert!(matches!(f.err("drop"), CommandError::ItemNotInInventory));

        assert!(f.run("take access code"));
        assert!(f.run("go north"));
        assert!(f.run("drop"));
        assert!(f.session.inventory.is_empty());
        assert!(
            f.world
                .find_room("corridor")
                .unwrap()
                .contains_item("access_code")
        );
        assert!(f.presenter.transcript().contains("You set down"));
    }

    #[test]
    fn inventory_lists_top_first() {
        let mut f = fixture();
        assert!(f.run("take key 1"));
        assert!(f.run("take access code"));
        f.presenter.lines.clear();

        assert!(f.run("inventory"));
        let text = f.presenter.transcript();
        assert!(text.contains("Access Code (top)"));
        assert!(text.contains("Keycard Level 1"));
        assert!(text.contains("2.0/30.0 kg"));
    }

    #[test]
    fn save_then_load_restores_the_session() {
        let mut f = fixture();
        assert!(f.run("take access code"));
        assert!(f.run("go north"));
        assert!(f.run("save"));
        assert!(f.interp.save.path_for("save01").exists());

        // Wreck the live state, then restore.
        assert!(f.run("drop"));
        assert!(f.run("go south"));
        assert!(f.run("load save01"));
        assert_eq!(f.session.current_room, "corridor");
        assert_eq!(f.session.inventory.items(), ["access_code"]);
        assert!(
            !f.world
                .find_room("corridor")
                .unwrap()
                .contains_item("access_code")
        );

        assert!(matches!(
            f.err("load nosuch"),
            CommandError::SaveFileNotFound
        ));
    }

    #[test]
    fn config_from_json_with_defaults() {
        let config = InterpreterConfig::from_json(
            r#"{
                "teleportRooms": ["corridor"],
                "teleportItem": "warp_device",
                "triggers": [{"room": "corridor", "dialogue": "d", "event": "e"}]
            }"#,
        )
        .unwrap();
        assert_eq!(config.teleport_rooms, ["corridor"]);
        assert_eq!(config.dialogue_delay_ms, 500);
        assert_eq!(config.save_dir, PathBuf::from("saves"));
        assert!(config.map_item.is_none());
        assert_eq!(config.inventory_capacity, 30.0);
    }
}
