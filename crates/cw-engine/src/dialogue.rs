//! Branching-dialogue graph and its interpreter.
//!
//! A dialogue is a graph of nodes loaded once at startup. Each node may
//! carry an action (a side effect executed instead of presenting text),
//! then continues either through a player choice or a linear `next` id; a
//! node with neither is terminal. Traversal is assumed to reach a terminal
//! node: cycle safety is a data-authoring contract, not a runtime check.

use std::collections::HashMap;

use serde::Deserialize;

use cw_core::{WorldError, WorldRegistry, normalize_id};

use crate::error::{EngineError, EngineResult};
use crate::presenter::{LineKind, LineStyle, Presenter};
use crate::session::SessionState;
use crate::text::replace_placeholders;

/// Sentinel node id that is never recorded as the last dialogue reached.
pub const WAIT_FOR_COMMAND: &str = "wait_for_command";
/// Sentinel node id marking the end of the story, never recorded either.
pub const END: &str = "end";

/// Placeholder key holding the player's chosen name.
pub const PLAYER_NAME_KEY: &str = "playerName";
/// Placeholder key holding the assistant's chosen name.
pub const ASSISTANT_NAME_KEY: &str = "assistantName";

/// A side effect executed when a node is reached, instead of its text.
///
/// A closed set: authored data can only name these. The input actions use
/// the node's text as the prompt and store the answer in the placeholder
/// map; the lever mutates world state directly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DialogueAction {
    /// Ask the player for their name and store it under `playerName`.
    PromptPlayerName,
    /// Ask the player to name the assistant, stored under `assistantName`.
    PromptAssistantName,
    /// Pull a lever that force-unlocks the named room.
    PullLever {
        /// Id of the room to unlock.
        room: String,
    },
}

/// A labeled branch option within a node.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DialogueChoice {
    /// Text shown to the player (may contain placeholder tokens).
    pub label: String,
    /// Id of the node to continue to if selected.
    pub next: String,
}

/// One step of a scripted narrative.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DialogueNode {
    /// Unique node id.
    pub id: String,
    /// Speaker name (may contain placeholder tokens).
    pub speaker: String,
    /// Speaker category, a presentation-only style hint.
    #[serde(default)]
    pub category: String,
    /// How the line should be styled.
    #[serde(default = "default_kind")]
    pub kind: LineKind,
    /// Body text (may contain placeholder tokens).
    pub text: String,
    /// Side effect executed when the node is reached.
    #[serde(default)]
    pub action: Option<DialogueAction>,
    /// Linear continuation. Mutually exclusive with `choices`.
    #[serde(default)]
    pub next: Option<String>,
    /// Branch options. Mutually exclusive with `next`.
    #[serde(default)]
    pub choices: Vec<DialogueChoice>,
}

fn default_kind() -> LineKind {
    LineKind::Dialogue
}

/// The full set of dialogue nodes, indexed by normalized id.
///
/// Structurally immutable after load.
#[derive(Debug, Clone, Default)]
pub struct DialogueGraph {
    nodes: HashMap<String, DialogueNode>,
}

impl DialogueGraph {
    /// Build a graph from a list of nodes.
    ///
    /// Duplicate ids and nodes declaring both choices and a `next` id are
    /// fatal configuration errors.
    pub fn from_nodes(nodes: Vec<DialogueNode>) -> EngineResult<Self> {
        let mut map = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if !node.choices.is_empty() && node.next.is_some() {
                return Err(EngineError::AmbiguousDialogue(node.id));
            }
            let key = normalize_id(&node.id);
            if map.contains_key(&key) {
                return Err(EngineError::DuplicateDialogue(node.id));
            }
            map.insert(key, node);
        }
        Ok(Self { nodes: map })
    }

    /// Parse a graph from a JSON array of node definitions.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let nodes: Vec<DialogueNode> = serde_json::from_str(json)?;
        Self::from_nodes(nodes)
    }

    /// Look up a node by id (normalized match).
    pub fn get(&self, id: &str) -> Option<&DialogueNode> {
        self.nodes.get(&normalize_id(id))
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Interpreter for a [`DialogueGraph`].
///
/// Runs one dialogue sequence to its terminal node, executing actions and
/// recording progress in the session as it goes.
#[derive(Debug, Clone, Copy)]
pub struct DialogueRunner {
    delay_ms: u64,
}

impl DialogueRunner {
    /// Create a runner with the given inter-node pacing delay.
    pub fn new(delay_ms: u64) -> Self {
        Self { delay_ms }
    }

    /// Traverse the graph from `start_id` until a terminal node.
    ///
    /// An unresolvable id is fatal for this invocation only: the error is
    /// returned and nothing else is mutated beyond the nodes already
    /// executed. Termination relies on the authored graph reaching a
    /// terminal node.
    pub fn run(
        &self,
        graph: &DialogueGraph,
        start_id: &str,
        session: &mut SessionState,
        world: &mut WorldRegistry,
        presenter: &mut dyn Presenter,
    ) -> EngineResult<()> {
        let mut current = graph
            .get(start_id)
            .ok_or_else(|| EngineError::DialogueNotFound(start_id.to_string()))?;

        loop {
            log::debug!("dialogue node {}", current.id);
            let norm = normalize_id(&current.id);
            if norm != normalize_id(WAIT_FOR_COMMAND) && norm != normalize_id(END) {
                session.last_dialogue = Some(current.id.clone());
            }

            self.step(current, session, world, presenter)?;

            let next_id = if current.choices.is_empty() {
                current.next.clone()
            } else {
                let labels: Vec<String> = current
                    .choices
                    .iter()
                    .map(|c| replace_placeholders(&c.label, &session.placeholders))
                    .collect();
                let picked = presenter.prompt_choice(&labels);
                let choice = current
                    .choices
                    .get(picked)
                    .ok_or(EngineError::InvalidChoice(picked))?;
                Some(choice.next.clone())
            };

            match next_id {
                Some(id) => {
                    presenter.pause(self.delay_ms);
                    current = graph
                        .get(&id)
                        .ok_or_else(|| EngineError::DialogueNotFound(id.clone()))?;
                }
                None => return Ok(()),
            }
        }
    }

    /// Execute one node: its action if present, its text otherwise.
    fn step(
        &self,
        node: &DialogueNode,
        session: &mut SessionState,
        world: &mut WorldRegistry,
        presenter: &mut dyn Presenter,
    ) -> EngineResult<()> {
        match &node.action {
            Some(DialogueAction::PromptPlayerName) => {
                let prompt = replace_placeholders(&node.text, &session.placeholders);
                let answer = presenter.prompt_text(&prompt);
                session.player_name = answer.clone();
                session.set_placeholder(PLAYER_NAME_KEY, answer);
            }
            Some(DialogueAction::PromptAssistantName) => {
                let prompt = replace_placeholders(&node.text, &session.placeholders);
                let answer = presenter.prompt_text(&prompt);
                session.set_placeholder(ASSISTANT_NAME_KEY, answer);
            }
            Some(DialogueAction::PullLever { room }) => {
                let target = world
                    .find_room_mut(room)
                    .ok_or_else(|| WorldError::UnknownRoom(room.clone()))?;
                target.locked = false;
                log::info!("lever pulled, room \"{}\" unlocked", target.id);
            }
            None => {
                let speaker = replace_placeholders(&node.speaker, &session.placeholders);
                let text = replace_placeholders(&node.text, &session.placeholders);
                let style = LineStyle {
                    category: &node.category,
                    kind: node.kind,
                };
                presenter.display(&speaker, style, &text);
            }
        }
        Ok(())
    }
}
