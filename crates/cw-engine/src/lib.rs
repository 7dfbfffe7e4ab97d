//! Gameplay engine: inventory, sessions, dialogue, commands, and saves.
//!
//! Everything here is presentation-agnostic. The engine talks to the
//! outside world only through the [`Presenter`] trait; frontends supply an
//! implementation and feed input lines to the [`CommandInterpreter`].

pub mod command;
pub mod dialogue;
pub mod error;
pub mod inventory;
pub mod presenter;
pub mod save;
pub mod session;
pub mod text;

pub use command::{
    CommandHelp, CommandInterpreter, InterpreterConfig, ParsedCommand, RoomTrigger, Verb,
    parse_line,
};
pub use dialogue::{DialogueAction, DialogueChoice, DialogueGraph, DialogueNode, DialogueRunner};
pub use error::{CommandError, EngineError, EngineResult};
pub use inventory::Inventory;
pub use presenter::{LineKind, LineStyle, Presenter, ScriptedPresenter};
pub use save::{SaveManager, Snapshot};
pub use session::SessionState;
pub use text::replace_placeholders;
