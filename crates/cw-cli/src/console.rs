//! Terminal presenter: colored output and stdin prompts.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use colored::Colorize;

use cw_engine::{LineKind, LineStyle, Presenter};

/// Presenter that renders to stdout and reads answers from stdin.
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl ConsolePresenter {
    /// Create a console presenter.
    pub fn new() -> Self {
        Self
    }
}

/// Read one trimmed line from stdin. None on end of input.
fn read_line() -> Option<String> {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

fn show_prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

impl Presenter for ConsolePresenter {
    fn display(&mut self, speaker: &str, style: LineStyle<'_>, text: &str) {
        let body = match style.kind {
            LineKind::Dialogue => text.normal(),
            LineKind::Narration => text.italic(),
            LineKind::Thought => text.dimmed(),
            LineKind::System => text.yellow(),
        };
        if speaker.is_empty() {
            println!("{body}");
        } else {
            let name = match style.category {
                "helper" => speaker.cyan().bold(),
                _ => speaker.green().bold(),
            };
            println!("{name}: {body}");
        }
    }

    fn prompt_choice(&mut self, labels: &[String]) -> usize {
        loop {
            for (index, label) in labels.iter().enumerate() {
                println!("  {}. {label}", index + 1);
            }
            show_prompt();
            let Some(answer) = read_line() else {
                return 0;
            };
            if let Ok(n) = answer.parse::<usize>() {
                if (1..=labels.len()).contains(&n) {
                    return n - 1;
                }
            }
            println!("{}", "Pick a number from the list.".yellow());
        }
    }

    fn prompt_text(&mut self, prompt: &str) -> String {
        println!("{}", prompt.cyan());
        show_prompt();
        read_line().unwrap_or_default()
    }

    fn pause(&mut self, millis: u64) {
        thread::sleep(Duration::from_millis(millis));
    }
}
