//! Editor command grammar and dispatch.

use crate::terminal::{self, TerminalBridge};
use clap::{Parser, Subcommand, ValueEnum};
use smartnai_core::{EditResult, ItemList, PromptSession, SnapshotRepository};
use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;

#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true, name = "smartnai")]
struct Line {
    #[command(subcommand)]
    command: Command,
}

/// One editor command.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the topic tree and the compiled preview.
    Show,
    /// Replace the base prompt.
    Base {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Topic operations.
    Topic {
        #[command(subcommand)]
        action: TopicAction,
    },
    /// Type text into the staging input of a topic list.
    Stage {
        topic: usize,
        list: ListArg,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Item operations.
    Item {
        #[command(subcommand)]
        action: ItemAction,
    },
    /// Compile, print and save the tree.
    Commit,
    /// Leave the editor without saving.
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Subcommand)]
pub enum TopicAction {
    /// Append a new topic.
    Add,
    /// Delete a topic after confirmation.
    Rm { topic: usize },
    /// Include or exclude a topic from compilation.
    Toggle { topic: usize },
    /// Expand or collapse a topic in `show`.
    Open { topic: usize },
    Rename {
        topic: usize,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        name: Vec<String>,
    },
    /// Move a topic to another position.
    Move { topic: usize, target: usize },
}

#[derive(Debug, Subcommand)]
pub enum ItemAction {
    /// Append the staged text as a new item.
    Add { topic: usize, list: ListArg },
    /// Replace item text and leave the input; blank text deletes the item.
    Set {
        topic: usize,
        list: ListArg,
        index: usize,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Leave the item input; blank items are deleted.
    Blur {
        topic: usize,
        list: ListArg,
        index: usize,
    },
    /// Raise or lower the item level.
    Level {
        topic: usize,
        list: ListArg,
        index: usize,
        #[arg(allow_negative_numbers = true)]
        delta: i32,
    },
    Rm {
        topic: usize,
        list: ListArg,
        index: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListArg {
    Items,
    Undesired,
}

impl From<ListArg> for ItemList {
    fn from(value: ListArg) -> Self {
        match value {
            ListArg::Items => ItemList::Items,
            ListArg::Undesired => ItemList::Undesired,
        }
    }
}

impl Command {
    /// Number of leading command words and the free-text argument, if any.
    fn free_text_mut(&mut self) -> Option<(usize, &mut Vec<String>)> {
        match self {
            Self::Base { text } => Some((1, text)),
            Self::Stage { text, .. } => Some((3, text)),
            Self::Topic {
                action: TopicAction::Rename { name, .. },
            } => Some((3, name)),
            Self::Item {
                action: ItemAction::Set { text, .. },
            } => Some((5, text)),
            _ => None,
        }
    }
}

/// Parses one input line.
///
/// Free text keeps its spacing: it is the rest of the line after the fixed
/// words and one separator.
pub fn parse(line: &str) -> Result<Command, clap::Error> {
    let words = line.split_whitespace().collect::<Vec<_>>();
    let mut command = Line::try_parse_from(words)?.command;
    if let Some((fixed, text)) = command.free_text_mut() {
        *text = vec![rest_of_line(line, fixed).to_string()];
    }
    Ok(command)
}

fn rest_of_line(line: &str, fixed: usize) -> &str {
    let mut rest = line.trim_end_matches(['\r', '\n']);
    for _ in 0..fixed {
        rest = rest.trim_start();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = &rest[end..];
    }
    rest.strip_prefix([' ', '\t']).unwrap_or(rest)
}

/// Runs one command against the session.
///
/// Edit errors are reported and the editor keeps running; only I/O errors
/// on the terminal itself propagate.
pub fn dispatch<R, I, O>(
    command: Command,
    session: &mut PromptSession<R>,
    input: &mut I,
    out: &mut O,
) -> io::Result<ControlFlow<()>>
where
    R: SnapshotRepository,
    I: BufRead,
    O: Write,
{
    let outcome: EditResult<()> = match command {
        Command::Show => Ok(()),
        Command::Base { text } => {
            session.set_base_prompt(text.join(" "));
            Ok(())
        }
        Command::Topic { action } => match action {
            TopicAction::Add => {
                session.add_topic();
                Ok(())
            }
            TopicAction::Rm { topic } => {
                let mut gate = |message: &str| terminal::ask_yes_no(&mut *input, &mut *out, message);
                session.remove_topic(topic, &mut gate).map(|_| ())
            }
            TopicAction::Toggle { topic } => session.toggle_topic_active(topic),
            TopicAction::Open { topic } => session.toggle_topic_open(topic).map(|_| ()),
            TopicAction::Rename { topic, name } => session.rename_topic(topic, name.join(" ")),
            TopicAction::Move { topic, target } => session.move_topic(topic, target),
        },
        Command::Stage { topic, list, text } => {
            session.set_staging(topic, list.into(), text.join(" "))
        }
        Command::Item { action } => match action {
            ItemAction::Add { topic, list } => {
                session.commit_staged_item(topic, list.into()).map(|_| ())
            }
            ItemAction::Set {
                topic,
                list,
                index,
                text,
            } => session
                .update_item_prompt(topic, list.into(), index, text.join(" "))
                .and_then(|()| session.on_item_blur(topic, list.into(), index))
                .map(|_| ()),
            ItemAction::Blur { topic, list, index } => {
                session.on_item_blur(topic, list.into(), index).map(|_| ())
            }
            ItemAction::Level {
                topic,
                list,
                index,
                delta,
            } => session.change_level(topic, list.into(), index, delta),
            ItemAction::Rm { topic, list, index } => {
                session.remove_item(topic, list.into(), index)
            }
        },
        Command::Commit => {
            let mut bridge = TerminalBridge::new(&mut *out);
            if let Err(err) = session.commit(&mut bridge) {
                writeln!(out, "error: {err}")?;
            }
            return Ok(ControlFlow::Continue(()));
        }
        Command::Quit => return Ok(ControlFlow::Break(())),
    };

    match outcome {
        Ok(()) => terminal::render(session, out)?,
        Err(err) => writeln!(out, "error: {err}")?,
    }
    Ok(ControlFlow::Continue(()))
}

#[cfg(test)]
mod tests {
    use super::{parse, Command, ItemAction, ListArg, TopicAction};

    #[test]
    fn parses_negative_level_delta() {
        let command = parse("item level 0 items 1 -1").expect("valid command");
        assert!(matches!(
            command,
            Command::Item {
                action: ItemAction::Level {
                    topic: 0,
                    list: ListArg::Items,
                    index: 1,
                    delta: -1,
                }
            }
        ));
    }

    #[test]
    fn free_text_keeps_its_spacing() {
        let command = parse("topic  rename 2 Hair   color \n").expect("valid command");
        match command {
            Command::Topic {
                action: TopicAction::Rename { topic, name },
            } => {
                assert_eq!(topic, 2);
                assert_eq!(name.join(" "), "Hair   color ");
            }
            other => panic!("unexpected command: {other:?}"),
        }

        match parse("stage 0 undesired  -lowres").expect("valid command") {
            Command::Stage { text, .. } => assert_eq!(text.join(" "), " -lowres"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn missing_free_text_is_empty() {
        match parse("item set 0 items 1\n").expect("valid command") {
            Command::Item {
                action: ItemAction::Set { text, .. },
            } => assert_eq!(text.join(" "), ""),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_list() {
        assert!(parse("stage 0 negative blurry").is_err());
    }
}
