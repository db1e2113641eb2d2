//! Terminal rendering, confirmation prompts and the stdout host bridge.

use smartnai_core::{
    FieldUpdate, HostBridge, HostError, ItemList, PromptSession, SnapshotRepository,
};
use std::io::{self, BufRead, Write};

/// Host bridge whose "fields" are labelled lines on the terminal.
pub struct TerminalBridge<W: Write> {
    out: W,
}

impl<W: Write> TerminalBridge<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> HostBridge for TerminalBridge<W> {
    fn set_positive_prompt_field(&mut self, text: &str) -> Result<(), HostError> {
        writeln!(self.out, "prompt:    {text}")?;
        Ok(())
    }

    fn set_undesired_prompt_field(&mut self, text: &str) -> Result<FieldUpdate, HostError> {
        writeln!(self.out, "undesired: {text}")?;
        self.out.flush()?;
        Ok(FieldUpdate::Applied)
    }
}

/// Asks `message` and reads one answer line; anything but yes means no.
pub fn ask_yes_no<I: BufRead, O: Write>(input: &mut I, out: &mut O, message: &str) -> bool {
    if write!(out, "{message} [y/N] ").and_then(|()| out.flush()).is_err() {
        return false;
    }
    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

/// Prints the topic tree, expanded topics with their items, and a preview.
pub fn render<R, O>(session: &PromptSession<R>, out: &mut O) -> io::Result<()>
where
    R: SnapshotRepository,
    O: Write,
{
    let state = session.state();
    writeln!(out, "base: {}", state.base_prompt)?;
    for view in session.topic_views() {
        let topic = view.topic;
        writeln!(
            out,
            "[{}] {} {}{}",
            view.index,
            if topic.active { "[x]" } else { "[ ]" },
            topic.name,
            if view.open { "" } else { " (+)" }
        )?;
        if !view.open {
            continue;
        }
        for list in [ItemList::Items, ItemList::Undesired] {
            for (index, item) in topic.list(list).iter().enumerate() {
                writeln!(out, "    {list}[{index}] {:>3}  {}", item.level, item.prompt)?;
            }
            let staged = session.view().staging(topic.id(), list);
            if !staged.is_empty() {
                writeln!(out, "    {list}[+] {staged}")?;
            }
        }
    }
    let preview = session.preview();
    writeln!(out, "preview:   {}", preview.prompt_text)?;
    writeln!(out, "undesired: {}", preview.undesired_text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ask_yes_no;
    use std::io::Cursor;

    #[test]
    fn ask_yes_no_accepts_only_yes() {
        let mut out = Vec::new();
        assert!(ask_yes_no(&mut Cursor::new("Y\n"), &mut out, "delete?"));
        assert!(ask_yes_no(&mut Cursor::new("yes\n"), &mut out, "delete?"));
        assert!(!ask_yes_no(&mut Cursor::new("\n"), &mut out, "delete?"));
        assert!(!ask_yes_no(&mut Cursor::new(""), &mut out, "delete?"));
        assert!(String::from_utf8(out).expect("utf-8").contains("delete? [y/N]"));
    }
}
