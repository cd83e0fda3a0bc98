//! Terminal host for the chat widget: stdin commands in, transcript out.
//!
//! The host plays the part of the dashboard page. It owns the visibility
//! flag, feeds typed lines to the widget, and prints each update as it
//! arrives so replies appear to type themselves out.

use std::io::{self, Write};

use backroom_chat::{Conversation, ConversationUpdate};

/// One line of user input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open,
    Close,
    /// Re-read the statistics snapshot.
    Reload,
    /// Zero-based suggestion index.
    Suggest(usize),
    Transcript,
    Quit,
    /// Free text for the assistant.
    Say(String),
    Empty,
    /// A recognised command with a bad argument.
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        match head {
            "/open" => Command::Open,
            "/close" => Command::Close,
            "/reload" => Command::Reload,
            "/transcript" => Command::Transcript,
            "/quit" | "/exit" => Command::Quit,
            "/suggest" => match rest.parse::<usize>() {
                Ok(n) if n >= 1 => Command::Suggest(n - 1),
                _ => Command::Invalid(format!(
                    "usage: /suggest <n> where n is 1 or more, got {:?}",
                    rest
                )),
            },
            _ => Command::Say(line.to_string()),
        }
    }
}

/// Reveal in progress on the current output line.
#[derive(Debug, Clone, Copy)]
struct InFlight {
    index: usize,
    printed: usize,
}

/// Prints conversation updates to a writer.
#[derive(Debug)]
pub struct Printer<W: Write> {
    out: W,
    in_flight: Option<InFlight>,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            in_flight: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Render one update. `conv` is the conversation after the update applied.
    pub fn update(&mut self, conv: &Conversation, update: &ConversationUpdate) -> io::Result<()> {
        match update {
            ConversationUpdate::MessageAppended { index } => {
                self.finish_line(conv)?;
                write!(self.out, "backroom> ")?;
                self.in_flight = Some(InFlight {
                    index: *index,
                    printed: 0,
                });
            }
            ConversationUpdate::RevealFrame { index, visible } => {
                if let Some(flight) = self.in_flight.as_mut().filter(|f| f.index == *index) {
                    if let Some(tail) = visible.get(flight.printed..) {
                        self.out.write_all(tail.as_bytes())?;
                        flight.printed = visible.len();
                    }
                }
            }
            ConversationUpdate::RevealComplete { index } => {
                if self.in_flight.is_some_and(|f| f.index == *index) {
                    self.finish_line(conv)?;
                }
            }
            ConversationUpdate::SuggestionsShown => {
                self.finish_line(conv)?;
                self.suggestions(conv)?;
            }
        }
        self.out.flush()
    }

    /// Print the numbered suggested actions.
    pub fn suggestions(&mut self, conv: &Conversation) -> io::Result<()> {
        self.finish_line(conv)?;
        writeln!(self.out, "  suggestions:")?;
        for (i, text) in conv.suggestions().iter().enumerate() {
            writeln!(self.out, "    {}. {}", i + 1, text)?;
        }
        self.out.flush()
    }

    /// Print a parenthesised status line, completing any partial reply first.
    pub fn note(&mut self, conv: &Conversation, text: &str) -> io::Result<()> {
        self.finish_line(conv)?;
        writeln!(self.out, "  ({})", text)?;
        self.out.flush()
    }

    /// Write raw text on its own line.
    pub fn line(&mut self, conv: &Conversation, text: &str) -> io::Result<()> {
        self.finish_line(conv)?;
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }

    /// Forget any partial reply without printing it. Used when the session is torn down.
    pub fn abandon(&mut self) -> io::Result<()> {
        if self.in_flight.take().is_some() {
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    /// Print whatever is left of the in-flight message and end its line.
    fn finish_line(&mut self, conv: &Conversation) -> io::Result<()> {
        let Some(flight) = self.in_flight.take() else {
            return Ok(());
        };
        let rest = conv
            .transcript()
            .messages()
            .get(flight.index)
            .and_then(|m| m.content().get(flight.printed..))
            .unwrap_or("");
        writeln!(self.out, "{}", rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backroom_core::config::ChatConfig;
    use backroom_core::types::StatisticsSnapshot;

    fn conversation() -> Conversation {
        let config = ChatConfig {
            greeting_delay_ms: 10,
            suggestions_delay_ms: 5,
            thinking_delay_min_ms: 20,
            thinking_delay_max_ms: 20,
            reveal_interval_ms: 1,
            currency: "GHS".to_string(),
        };
        Conversation::new(config, StatisticsSnapshot::sample()).unwrap()
    }

    fn output(printer: Printer<Vec<u8>>) -> String {
        String::from_utf8(printer.into_inner()).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/open"), Command::Open);
        assert_eq!(Command::parse("  /close  "), Command::Close);
        assert_eq!(Command::parse("/reload"), Command::Reload);
        assert_eq!(Command::parse("/transcript"), Command::Transcript);
        assert_eq!(Command::parse("/quit"), Command::Quit);
        assert_eq!(Command::parse("/exit"), Command::Quit);
        assert_eq!(Command::parse("/suggest 2"), Command::Suggest(1));
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("   "), Command::Empty);
    }

    #[test]
    fn test_parse_free_text() {
        assert_eq!(
            Command::parse("  show me sales "),
            Command::Say("show me sales".to_string())
        );
        // Unknown slash words go to the assistant as typed.
        assert_eq!(
            Command::parse("/sales please"),
            Command::Say("/sales please".to_string())
        );
    }

    #[test]
    fn test_parse_bad_suggest_argument() {
        assert!(matches!(Command::parse("/suggest"), Command::Invalid(_)));
        assert!(matches!(Command::parse("/suggest 0"), Command::Invalid(_)));
        assert!(matches!(Command::parse("/suggest two"), Command::Invalid(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_printer_renders_full_greeting() {
        let mut conv = conversation();
        let mut printer = Printer::new(Vec::new());
        conv.start_session().unwrap();
        while let Some(update) = conv.step().await.unwrap() {
            printer.update(&conv, &update).unwrap();
        }

        let text = output(printer);
        for message in conv.transcript().messages() {
            let line = format!("backroom> {}\n", message.content());
            assert!(text.contains(&line), "missing line {:?} in {:?}", line, text);
        }
        assert!(text.contains("  suggestions:\n    1. Show me today's sales\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_note_completes_partial_reply() {
        let mut conv = conversation();
        let mut printer = Printer::new(Vec::new());
        conv.start_session().unwrap();

        // Appended plus one frame of the first greeting line.
        for _ in 0..2 {
            let update = conv.step().await.unwrap().unwrap();
            printer.update(&conv, &update).unwrap();
        }
        printer.note(&conv, "typing").unwrap();

        let first = conv.transcript().messages()[0].content().to_string();
        let text = output(printer);
        assert_eq!(text, format!("backroom> {}\n  (typing)\n", first));
    }

    #[test]
    fn test_abandon_without_reply_writes_nothing() {
        let mut printer = Printer::new(Vec::new());
        printer.abandon().unwrap();
        assert!(output(printer).is_empty());
    }
}
