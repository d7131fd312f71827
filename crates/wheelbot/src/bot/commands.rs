/// A slash command with its raw argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Style(Option<String>),
    Theme(Option<String>),
    Color(Option<String>),
    Cancel,
    Unknown(String),
}

impl Command {
    /// Parse a message as a command. `None` means it is not one.
    ///
    /// `/style@WheelBot neon` and `/style neon` are the same command. Only a
    /// single argument is accepted; anything else leaves the argument empty.
    pub fn parse(text: &str) -> Option<Command> {
        let text = text.trim();
        let rest = text.strip_prefix('/')?;

        let mut parts = rest.split_whitespace();
        let head = parts.next().unwrap_or_default();
        let name = head.split('@').next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = parts.collect();
        let arg = match args.as_slice() {
            [one] => Some(one.to_string()),
            _ => None,
        };

        Some(match name.as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            "style" => Command::Style(arg),
            "theme" => Command::Theme(arg),
            "color" | "colour" => Command::Color(arg),
            "cancel" => Command::Cancel,
            _ => Command::Unknown(name),
        })
    }
}
