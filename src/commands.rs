#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    Join(Option<String>),
    Start,
    Session,
    Clear,
    Reload,
    Quit,
    Unknown(String),
}

pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command.to_string(), rest.trim()),
        None => (trimmed.to_string(), ""),
    };
    // The whole remainder, so `/join <id> extra` fails the id check.
    let argument = (!rest.is_empty()).then(|| rest.to_string());

    let parsed = match command.as_str() {
        "/help" => SlashCommand::Help,
        "/join" => SlashCommand::Join(argument),
        "/start" => SlashCommand::Start,
        "/session" => SlashCommand::Session,
        "/clear" => SlashCommand::Clear,
        "/reload" => SlashCommand::Reload,
        "/quit" | "/exit" => SlashCommand::Quit,
        _ => SlashCommand::Unknown(command),
    };

    Some(parsed)
}
