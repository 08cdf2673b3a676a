use crate::shell::command::Command;

pub fn parse_command(input: &str) -> Option<Command> {
    let tokens: Vec<&str> = input.trim().split_ascii_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    let cmd = tokens[0];
    let args = &tokens[1..];

    match cmd {
        "help" => Some(Command::Help),
        "ls" => Some(Command::Ls),
        "fat" => Some(Command::Fat),
        "bitmap" => Some(Command::Bitmap),
        "df" => Some(Command::Df),
        "fsck" => Some(Command::Check),
        "cat" => args.first().map(|&name| Command::Cat(name.to_string())),
        "rm" => args.first().map(|&name| Command::Rm(name.to_string())),
        "block" => args
            .first()
            .and_then(|n| n.parse::<usize>().ok())
            .map(Command::Block),
        "import" => match args {
            [host, sim] => Some(Command::Import(host.to_string(), sim.to_string())),
            _ => None,
        },
        "export" => match args {
            [sim, host] => Some(Command::Export(sim.to_string(), host.to_string())),
            _ => None,
        },
        "exit" | "quit" => Some(Command::Exit),
        _ => None,
    }
}
