pub mod command;
pub mod parse;

use std::{
    io::{self, stdout},
    path::PathBuf,
};

use colored::*;
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use dialoguer::{theme::ColorfulTheme, Select};
use log::warn;
use reedline::{
    DefaultCompleter, DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal,
};

use crate::{
    fs::{
        config::{FsConfig, Strategy},
        error::Result,
        FileSystem,
    },
    shell::{
        command::{execute_command, Command},
        parse::parse_command,
    },
};

const COMMANDS: [&str; 12] = [
    "help", "ls", "cat", "fat", "bitmap", "block", "import", "export", "rm", "df", "fsck", "exit",
];

/// 启动时未指定分配方式，交互式选择
pub fn select_strategy() -> Result<Strategy> {
    let names: Vec<&str> = Strategy::ALL.iter().map(|s| s.name()).collect();
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Choose an allocation method")
        .items(&names)
        .default(0)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    Ok(Strategy::ALL[choice])
}

pub fn start_shell(config: FsConfig) -> Result<()> {
    banner(config.strategy)?;

    let mut fs = FileSystem::new(config);
    let username = whoami::username();

    println!(
        "{}",
        "Type 'help' for available commands. Use ↑↓ for history, Tab for auto-completion.\n"
            .bright_black()
    );

    // 初始化 reedline
    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".minifs_alloc_history");

    let mut line_editor = Reedline::create();
    match FileBackedHistory::with_file(100, history_path) {
        Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
        Err(e) => warn!("command history disabled: {}", e),
    }

    // 命令补全
    let completer = DefaultCompleter::new_with_wordlen(
        COMMANDS.iter().map(|c| c.to_string()).collect(),
        2,
    );
    line_editor = line_editor.with_completer(Box::new(completer));

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(format!("{}@{}", username, fs.strategy())),
        DefaultPromptSegment::Basic("MiniFS".to_string()),
    );

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(buffer)) => {
                let trimmed = buffer.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_command(trimmed) {
                    Some(cmd) => {
                        if let Err(e) = execute_command(&cmd, &mut fs) {
                            println!("{} {}", "❌ Error:".red().bold(), e);
                        }
                        if cmd == Command::Exit {
                            break;
                        }
                    }
                    None => println!(
                        "{}",
                        "⚠️  Unknown command or missing arguments. Type 'help' for command list."
                            .yellow()
                    ),
                }
            }
            Ok(Signal::CtrlC) => {
                println!();
                continue;
            }
            Ok(Signal::CtrlD) => {
                println!("{}", "Exiting MiniFS...".yellow());
                break;
            }
            Err(e) => {
                println!("Error reading line: {}", e);
                break;
            }
        }
    }

    println!("{}", "GoodBye!".bright_yellow());
    Ok(())
}

fn banner(strategy: Strategy) -> Result<()> {
    let mut stdout = stdout();
    execute!(
        stdout,
        Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        SetForegroundColor(Color::Cyan),
        Print(format!("Welcome to MiniFS ({} allocation)\n", strategy)),
        ResetColor
    )?;
    Ok(())
}
