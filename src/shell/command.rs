use colored::*;

use crate::fs::{error::Result, FileSystem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Ls,
    Cat(String),
    Fat,
    Bitmap,
    Block(usize),
    Import(String, String), // 宿主机路径 -> 模拟文件名
    Export(String, String), // 模拟文件名 -> 宿主机路径
    Rm(String),
    Df,
    Check,
    Exit,
}

pub fn execute_command(cmd: &Command, fs: &mut FileSystem) -> Result<()> {
    match cmd {
        Command::Help => print_help(),
        Command::Ls => {
            if fs.fat.is_empty() {
                println!("{}", "(no files)".bright_black());
            } else {
                print!("{}", fs.listing());
            }
        }
        Command::Cat(name) => {
            let text = fs.display_file(name)?;
            println!("{} {}", "📖 Contents of".cyan(), name.cyan().bold());
            print!("{}", text);
        }
        Command::Fat => {
            println!(
                "{}",
                format!("📋 {} File Allocation Table", fs.strategy()).bright_yellow().bold()
            );
            print!("{}", fs.render_fat());
        }
        Command::Bitmap => {
            println!("{}", "🧮 Free space bitmap".bright_yellow().bold());
            print!("{}", fs.render_bitmap());
        }
        Command::Block(block_id) => print!("{}", fs.describe_block(*block_id)?),
        Command::Import(host, sim) => {
            let locator = fs.import_from_host(host, sim)?;
            println!(
                "✅ File {} copied to simulation as {}",
                host.green(),
                sim.green().bold()
            );
            println!("   {}", locator.to_string().bright_black());
        }
        Command::Export(sim, host) => {
            let written = fs.export_to_host(sim, host)?;
            println!(
                "✅ File {} copied to {} ({} bytes)",
                sim.green().bold(),
                host.green(),
                written
            );
        }
        Command::Rm(name) => {
            fs.delete_file(name)?;
            println!("❌ Deleted file: {}", name.red());
        }
        Command::Df => println!("💾 {}", fs.usage()),
        Command::Check => {
            fs.check()?;
            println!("{}", "✅ Bitmap and FAT are consistent".green());
        }
        Command::Exit => println!("{}", "👋 Exiting MiniFS shell...".yellow().bold()),
    }

    Ok(())
}

fn print_help() {
    println!("{}", "📘 MiniFS Commands".bright_cyan().bold());
    println!(
        "{}",
        "
  ls                     List files with their layout
  cat <file>             Display a file
  fat                    Display the file allocation table (block 0)
  bitmap                 Display the free space bitmap (block 1)
  block <n>              Display disk block n
  import <host> <file>   Copy a host file into the simulation
  export <file> <host>   Copy a simulated file to the host
  rm <file>              Delete a file
  df                     Show disk usage
  fsck                   Check bitmap/FAT consistency
  help                   Show this help message
  exit                   Quit the shell
"
        .bright_black()
    );
}
