use orinium_pipeline::{
    FallbackGraphics, Renderer, StyleEngine, TreeBuilder,
    engine::{
        bridge::graphics::DrawCommand, config::DEFAULT_ARENA_CAPACITY, css::Stylesheet,
        renderer::Rect,
    },
    parse_css, parse_html,
    platform::io::{FsResourceLoader, ResourceLoader},
};

use colored::*;
use strsim::levenshtein;

use anyhow::{Context, Result};
use std::{collections::BTreeMap, env, fs};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let commands = get_commands();

    let Some(command) = args.get(1) else {
        print_usage(&commands);
        return Ok(());
    };

    match command.as_str() {
        "help" => match args.get(2) {
            Some(name) => print_help(&commands, name),
            None => print_usage(&commands),
        },
        "dom" => {
            let path = args.get(2).context("Please provide an HTML file.")?;
            let document = parse_html(&read(path)?, DEFAULT_ARENA_CAPACITY)?;
            println!("{}\n{}", "DOM Tree:".bold(), document.dom);
            if !document.unsupported_tags.is_empty() {
                println!(
                    "{} {:?}",
                    "Unsupported tags:".yellow().bold(),
                    document.unsupported_tags
                );
            }
        }
        "css" => {
            let source = args.get(2).context("Please provide a CSS file or string.")?;
            let css = match fs::read_to_string(source) {
                Ok(text) => text,
                Err(_) => source.clone(),
            };
            let sheet = parse_css(&css);
            println!("{} ({} rules)\n{}", "Stylesheet:".bold(), sheet.len(), sheet);
        }
        "boxes" | "paint" => {
            let path = args.get(2).context("Please provide an HTML file.")?;
            let width = match args.get(3) {
                Some(w) => w.parse().context("WIDTH must be a number")?,
                None => 800.0,
            };
            let viewport = Rect::new(0.0, 0.0, width, 600.0);

            let document = parse_html(&read(path)?, DEFAULT_ARENA_CAPACITY)?;
            let mut sheet = user_agent_stylesheet();
            for block in &document.style_blocks {
                sheet.extend(parse_css(block));
            }

            let mut dom = document.dom;
            StyleEngine::new(&sheet).apply(&mut dom);
            let mut tree = TreeBuilder::build(&dom).context("Document has no root")?;
            tree.layout(&FallbackGraphics::new(), viewport);

            if command == "boxes" {
                println!("{}\n{}", "Box Tree:".bold(), tree);
            } else {
                for cmd in Renderer::new().generate_draw_commands(&tree, viewport) {
                    print_command(&cmd);
                }
            }
        }
        other => {
            eprintln!("{} {}", "Unknown command:".red(), other);
            let command_list: Vec<&str> = commands.keys().copied().collect();
            if let Some(suggested) = suggest_command(other, &command_list) {
                eprintln!("Did you mean: {} ?", suggested.green());
            }
        }
    }

    Ok(())
}

fn read(path: &str) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {path}"))
}

fn user_agent_stylesheet() -> Stylesheet {
    FsResourceLoader::new()
        .load_text("ua.css")
        .map(|text| parse_css(&text))
        .unwrap_or_default()
}

fn print_command(cmd: &DrawCommand) {
    match cmd {
        DrawCommand::DrawText { x, y, text, .. } => {
            println!("{} ({x}, {y}) {:?}", "text".cyan(), text)
        }
        DrawCommand::FillRect { rect, color } => {
            println!("{} {rect} {:?}", "fill".magenta(), color)
        }
        other => println!("{}", format!("{other:?}").dimmed()),
    }
}

fn print_usage(commands: &BTreeMap<&str, (&str, &str, &str)>) {
    println!("{}", "Orinium Pipeline Inspector".bold().underline());
    println!("\n{}", "Usage:".bold());
    println!("  cargo run --example inspect [COMMAND] [ARGS]\n");

    println!("{}", "Available Commands:".bold());
    for (name, (description, args, _detail)) in commands {
        println!(
            "  {:<8} {:<14} - {}",
            name.green().bold(),
            args.cyan(),
            description
        );
    }

    println!("\nTo see more details about a specific command, run:");
    println!("  cargo run --example inspect help [COMMAND]");
}

fn print_help(commands: &BTreeMap<&str, (&str, &str, &str)>, command: &str) {
    if let Some((description, args, detail)) = commands.get(command) {
        println!(
            "{}",
            format!("Help for command: {command}").bold().underline()
        );
        println!("\n{}:", "Description".bold());
        println!("  {description}");
        println!("\n{}:", "Usage".bold());
        println!("  cargo run --example inspect {command} {args}");
        if !detail.is_empty() {
            println!("\n{}:", "Details".bold());
            println!("  {detail}");
        }
    } else {
        eprintln!("Unknown command: {command}");
        let command_list: Vec<&str> = commands.keys().copied().collect();
        if let Some(suggested) = suggest_command(command, &command_list) {
            eprintln!("Did you mean: {suggested} ?");
        }
    }
}

fn suggest_command<'a>(input: &str, commands: &[&'a str]) -> Option<&'a str> {
    commands
        .iter()
        .min_by_key(|cmd| levenshtein(input, cmd))
        // 編集距離が 4 以内なら提案
        .filter(|cmd| levenshtein(input, cmd) <= 4)
        .copied()
}

#[rustfmt::skip]
fn get_commands<'a>() -> BTreeMap<&'a str, (&'a str, &'a str, &'a str)> {
    let mut map = BTreeMap::new();

    map.insert(
        "dom",
        (
            "Parse an HTML file and print its DOM tree.",
            "FILE",
            "Unsupported tag names found while parsing are listed after the tree.",
        ),
    );
    map.insert(
        "css",
        (
            "Parse a stylesheet file (or a raw CSS string) and print the rules.",
            "FILE|RAW_CSS",
            "",
        ),
    );
    map.insert(
        "boxes",
        (
            "Style and lay out an HTML file, then print the box tree.",
            "FILE [WIDTH]",
            "Layout uses the fallback graphics (8px per character, 16px lines). WIDTH defaults to 800.",
        ),
    );
    map.insert(
        "paint",
        (
            "Lay out an HTML file and print the recorded draw commands.",
            "FILE [WIDTH]",
            "",
        ),
    );

    map
}
