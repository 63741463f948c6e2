use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use flipbook_othello::Board;
use flipbook_trainer::{Bot, JsonStore, OpeningBook};

#[derive(Parser, Debug)]
#[command(author, version, about = "Othello opening book tools", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a position and its legal moves
    Show {
        /// Position ID, e.g. B00000000000000100000001810000000
        board_id: String,
    },
    /// Check a book file for internal consistency
    Validate {
        /// Path to the book JSON file
        path: String,
    },
    /// Search for the best move from a position
    BestMove {
        /// Position ID to search from
        board_id: String,

        /// Search depth in plies
        #[arg(long, default_value_t = 8)]
        depth: u32,
    },
}

fn parse_board(board_id: &str) -> Result<Board> {
    Board::from_id(board_id).with_context(|| format!("bad position ID {}", board_id))
}

fn show(board_id: &str) -> Result<()> {
    let board = parse_board(board_id)?;
    println!("{}", board);
    println!("normalized: {}", board.normalized_id());
    Ok(())
}

fn validate(path: &str) -> Result<()> {
    let store = JsonStore::new(path);
    let book = OpeningBook::load_from(&store)?;

    match book.validate() {
        Ok(()) => {
            println!("OK: {} openings", book.len());
            Ok(())
        }
        Err(violations) => {
            for violation in &violations {
                eprintln!("{}", violation);
            }
            bail!("{} violation(s)", violations.len());
        }
    }
}

fn best_move(board_id: &str, depth: u32) -> Result<()> {
    let board = parse_board(board_id)?;
    let bot = Bot::new(depth);
    let best = bot.best_child(&board)?;

    // Recover the field that leads to the chosen child.
    for field in board.moves().squares() {
        let field = flipbook_othello::Field::Square(field);
        if board.do_move(field)? == best {
            println!("{}", field);
            return Ok(());
        }
    }
    bail!("no move reaches the chosen child");
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Show { board_id } => show(&board_id),
        Command::Validate { path } => validate(&path),
        Command::BestMove { board_id, depth } => best_move(&board_id, depth),
    }
}
