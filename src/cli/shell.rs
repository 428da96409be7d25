use crate::{
    cli::utils::export_history,
    render::grid::render_map,
    space::shared::SharedAllocator,
};
use anyhow::{Context, Result, anyhow, bail};
use rustyline::{Editor, error::ReadlineError};
use std::fmt::Write;

const HELP: &str = "\
commands:
  alloc <len> <owner>   reserve <len> units for <owner> (first fit)
  release <owner>       release every live holding of <owner>
  tick                  advance to the next day
  map [day]             draw the space (default: today)
  stats                 usage and fragmentation
  history               every allocation ever made
  export <file.csv>     write the history as CSV
  help                  this text
  exit | quit           leave the shell";

/// Result of one shell command.
#[derive(Debug, PartialEq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// Line-oriented front end over one allocator.
pub struct Shell {
    space: SharedAllocator,
    row_width: usize,
}

impl Shell {
    pub fn new(space: SharedAllocator, row_width: usize) -> Self {
        Shell {
            space,
            row_width: row_width.max(1),
        }
    }

    pub fn space(&self) -> &SharedAllocator {
        &self.space
    }

    /// Parse and run a single command line.
    pub fn execute(&self, line: &str) -> Result<Reply> {
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            return Ok(Reply::Output(String::new()));
        };
        let args: Vec<&str> = words.collect();

        let out = match cmd.to_ascii_lowercase().as_str() {
            "exit" | "quit" => return Ok(Reply::Quit),
            "help" => HELP.to_string(),
            "alloc" => {
                let [len, owner] = args.as_slice() else {
                    bail!("usage: alloc <len> <owner>");
                };
                let len: usize = len
                    .parse()
                    .with_context(|| format!("invalid length {:?}", len))?;
                match self.space.allocate(len, owner) {
                    Ok(start) => format!("{owner} got {len} units at {start}"),
                    Err(denial) => format!("denied: {denial}"),
                }
            }
            "release" => {
                let [owner] = args.as_slice() else {
                    bail!("usage: release <owner>");
                };
                let freed = self.space.release(owner);
                if freed.is_empty() {
                    format!("{owner} holds nothing")
                } else {
                    let ranges: Vec<String> =
                        freed.iter().map(|r| format!("{}..{}", r.start, r.end)).collect();
                    format!("{owner} released {}", ranges.join(", "))
                }
            }
            "tick" => {
                self.space.advance_day();
                format!("day {}", self.space.now())
            }
            "map" => {
                let day = match args.as_slice() {
                    [] => self.space.now(),
                    [d] => d.parse().with_context(|| format!("invalid day {:?}", d))?,
                    _ => bail!("usage: map [day]"),
                };
                let live = self.space.snapshot(day);
                render_map(day, self.space.capacity(), self.row_width, &live)
            }
            "stats" => {
                let u = self.space.usage();
                format!(
                    "day {}: {} live, used {}/{}, free {}, largest gap {}, fragmentation {:.2}",
                    self.space.now(),
                    u.live_allocations,
                    u.used,
                    u.capacity,
                    u.free,
                    u.largest_gap,
                    u.fragmentation
                )
            }
            "history" => {
                let mut s = String::new();
                for rec in self.space.history() {
                    let _ = write!(
                        s,
                        "{:>4}..{:<4} {:<10} day {}",
                        rec.start,
                        rec.end(),
                        rec.owner,
                        rec.created_at
                    );
                    if let Some(day) = rec.released_at {
                        let _ = write!(s, " -> released day {day}");
                    }
                    s.push('\n');
                }
                s
            }
            "export" => {
                let [path] = args.as_slice() else {
                    bail!("usage: export <file.csv>");
                };
                let n = self.space.with(|space| export_history(space, path))?;
                format!("wrote {n} records to {path}")
            }
            other => return Err(anyhow!("unknown command {:?} (try `help`)", other)),
        };
        Ok(Reply::Output(out))
    }
}

/// Interactive loop over a fresh space of `capacity` units.
pub fn run_shell(capacity: usize, row_width: usize) -> Result<()> {
    let shell = Shell::new(SharedAllocator::new(capacity)?, row_width);
    let mut rl = Editor::<()>::new()?;

    println!("Address space of {capacity} units. Type `help` for commands.");
    loop {
        match rl.readline("space> ") {
            Ok(line) => {
                rl.add_history_entry(line.as_str());
                match shell.execute(&line) {
                    Ok(Reply::Quit) => break,
                    Ok(Reply::Output(text)) if text.is_empty() => {}
                    Ok(Reply::Output(text)) => println!("{}", text.trim_end()),
                    Err(e) => println!("Error: {e:#}"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
