use std::{ffi::OsString, time::Duration};

use console::{Style, Term};
use feed::RunOptions;

mod view;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new().filter_level(log::LevelFilter::Error).parse_default_env().init();

    let args = std::env::args_os().collect::<Vec<OsString>>();

    if args.len() < 2 || args.len() > 3 {
        print_help();
        return Ok(());
    }

    let Some(seconds) = args[1].to_str().and_then(|s| s.parse::<u64>().ok()) else {
        eprintln!("{}: incorrect number of seconds", Style::new().red().bold().apply_to("ERR"));
        std::process::exit(2);
    };

    let seed = match args.get(2) {
        Some(arg) => match arg.to_str().and_then(|s| s.parse::<u64>().ok()) {
            Some(seed) => Some(seed),
            None => {
                eprintln!("{}: incorrect seed", Style::new().red().bold().apply_to("ERR"));
                std::process::exit(2);
            },
        },
        None => None,
    };

    let options = RunOptions { duration: Duration::from_secs(seconds), seed, ..Default::default() };

    // frames are redrawn in place on stderr, the final snapshot goes to stdout as csv
    let term = Term::stderr();
    let mut drawn = 0;
    let result = feed::run_feed(options, |records, active| {
        if term.is_term() && drawn > 0 {
            if let Err(e) = term.clear_last_lines(drawn) {
                log::warn!("Failed to clear the previous frame: {e}");
            }
        }

        let lines = view::render_frame(records, active);
        drawn = lines.len();
        for line in lines {
            if let Err(e) = term.write_line(&line) {
                log::warn!("Failed to draw a frame: {e}");
            }
        }
    });

    let last = match result {
        Ok(last) => last,
        Err(e) => {
            eprintln!("{}: {:?}", Style::new().red().bold().apply_to("ERR"), e);
            std::process::exit(1);
        },
    };

    if let Err(e) = feed::write_snapshot(&last, std::io::stdout()) {
        eprintln!("{}: {:?}", Style::new().red().bold().apply_to("ERR"), e);
        std::process::exit(1);
    }
    Ok(())
}

fn print_help() {
    println!("Usage:\n   cargo run -- <seconds> [seed] > <feed.csv>");
}
