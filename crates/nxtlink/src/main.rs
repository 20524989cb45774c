mod cmd;
mod connect;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "nxtlink", version, about = "LEGO NXT control CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_beep_subcommand() {
        let cli = Cli::try_parse_from([
            "nxtlink",
            "beep",
            "--addr",
            "00:16:53:01:02:03",
            "--frequency",
            "880",
        ])
        .expect("beep args should parse");

        assert!(matches!(cli.command, Command::Beep(_)));
    }

    #[test]
    fn parses_motor_with_negative_power() {
        let cli = Cli::try_parse_from([
            "nxtlink",
            "motor",
            "a",
            "--addr",
            "00:16:53:01:02:03",
            "--power",
            "-60",
        ])
        .expect("motor args should parse");

        match cli.command {
            Command::Motor(args) => assert_eq!(args.power, -60),
            other => panic!("expected motor, got {other:?}"),
        }
    }

    #[test]
    fn parses_program_start() {
        let cli = Cli::try_parse_from([
            "nxtlink",
            "program",
            "start",
            "demo.rxe",
            "--addr",
            "00:16:53:01:02:03",
        ])
        .expect("program start args should parse");

        assert!(matches!(cli.command, Command::Program(_)));
    }

    #[test]
    fn doctor_needs_no_address() {
        let cli = Cli::try_parse_from(["nxtlink", "doctor"]).expect("doctor args should parse");
        assert!(matches!(cli.command, Command::Doctor(_)));
    }
}
