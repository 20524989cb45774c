use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use nxtlink_lcp::{opcode, FileEntry, FirmwareVersion, OutputState};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Bytes as space-separated lowercase hex.
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_json(value: &impl Serialize) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn table_with_header(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

#[derive(Serialize)]
struct FirmwareOutput<'a> {
    addr: &'a str,
    firmware: String,
    protocol: String,
}

pub fn print_firmware(addr: &str, version: &FirmwareVersion, format: OutputFormat) {
    let firmware = format!("{}.{:02}", version.firmware_major, version.firmware_minor);
    let protocol = format!("{}.{}", version.protocol_major, version.protocol_minor);
    match format {
        OutputFormat::Json => print_json(&FirmwareOutput {
            addr,
            firmware,
            protocol,
        }),
        OutputFormat::Table => {
            let mut table = table_with_header(vec!["ADDR", "FIRMWARE", "PROTOCOL"]);
            table.add_row(vec![addr.to_string(), firmware, protocol]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{addr}: {version}"),
        OutputFormat::Raw => println!("{firmware}"),
    }
}

#[derive(Serialize)]
struct OutputStateOutput<'a> {
    addr: &'a str,
    port: u8,
    power: i8,
    run_state: u8,
    tacho_limit: u32,
    tacho_count: i32,
    block_tacho_count: i32,
    rotation_count: i32,
}

pub fn print_output_state(addr: &str, state: &OutputState, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&OutputStateOutput {
            addr,
            port: state.port,
            power: state.power,
            run_state: state.run_state,
            tacho_limit: state.tacho_limit,
            tacho_count: state.tacho_count,
            block_tacho_count: state.block_tacho_count,
            rotation_count: state.rotation_count,
        }),
        OutputFormat::Table => {
            let mut table = table_with_header(vec!["PORT", "POWER", "TACHO", "ROTATION", "LIMIT"]);
            table.add_row(vec![
                state.port.to_string(),
                state.power.to_string(),
                state.tacho_count.to_string(),
                state.rotation_count.to_string(),
                state.tacho_limit.to_string(),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!(
            "port {} power {} tacho {} rotation {} limit {}",
            state.port, state.power, state.tacho_count, state.rotation_count, state.tacho_limit
        ),
        OutputFormat::Raw => println!("{}", state.tacho_count),
    }
}

#[derive(Serialize)]
struct ProgramNameOutput<'a> {
    addr: &'a str,
    program: &'a str,
}

pub fn print_program_name(addr: &str, program: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&ProgramNameOutput { addr, program }),
        OutputFormat::Table => {
            let mut table = table_with_header(vec!["ADDR", "RUNNING PROGRAM"]);
            table.add_row(vec![addr, program]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => println!("{program}"),
    }
}

#[derive(Serialize)]
struct FileOutput<'a> {
    name: &'a str,
    size: u32,
}

pub fn print_files(entries: &[FileEntry], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let rows: Vec<FileOutput<'_>> = entries
                .iter()
                .map(|entry| FileOutput {
                    name: &entry.name,
                    size: entry.size,
                })
                .collect();
            print_json(&rows);
        }
        OutputFormat::Table => {
            let mut table = table_with_header(vec!["NAME", "SIZE"]);
            for entry in entries {
                table.add_row(vec![entry.name.clone(), entry.size.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for entry in entries {
                println!("{}\t{}", entry.name, entry.size);
            }
        }
    }
}

#[derive(Serialize)]
struct EventOutput<'a> {
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

/// One monitor line: an event name plus optional detail.
pub fn print_event(event: &str, detail: Option<&str>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&EventOutput { event, detail }),
        _ => match detail {
            Some(detail) => println!("{event}: {detail}"),
            None => println!("{event}"),
        },
    }
}

/// Describe a reply frame for event output.
pub fn describe_reply(frame: &[u8]) -> String {
    let name = frame.get(1).map(|&op| opcode::opcode_name(op)).unwrap_or("?");
    format!("{name} [{}]", hex(frame))
}

#[derive(Serialize)]
pub struct CheckOutput {
    pub check: &'static str,
    pub ok: bool,
    pub detail: String,
}

pub fn print_checks(checks: &[CheckOutput], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&checks),
        OutputFormat::Table => {
            let mut table = table_with_header(vec!["CHECK", "RESULT", "DETAIL"]);
            for check in checks {
                table.add_row(vec![
                    check.check.to_string(),
                    if check.ok { "ok" } else { "FAILED" }.to_string(),
                    check.detail.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for check in checks {
                println!(
                    "{} {}: {}",
                    if check.ok { "ok" } else { "FAILED" },
                    check.check,
                    check.detail
                );
            }
        }
    }
}
