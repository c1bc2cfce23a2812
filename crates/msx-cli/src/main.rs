//! `msx` command line
//!
//! Every subcommand prints one JSON document on stdout; logs go to stderr.

mod commands;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn selection_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("asset")
            .required(true)
            .help("Asset key (type::name::id) or id"),
    )
    .arg(
        Arg::new("format")
            .long("format")
            .default_value("fbx")
            .help("Mesh file extension to load"),
    )
    .arg(
        Arg::new("render-lod")
            .long("render-lod")
            .default_value("LOD0")
            .help("LOD for render geometry"),
    )
    .arg(
        Arg::new("proxy-lod")
            .long("proxy-lod")
            .default_value("LOD0")
            .help("LOD for proxy geometry"),
    )
    .arg(
        Arg::new("resolution")
            .long("resolution")
            .default_value("2048x2048")
            .help("Texture resolution"),
    )
    .arg(
        Arg::new("original")
            .long("original")
            .action(ArgAction::SetTrue)
            .help("Load the unreduced HIGH mesh as render geometry"),
    )
}

fn cli() -> Command {
    Command::new("msx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Downloaded asset library index and host request planner")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("library")
                .long("library")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Library root (the folder containing Downloaded)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Config file (default: ./msx.toml when present)"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Fail the scan on the first asset that cannot be resolved"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More logging on stderr (-v debug, -vv trace)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Write logs as JSON lines"),
        )
        .subcommand(
            Command::new("index")
                .about("Load the index, rebuilding it if the manifest changed")
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Rebuild even if the cache is current"),
                ),
        )
        .subcommand(Command::new("status").about("Show cache state without modifying it"))
        .subcommand(
            Command::new("list")
                .about("List indexed assets")
                .arg(
                    Arg::new("type")
                        .long("type")
                        .help("Only assets of this type (3d, 3dplant, ...)"),
                )
                .arg(Arg::new("tag").long("tag").help("Only assets carrying this tag")),
        )
        .subcommand(
            Command::new("show")
                .about("Print one asset record")
                .arg(Arg::new("asset").required(true).help("Asset key or id")),
        )
        .subcommand(
            Command::new("find")
                .about("Find the key of an asset id")
                .arg(Arg::new("id").required(true).help("Asset id (case-insensitive)")),
        )
        .subcommand(
            Command::new("locate")
                .about("Print the directory of an asset")
                .arg(Arg::new("asset").required(true).help("Asset key or id")),
        )
        .subcommand(selection_args(
            Command::new("geometry").about("Plan geometry loading for an asset"),
        ))
        .subcommand(selection_args(
            Command::new("textures").about("Plan texture choice and conversion for an asset"),
        ))
        .subcommand(selection_args(
            Command::new("shader").about("Plan shader wiring for an asset"),
        ))
        .subcommand(
            Command::new("batch")
                .about("Asset ids a build run covers")
                .arg(
                    Arg::new("ids")
                        .num_args(0..)
                        .help("Requested asset ids"),
                )
                .arg(
                    Arg::new("single")
                        .long("single")
                        .help("Disable batching and build only this asset (key or id)"),
                ),
        )
        .subcommand(Command::new("bridge").about("Ask the companion app for its library folder"))
        .subcommand(Command::new("clear-cache").about("Delete the persisted index"))
}

fn init_tracing(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let matches: ArgMatches = cli().get_matches();
    init_tracing(matches.get_count("verbose"), matches.get_flag("log-json"));

    match commands::run(&matches) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                tracing::error!("cannot encode output: {err}");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
