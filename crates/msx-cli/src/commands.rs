use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use msx_bridge::BridgeClient;
use msx_library::plan::{batch_ids, plan_geometry, plan_shader, plan_textures, Selection};
use msx_library::{AssetType, Library, LibraryIndex, MsxConfig};
use serde_json::{json, Value};
use std::path::PathBuf;

/// Dispatch the parsed command line
pub(crate) fn run(matches: &ArgMatches) -> Result<Value> {
    let config = load_config(matches)?;

    match matches.subcommand() {
        Some(("bridge", _)) => {
            let folder = query_bridge(&config)?;
            Ok(json!({ "folder": folder }))
        }
        Some((name, args)) => {
            let library = open_library(config)?;
            dispatch(&library, name, args)
        }
        None => bail!("no subcommand given"),
    }
}

fn dispatch(library: &Library, name: &str, args: &ArgMatches) -> Result<Value> {
    match name {
        "index" => {
            let outcome = if args.get_flag("force") {
                library.rebuild()?
            } else {
                library.index()?
            };
            Ok(json!({
                "status": outcome.status,
                "hash": outcome.hash,
                "assets": outcome.index.len(),
                "report": outcome.report,
            }))
        }
        "status" => {
            let paths = library.paths();
            Ok(json!({
                "library": paths.root,
                "manifest": paths.manifest,
                "cache_dir": paths.cache_dir,
                "cache": library.cache_state(),
            }))
        }
        "clear-cache" => {
            library.clear_cache()?;
            Ok(json!({ "cleared": library.paths().cache_dir }))
        }
        _ => {
            let index = library.index()?.index;
            query(&index, name, args)
        }
    }
}

fn query(index: &LibraryIndex, name: &str, args: &ArgMatches) -> Result<Value> {
    match name {
        "list" => Ok(list(index, args)),
        "show" => {
            let (key, record) = index.lookup(arg(args, "asset"))?;
            Ok(json!({ "key": key, "record": record }))
        }
        "find" => {
            let id = arg(args, "id");
            let (key, _) = index
                .find_by_id(id)
                .with_context(|| format!("no asset with id {id}"))?;
            Ok(json!({ "key": key }))
        }
        "locate" => {
            let dir = index.asset_dir(arg(args, "asset"))?;
            Ok(json!({ "path": dir }))
        }
        "geometry" => Ok(serde_json::to_value(plan_geometry(index, &selection(args))?)?),
        "textures" => Ok(serde_json::to_value(plan_textures(index, &selection(args))?)?),
        "shader" => {
            let textures = plan_textures(index, &selection(args))?;
            let shader = plan_shader(&textures);
            Ok(json!({
                "shader": shader,
                "to_generate": textures.to_generate,
                "missing": textures.missing,
            }))
        }
        "batch" => {
            let ids = match args.get_one::<String>("single") {
                Some(current) => batch_ids(index, false, "", current)?,
                None => {
                    let requested: Vec<&str> = args
                        .get_many::<String>("ids")
                        .map(|ids| ids.map(String::as_str).collect())
                        .unwrap_or_default();
                    batch_ids(index, true, &requested.join(" "), "")?
                }
            };
            Ok(json!({ "ids": ids }))
        }
        other => bail!("unknown command {other}"),
    }
}

fn list(index: &LibraryIndex, args: &ArgMatches) -> Value {
    let asset_type = args.get_one::<String>("type").map(|t| AssetType::from(t.as_str()));
    let tag = args.get_one::<String>("tag").map(String::as_str);

    let rows: Vec<Value> = index
        .filter(asset_type.as_ref(), tag)
        .map(|(key, r)| {
            json!({
                "key": key,
                "type": r.asset_type,
                "lods": r.lod_labels(),
                "formats": r.formats,
                "resolutions": r.resolutions(),
            })
        })
        .collect();
    Value::Array(rows)
}

fn arg<'a>(args: &'a ArgMatches, name: &str) -> &'a str {
    args.get_one::<String>(name).map_or("", String::as_str)
}

fn selection(args: &ArgMatches) -> Selection {
    let mut selection = Selection::new(arg(args, "asset"));
    selection.file_format = arg(args, "format").to_string();
    selection.render_lod = arg(args, "render-lod").to_string();
    selection.proxy_lod = arg(args, "proxy-lod").to_string();
    selection.resolution = arg(args, "resolution").to_string();
    selection.load_original = args.get_flag("original");
    selection
}

fn load_config(matches: &ArgMatches) -> Result<MsxConfig> {
    let cwd = std::env::current_dir().context("cannot read working directory")?;
    let explicit = matches.get_one::<PathBuf>("config");
    let mut config = MsxConfig::discover(explicit.map(PathBuf::as_path), &cwd)
        .context("cannot load configuration")?;

    if let Some(library) = matches.get_one::<PathBuf>("library") {
        config = config.with_library_path(library);
    }
    if matches.get_flag("strict") {
        config = config.with_strict(true);
    }
    Ok(config)
}

fn open_library(mut config: MsxConfig) -> Result<Library> {
    if config.library_path.is_none() {
        tracing::info!("No library path configured, asking the companion app");
        match query_bridge(&config) {
            Ok(folder) => config = config.with_library_path(folder),
            Err(err) => {
                tracing::warn!("{err:#}");
                bail!("library path is not configured; pass --library or set library_path");
            }
        }
    }
    Library::open(&config).context("cannot open library")
}

fn query_bridge(config: &MsxConfig) -> Result<PathBuf> {
    let client = BridgeClient::from_config(&config.bridge)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("cannot start async runtime")?;
    runtime
        .block_on(client.library_folder())
        .with_context(|| format!("companion app query to {} failed", client.url()))
}
