// SPDX-License-Identifier: MPL-2.0
use lens_gallery::application::Gallery;
use lens_gallery::config::{self, Config, LOAD_ERROR_WARNING};
use lens_gallery::domain::media::{format_size, FolderId, FolderLocator, KindFilter, SortKey};
use lens_gallery::error::Result;
use lens_gallery::infrastructure::{CborFolderStore, FsContentFetcher, FsDirectoryScanner};
use lens_gallery::{logging, paths};
use std::process::ExitCode;
use std::sync::Arc;

const HELP: &str = "\
lens_gallery - browse linked media folders

USAGE:
  lens_gallery [OPTIONS] <COMMAND>

COMMANDS:
  list            List linked folders
  add <PATH>      Link a folder and scan it
  remove <ID>     Unlink a folder
  show            Scan every linked folder and print the gallery

OPTIONS:
  --filter <KIND>     all, image, gif or video
  --sort <KEY>        name-asc, name-desc, date-newest, date-oldest,
                      size-largest, size-smallest or type
  --remember          Store --filter/--sort as the new defaults
  --data-dir <DIR>    Directory holding the linked folder list
  --config-dir <DIR>  Directory holding settings.toml
  -v, --verbose       Debug logging
  -h, --help          Print this help
";

enum Command {
    List,
    Add(String),
    Remove(u64),
    Show,
}

struct Args {
    command: Command,
    filter: Option<KindFilter>,
    sort: Option<SortKey>,
    remember: bool,
    verbose: bool,
}

fn parse_args() -> std::result::Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    paths::init_cli_overrides(
        args.opt_value_from_str("--data-dir")?,
        args.opt_value_from_str("--config-dir")?,
    );
    let filter = args.opt_value_from_fn("--filter", str::parse::<KindFilter>)?;
    let sort = args.opt_value_from_fn("--sort", str::parse::<SortKey>)?;
    let remember = args.contains("--remember");
    let verbose = args.contains(["-v", "--verbose"]);

    let command = match args.subcommand()?.as_deref() {
        Some("list") => Command::List,
        Some("add") => Command::Add(args.free_from_str()?),
        Some("remove") => Command::Remove(args.free_from_str()?),
        Some("show") | None => Command::Show,
        Some(other) => {
            return Err(pico_args::Error::ArgumentParsingFailed {
                cause: format!("unknown command: {other}"),
            })
        }
    };

    let rest = args.finish();
    if !rest.is_empty() {
        return Err(pico_args::Error::ArgumentParsingFailed {
            cause: format!("unexpected arguments: {rest:?}"),
        });
    }

    Ok(Some(Args {
        command,
        filter,
        sort,
        remember,
        verbose,
    }))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    logging::init(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let (mut config, warning) = config::load();
    if warning.as_deref() == Some(LOAD_ERROR_WARNING) {
        eprintln!("warning: settings.toml could not be read, using defaults");
    }
    apply_overrides(&mut config, &args)?;

    let (store, warning) = CborFolderStore::load_default()?;
    if warning.is_some() {
        eprintln!(
            "warning: {} could not be read, starting with no linked folders",
            store.path().display()
        );
    }
    let mut gallery = Gallery::new(
        Box::new(store),
        Arc::new(FsDirectoryScanner::from_config(&config.scan)),
        Arc::new(FsContentFetcher::new()),
        &config,
    );
    gallery.load_folders()?;

    match args.command {
        Command::List => print_folders(&gallery),
        Command::Add(path) => {
            let folder = gallery.link_folder(FolderLocator::new(path)).await?;
            println!(
                "Linked [{}] {} ({})",
                folder.id,
                folder.name,
                folder.locator.as_path().display()
            );
            print_warnings(&gallery);
            println!("{}", gallery.counts());
        }
        Command::Remove(id) => {
            let removal = gallery.unlink_folder(FolderId::new(id))?;
            println!("Unlinked folder {id} ({} entries)", removal.removed.len());
        }
        Command::Show => {
            gallery.refresh_all().await?;
            print_warnings(&gallery);
            print_view(&gallery);
        }
    }
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &Args) -> Result<()> {
    if let Some(filter) = args.filter {
        config.gallery.filter = filter;
    }
    if let Some(sort) = args.sort {
        config.gallery.sort = sort;
    }
    if args.remember {
        config::save(config)?;
    }
    Ok(())
}

fn print_folders(gallery: &Gallery) {
    if gallery.folders().is_empty() {
        println!("No linked folders. Use `lens_gallery add <PATH>`.");
        return;
    }
    for folder in gallery.folders() {
        println!(
            "[{}] {}  {}",
            folder.id,
            folder.name,
            folder.locator.as_path().display()
        );
    }
}

fn print_warnings(gallery: &Gallery) {
    for warning in gallery.warnings() {
        let name = gallery
            .folders()
            .iter()
            .find(|folder| folder.id == warning.folder)
            .map_or_else(|| warning.folder.to_string(), |folder| folder.name.clone());
        eprintln!("warning: {name}: {}", warning.error);
    }
}

fn print_view(gallery: &Gallery) {
    let view = gallery.view();
    for entry in &view {
        println!(
            "{:>6}  {:<5}  {:>9}  {:<16}  {}",
            entry.id().get(),
            entry.kind().as_str(),
            format_size(entry.size()),
            format_date(entry.modified_at()),
            entry.name()
        );
    }

    let catalog = gallery.catalog();
    let filter = catalog.filter();
    let shown = if filter.is_active() {
        format!(" ({} shown, filter: {filter})", view.len())
    } else {
        String::new()
    };
    println!("{}{shown}  sorted by {}", gallery.counts(), catalog.sort().label());
}

fn format_date(modified_at: u64) -> String {
    i64::try_from(modified_at)
        .ok()
        .filter(|millis| *millis > 0)
        .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
        .map(|date| {
            date.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| "-".to_string())
}
