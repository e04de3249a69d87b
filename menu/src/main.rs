use std::path::PathBuf;

use menu_format::ParseOptions;
use structopt::clap::AppSettings::*;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

#[derive(Debug, StructOpt)]
enum Commands {
    #[structopt(about = "Show the header fields and property counts of a .menu or .mate file")]
    Info {
        #[structopt(parse(from_os_str), help = "Path to the .menu or .mate file")]
        path: PathBuf,
    },

    #[structopt(about = "Print a .menu or .mate file as JSON")]
    Dump {
        #[structopt(parse(from_os_str), help = "Path to the .menu or .mate file")]
        path: PathBuf,
    },

    #[structopt(about = "Build a .menu or .mate file from a JSON dump")]
    Pack {
        #[structopt(parse(from_os_str), help = "Path to the JSON dump")]
        path: PathBuf,

        #[structopt(short, long, parse(from_os_str), help = "Output file")]
        output: PathBuf,
    },

    #[structopt(about = "Print the attributes of a .menu file")]
    Attrs {
        #[structopt(long, help = "Use the one-line-per-attribute layout")]
        inline: bool,

        #[structopt(parse(from_os_str), help = "Path to the .menu file")]
        path: PathBuf,
    },

    #[structopt(
        name = "set-attrs",
        about = "Replace the attributes of a .menu file with those in a text file"
    )]
    SetAttrs {
        #[structopt(long, help = "The text file uses the one-line-per-attribute layout")]
        inline: bool,

        #[structopt(
            short,
            long,
            parse(from_os_str),
            help = "Output file [default: overwrite the input]"
        )]
        output: Option<PathBuf>,

        #[structopt(parse(from_os_str), help = "Path to the .menu file")]
        path: PathBuf,

        #[structopt(parse(from_os_str), help = "Path to the attribute text")]
        text: PathBuf,
    },

    #[structopt(about = "Convert between .menu files and text documents")]
    Convert {
        #[structopt(
            short,
            long,
            parse(from_os_str),
            help = "Output file [default: input with the other extension]"
        )]
        output: Option<PathBuf>,

        #[structopt(parse(from_os_str), help = "Path to a .menu or .txt file")]
        path: PathBuf,
    },

    #[structopt(about = "Replace a substring in every string field")]
    Replace {
        #[structopt(
            short,
            long,
            parse(from_os_str),
            help = "Output file [default: overwrite the input]"
        )]
        output: Option<PathBuf>,

        #[structopt(parse(from_os_str), help = "Path to the .menu or .mate file")]
        path: PathBuf,

        old: String,
        new: String,
    },

    #[structopt(name = "remove-attrs", about = "Drop every line of the given attribute keys")]
    RemoveAttrs {
        #[structopt(
            short,
            long,
            parse(from_os_str),
            help = "Output file [default: overwrite the input]"
        )]
        output: Option<PathBuf>,

        #[structopt(parse(from_os_str), help = "Path to the .menu file")]
        path: PathBuf,

        #[structopt(required = true)]
        keys: Vec<String>,
    },

    #[structopt(about = "Check that a file re-encodes to what was read")]
    Validate {
        #[structopt(parse(from_os_str), help = "Path to the .menu or .mate file")]
        path: PathBuf,
    },
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "menu",
    about = "Inspect, edit and convert CM3D2 .menu and .mate files.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands]
)]
struct CliOpts {
    #[structopt(short, long, help = "Show verbose output", global = true)]
    verbose: bool,

    #[structopt(
        long,
        help = "Read string lengths as a single byte, as some older tools wrote them",
        global = true
    )]
    legacy_strings: bool,

    #[structopt(subcommand)]
    cmd: Commands,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let opts = CliOpts::from_iter(wild::args_os());
    init_tracing(opts.verbose);

    let parse_options = if opts.legacy_strings {
        ParseOptions::legacy()
    } else {
        ParseOptions::default()
    };

    match opts.cmd {
        Commands::Info { path } => commands::info(path, &parse_options)?,
        Commands::Dump { path } => commands::dump(path, &parse_options)?,
        Commands::Pack { path, output } => commands::pack(path, output)?,
        Commands::Attrs { path, inline } => commands::attrs(path, inline, &parse_options)?,
        Commands::SetAttrs {
            path,
            text,
            inline,
            output,
        } => commands::set_attrs(path, text, inline, output, &parse_options)?,
        Commands::Convert { path, output } => commands::convert(path, output, &parse_options)?,
        Commands::Replace {
            path,
            old,
            new,
            output,
        } => commands::replace(path, old, new, output, &parse_options)?,
        Commands::RemoveAttrs { path, keys, output } => {
            commands::remove_attrs(path, keys, output, &parse_options)?
        }
        Commands::Validate { path } => commands::validate(path, &parse_options)?,
    }

    Ok(())
}
