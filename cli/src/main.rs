mod schema;
mod test_runner;

use std::path::Path;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use blockconf::{Block, ConvertError, ParseError, Parsed};

const SUBCOMMANDS: &[&str] = &["print", "get", "check", "test", "help"];

#[derive(Parser)]
#[command(name = "blockconf", version, about = "Block configuration file tool")]
struct Cli {
    /// Disable colored diagnostic output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a file and print it back in canonical form
    Print(PrintArgs),

    /// Look up a single value
    Get(GetArgs),

    /// Report settings and blocks that are not in a list of known names
    Check(CheckArgs),

    /// Run .test.conf fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct PrintArgs {
    /// Configuration file to read
    file: String,

    /// Print the text after comment and whitespace removal instead
    #[arg(long)]
    sanitized: bool,

    /// Dump the parsed tree
    #[arg(long)]
    ast: bool,
}

#[derive(clap::Args)]
struct GetArgs {
    /// Configuration file to read
    file: String,

    /// Setting to look up
    key: String,

    /// Enclosing block, outermost first. Repeatable.
    #[arg(short, long = "block")]
    blocks: Vec<String>,

    /// Printed when the setting is absent (otherwise exit 1)
    #[arg(short, long)]
    default: Option<String>,

    /// Require the value to be of this type
    #[arg(long = "as", value_enum, default_value_t = ValueType::String)]
    value_type: ValueType,
}

#[derive(Clone, Copy, ValueEnum)]
enum ValueType {
    String,
    Int,
    Float,
    Bool,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Configuration file to read
    file: String,

    /// TOML file listing known names as [[entry]] tables
    #[arg(short, long)]
    known: String,

    /// List all known entries even if nothing is unknown
    #[arg(long)]
    all: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.conf file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    // `blockconf file.conf` is shorthand for `blockconf print file.conf`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(pos) = args
        .iter()
        .skip(1)
        .position(|a| !a.starts_with('-'))
        .map(|i| i + 1)
    {
        if !SUBCOMMANDS.contains(&args[pos].as_str()) {
            args.insert(pos, "print".to_string());
        }
    }

    let cli = Cli::parse_from(&args);
    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    match cli.command {
        Command::Print(print_args) => do_print(print_args, color_choice),
        Command::Get(get_args) => do_get(get_args, color_choice),
        Command::Check(check_args) => do_check(check_args, color_choice),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

/// Read and parse `file`, reporting diagnostics to stderr.
fn load(file: &str, color_choice: ColorChoice) -> Parsed {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", file, e);
            process::exit(1);
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(file.to_string(), source.clone());

    let root_name = Path::new(file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("root")
        .to_string();
    let parsed = blockconf::Parser::new(source, file_id).parse(root_name);
    emit_diagnostics(&files, &parsed.diagnostics, color_choice);
    parsed
}

fn emit_diagnostics(
    files: &SimpleFiles<String, String>,
    diagnostics: &[ParseError],
    color_choice: ColorChoice,
) {
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    for error in diagnostics {
        let diagnostic = error.to_diagnostic();
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, &diagnostic);
    }
}

fn do_print(args: PrintArgs, color_choice: ColorChoice) {
    if args.sanitized {
        let source = match std::fs::read_to_string(&args.file) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: cannot read '{}': {}", args.file, e);
                process::exit(1);
            }
        };
        println!("{}", blockconf::parser::sanitize(&source));
        return;
    }

    let parsed = load(&args.file, color_choice);
    if args.ast {
        println!("{:#?}", parsed.root);
    } else {
        print!("{}", parsed.root);
    }
}

fn do_get(args: GetArgs, color_choice: ColorChoice) {
    let parsed = load(&args.file, color_choice);
    let root = &parsed.root;

    let found = match args.value_type {
        ValueType::String => lookup::<String>(root, &args),
        ValueType::Int => lookup::<i64>(root, &args),
        ValueType::Float => lookup::<f64>(root, &args),
        ValueType::Bool => lookup::<bool>(root, &args),
    };

    match (found, args.default) {
        (Ok(Some(value)), _) => println!("{}", value),
        (Ok(None), Some(default)) => println!("{}", default),
        (Ok(None), None) => {
            let mut path = args.blocks.clone();
            path.push(args.key.clone());
            eprintln!("error: `{}` not found", path.join("."));
            process::exit(1);
        }
        (Err(e), _) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

/// Strict typed lookup, rendered back to text for printing.
fn lookup<T>(root: &Block, args: &GetArgs) -> Result<Option<String>, ConvertError>
where
    T: blockconf::FromValue + ToString,
{
    root.try_get_in::<T, _>(&args.blocks, &args.key)
        .map(|value| value.map(|v| v.to_string()))
}

fn do_check(args: CheckArgs, color_choice: ColorChoice) {
    let known = match schema::load(Path::new(&args.known)) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let parsed = load(&args.file, color_choice);
    let report = parsed.root.check(known).show_all(args.all);
    eprint!("{}", report);
    if !report.is_clean() {
        process::exit(1);
    }
}
