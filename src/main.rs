mod debug_report;

use pedido::{
    CatalogStore, FileSource, InMemorySessionStore, Inbound, JsonLinesSink, MessageSink, OrderBot, PricingCalculator,
    Reply, SendError, Settings, analyze_with,
};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_CUSTOMER: &str = "cli-customer";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    init_tracing();

    if let Err(err) = run(config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

struct CliConfig {
    settings: Option<PathBuf>,
    menu: Option<String>,
    priced_menu: Option<String>,
    customer: String,
    analyze: Option<String>,
    color: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("PEDIDO_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn run(config: CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Settings::load(config.settings.as_deref())?;
    if let Some(menu) = config.menu {
        settings.catalog.path = menu;
        settings.catalog.url = None;
    }
    if config.priced_menu.is_some() {
        settings.catalog.priced_path = config.priced_menu;
    }

    let menu = Arc::new(CatalogStore::from_boxed(settings.menu_source()?, settings.catalog_ttl()));
    let priced = settings
        .catalog
        .priced_path
        .as_ref()
        .map(|path| Arc::new(CatalogStore::with_ttl(FileSource::new(path), settings.catalog_ttl())));

    if let Some(text) = config.analyze {
        let options = settings.options();
        let catalog = menu.snapshot();
        let priced_catalog = priced.as_ref().map_or_else(|| Arc::clone(&catalog), |store| store.snapshot());
        let result = analyze_with(&catalog, &text, &options);
        let quote = PricingCalculator::with_options(&priced_catalog, &options).price(&text);
        debug_report::print_run(&text, &result, &quote, config.color);
        return Ok(());
    }

    let sink = Arc::new(JsonLinesSink::new(&settings.orders.sink_path));
    let mut bot = OrderBot::from_settings(&settings, Arc::clone(&menu), Arc::new(InMemorySessionStore::new()), sink)?;
    if let Some(priced) = priced {
        bot = bot.with_priced_catalog(priced);
    }

    repl(&bot, &config.customer, config.color)
}

/// Read turns from stdin until EOF or `/quit`.
///
/// Lines starting with `/` are selections (`/START_ORDER`, `/var:0:1`, ...);
/// `/reload` reloads the catalogs.
fn repl(bot: &OrderBot, customer: &str, color: bool) -> Result<(), Box<dyn std::error::Error>> {
    let out = StdoutSink { color };
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();

    if interactive {
        println!("pedido {}: type a message, /START_ORDER to order, /quit to leave.", env!("CARGO_PKG_VERSION"));
    }

    loop {
        if interactive {
            print!("> ");
            io::stdout().flush()?;
        }
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let inbound = match line.strip_prefix('/') {
            Some("quit") => break,
            Some("reload") => {
                bot.reload_catalogs();
                println!("catalogs reloaded");
                continue;
            }
            Some(token) => Inbound::Selection(token.to_string()),
            None => Inbound::Text(line.to_string()),
        };
        bot.dispatch(customer, inbound, &out)?;
    }
    Ok(())
}

struct StdoutSink {
    color: bool,
}

impl MessageSink for StdoutSink {
    fn send(&self, customer: &str, reply: &Reply) -> Result<(), SendError> {
        let mut stdout = io::stdout().lock();
        debug_report::write_reply(&mut stdout, reply, self.color)
            .and_then(|()| stdout.flush())
            .map_err(|err| SendError { customer: customer.to_string(), message: err.to_string() })
    }
}

fn parse_args() -> Result<CliConfig, String> {
    let mut config = CliConfig {
        settings: None,
        menu: None,
        priced_menu: None,
        customer: DEFAULT_CUSTOMER.to_string(),
        analyze: None,
        color: io::stdout().is_terminal(),
    };
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("pedido {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => config.color = true,
            "--no-color" => config.color = false,
            "--settings" => config.settings = Some(PathBuf::from(value_of(&mut args, "--settings")?)),
            "--menu" => config.menu = Some(value_of(&mut args, "--menu")?),
            "--priced-menu" => config.priced_menu = Some(value_of(&mut args, "--priced-menu")?),
            "--customer" => config.customer = value_of(&mut args, "--customer")?,
            "--analyze" | "-a" => {
                let value = value_of(&mut args, "--analyze")?;
                if config.analyze.is_some() {
                    return Err("error: --analyze provided multiple times".to_string());
                }
                config.analyze = Some(value);
            }
            _ if arg.starts_with("--settings=") => config.settings = Some(PathBuf::from(&arg["--settings=".len()..])),
            _ if arg.starts_with("--menu=") => config.menu = Some(arg["--menu=".len()..].to_string()),
            _ if arg.starts_with("--customer=") => config.customer = arg["--customer=".len()..].to_string(),
            _ => return Err(format!("error: unknown argument '{arg}'\n\n{}", help_text())),
        }
    }

    if config.customer.trim().is_empty() {
        return Err("error: --customer must not be empty".to_string());
    }
    if config.analyze.as_deref().is_some_and(|text| text.trim().is_empty()) {
        return Err("error: --analyze expects non-empty text".to_string());
    }

    Ok(config)
}

fn value_of(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("error: {flag} expects a value"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "pedido {version}

Restaurant chat ordering engine CLI.

Usage:
  pedido [OPTIONS]                    Chat with the order bot on stdin.
  pedido [OPTIONS] --analyze <text>   Show how one message is matched and priced.

Options:
  --settings <file>          Settings file (toml, json or yaml). Default: ./pedido.* if present.
  --menu <file>              Menu document. Overrides catalog.path and catalog.url.
  --priced-menu <file>       Separate priced menu document. Overrides catalog.priced_path.
  --customer <id>            Customer id used for the session. Default: {customer}
  -a, --analyze <text>       Print the match report for <text> and exit.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Chat commands:
  /<token>                   Send a selection, e.g. /START_ORDER, /MENU, /var:0:1.
  /reload                    Reload the catalogs.
  /quit                      Leave.

Environment:
  PEDIDO_LOG                 Log filter (default: warn).
  PEDIDO__SECTION__KEY       Override a setting, e.g. PEDIDO__STORE__CLOSE_TIME=21:00.
  PEDIDO__CATALOG__URL       Fetch the menu over HTTP instead of reading catalog.path.

Exit codes:
  0  Success.
  1  Settings, catalog or I/O error.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        customer = DEFAULT_CUSTOMER
    )
}
