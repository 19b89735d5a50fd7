mod api;
mod cli;
mod config;
mod detail;
mod form;
mod list;
mod model;
mod prompt;
mod route;
mod session;
mod validate;

use anyhow::Result;
use clap::Parser;
use std::cell::RefCell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "userdeck", about = "Browse and edit users on a remote REST service")]
pub struct Args {
    #[arg(
        short,
        long,
        help = "Run one command and exit (e.g. \"/user/3\" or \"delete 3\")"
    )]
    pub command: Option<String>,

    #[arg(long, env = "USERDECK_BASE_URL", help = "Base URL of the users API")]
    pub base_url: Option<String>,

    #[arg(long, value_name = "MS", help = "Request timeout in milliseconds")]
    pub timeout_ms: Option<u64>,

    #[arg(long, help = "Confirm deletions without asking")]
    pub yes: bool,

    #[arg(long, help = "Session logs directory")]
    pub sessions_dir: Option<PathBuf>,

    #[arg(long, help = "Do not write a session log")]
    pub no_session_log: bool,

    #[arg(long, help = "Config file path")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Verbose output (print requests)")]
    pub verbose: bool,

    #[arg(long, help = "Debug output (print settings and requests)")]
    pub debug: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut cfg = if let Some(config_path) = &args.config {
        config::Config::load_from(config_path)?
    } else {
        config::Config::load()?
    };

    // CLI and environment take priority over config files
    if let Some(base_url) = &args.base_url {
        cfg.api.base_url = base_url.clone();
    }
    if let Some(timeout_ms) = args.timeout_ms {
        cfg.api.timeout_ms = timeout_ms;
    }
    if let Some(dir) = &args.sessions_dir {
        cfg.session.dir = Some(dir.clone());
    }
    if args.no_session_log {
        cfg.session.enabled = false;
    }

    if let Err(errors) = cfg.validate() {
        for error in &errors {
            eprintln!("Config error {}", error);
        }
        return Err(anyhow::anyhow!(
            "Invalid configuration ({} error(s))",
            errors.len()
        ));
    }

    if args.debug {
        eprintln!("[DEBUG] API base URL: {}", cfg.api.base_url);
        eprintln!("[DEBUG] Timeout: {} ms", cfg.api.timeout_ms);
        eprintln!("[DEBUG] Session log enabled: {}", cfg.session.enabled);
    }

    let root = std::env::current_dir()?;
    let session_id = uuid::Uuid::new_v4().to_string();
    let mut session = if cfg.session.enabled {
        let sessions_dir = cfg.sessions_dir(&root);
        std::fs::create_dir_all(&sessions_dir)?;
        let session_path = sessions_dir.join(format!("{}.jsonl", session_id));
        session::SessionLog::new(&session_path, &session_id)?
    } else {
        session::SessionLog::disabled(&session_id)
    };
    let api = api::HttpClient::new(&cfg.api.base_url, cfg.api.timeout());
    let _ = session.session_start(api.base_url());
    let confirm = prompt::TerminalConfirm::new(args.command.is_some(), args.yes);

    let ctx = cli::Context {
        args,
        config: cfg,
        api: Box::new(api),
        confirm,
        session: RefCell::new(session),
        route: RefCell::new(route::Route::Home),
        home: RefCell::new(list::ListView::new()),
    };

    if let Some(command) = ctx.args.command.clone() {
        cli::run_once(&ctx, &command)
    } else {
        cli::run_repl(ctx)
    }
}
