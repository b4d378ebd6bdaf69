use anyhow::Context;
use argh::FromArgs;
use tinysh::{Config, OsFilesystem, RustylineTerminal, Session, Shell, SpawnLauncher};

#[derive(FromArgs)]
/// A small interactive shell for everyday file chores.
struct Args {
    /// do not colour the prompt or command output
    #[argh(switch)]
    no_color: bool,

    /// do not clear the screen on start
    #[argh(switch)]
    no_clear: bool,

    /// do not print the startup banner
    #[argh(switch)]
    no_banner: bool,

    /// log every dispatch to stderr
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// program started by `notepad`
    #[argh(option)]
    editor: Option<String>,

    /// program started by `code`
    #[argh(option)]
    code: Option<String>,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if self.no_color {
            config.color = false;
        }
        if self.no_clear {
            config.clear_on_start = false;
        }
        if self.no_banner {
            config.banner = false;
        }
        if let Some(editor) = self.editor {
            config.editor = editor;
        }
        if let Some(code) = self.code {
            config.code_editor = code;
        }
    }
}

fn main() {
    let args: Args = argh::from_env();
    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // The process always exits with status 0.
    if let Err(err) = run(args) {
        log::error!("{err:#}");
        eprintln!("tinysh: {err:#}");
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let session = Session::new();
    let mut config = Config::from_env(&session.vars);
    args.apply(&mut config);
    log::debug!("{config:?}");

    let terminal = RustylineTerminal::new().context("cannot initialise the line editor")?;
    let mut shell = Shell::new(
        session,
        Box::new(OsFilesystem),
        Box::new(SpawnLauncher),
        Box::new(terminal),
        config,
    )
    .context("cannot register built-in commands")?;
    shell.run().context("terminal failure")?;
    Ok(())
}
