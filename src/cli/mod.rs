use clap::Parser;

/// Chat with a language model served locally by LM Studio.
///
/// The server address is read from `LM_STUDIO_BASE_URL` (a `.env` file in the
/// working directory is loaded first). Type `sair` to quit.
#[derive(Debug, Parser)]
#[command(name = "lmchat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run the non-interactive self-test against a fake model and exit
    /// with status 0 on success, 1 on failure
    #[arg(long)]
    pub ci_test: bool,
}
