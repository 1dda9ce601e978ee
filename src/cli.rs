use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Save an article or blog post
    Add {
        /// Page url (http or https)
        url: String,

        /// Where this link came from (e.g. "cli", "chat")
        #[clap(short, long)]
        source: Option<String>,

        /// Don't use the headless browser, even for script-heavy hosts
        #[clap(long, default_value = "false")]
        no_headless: bool,
    },

    /// Save a tool, repo or other software resource
    Tool {
        /// Page url (http or https)
        url: String,

        /// Your own description of the resource, folded into the
        /// generator prompt
        #[clap(short, long)]
        description: Option<String>,

        /// Where this link came from (e.g. "cli", "chat")
        #[clap(short, long)]
        source: Option<String>,

        /// Don't use the headless browser, even for script-heavy hosts
        #[clap(long, default_value = "false")]
        no_headless: bool,
    },

    /// List the most recently saved records
    List {
        /// Maximum number of records to print
        #[clap(short, long, default_value = "10")]
        limit: usize,
    },
}
