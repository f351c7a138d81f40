use clap::Subcommand;

use crate::connector::adapter::DEFAULT_SERVER_URL;

pub const DEFAULT_PORT: u16 = 5292;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the tutor HTTP server
    Serve {
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Chat with a running server in the terminal
    Chat {
        #[arg(short, long, default_value = DEFAULT_SERVER_URL)]
        url: String,
    },

    /// Send one message and print the full JSON reply
    Ask {
        message: String,

        #[arg(short, long, default_value = DEFAULT_SERVER_URL)]
        url: String,
    },
}
